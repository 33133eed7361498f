//! Report window service
//!
//! Resolves window descriptors from the command line into `ReportWindow`
//! values, with relative references anchored on today and the default
//! window kind taken from settings.

use chrono::{Datelike, Local, NaiveDate};

use crate::config::settings::Settings;
use crate::error::{DreError, DreResult};
use crate::models::{MonthYear, ReportWindow, WindowKind};

/// Service for resolving report windows
pub struct PeriodService<'a> {
    settings: &'a Settings,
}

impl<'a> PeriodService<'a> {
    /// Create a new period service
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// The window of the configured default kind containing today
    pub fn current_window(&self) -> ReportWindow {
        self.window_for_date(Local::now().date_naive())
    }

    /// The window of the configured default kind containing a date
    pub fn window_for_date(&self, date: NaiveDate) -> ReportWindow {
        ReportWindow::new(self.settings.default_window, date.month(), date.year())
    }

    /// Parse a descriptor string, or fall back to the current window
    pub fn parse_or_current(&self, descriptor: Option<&str>) -> DreResult<ReportWindow> {
        match descriptor {
            Some(s) => self.parse(s),
            None => Ok(self.current_window()),
        }
    }

    /// Parse a window descriptor.
    ///
    /// Formats supported:
    /// - "2026-03" (a calendar month)
    /// - "2026-q2" (a calendar quarter)
    /// - "2026-s1" (a calendar semester)
    /// - "2026" (a fiscal year)
    /// - "current"/"now"/"this", "last"/"previous"/"prev", "next"
    ///   (relative to today, in the configured default kind)
    pub fn parse(&self, descriptor: &str) -> DreResult<ReportWindow> {
        let s = descriptor.trim().to_lowercase();

        match s.as_str() {
            "current" | "now" | "this" => return Ok(self.current_window()),
            "last" | "previous" | "prev" => {
                return Ok(Self::shift_window(self.current_window(), -1))
            }
            "next" => return Ok(Self::shift_window(self.current_window(), 1)),
            _ => {}
        }

        if let Some((year_part, rest)) = s.split_once('-') {
            let year: i32 = year_part.parse().map_err(|_| bad_descriptor(descriptor))?;

            if let Some(quarter) = rest.strip_prefix('q') {
                let q: u32 = quarter.parse().map_err(|_| bad_descriptor(descriptor))?;
                if !(1..=4).contains(&q) {
                    return Err(bad_descriptor(descriptor));
                }
                return Ok(ReportWindow::quarterly((q - 1) * 3 + 1, year));
            }

            if let Some(half) = rest.strip_prefix('s') {
                let h: u32 = half.parse().map_err(|_| bad_descriptor(descriptor))?;
                if !(1..=2).contains(&h) {
                    return Err(bad_descriptor(descriptor));
                }
                return Ok(ReportWindow::semester((h - 1) * 6 + 1, year));
            }

            let month: u32 = rest.parse().map_err(|_| bad_descriptor(descriptor))?;
            if !(1..=12).contains(&month) {
                return Err(bad_descriptor(descriptor));
            }
            return Ok(ReportWindow::monthly(month, year));
        }

        if let Ok(year) = s.parse::<i32>() {
            // A bare number below four digits is more likely a typo than
            // a year someone wants a report for.
            if (1000..=9999).contains(&year) {
                return Ok(ReportWindow::annual(year));
            }
        }

        Err(bad_descriptor(descriptor))
    }

    /// Shift a window by whole steps of its own kind
    fn shift_window(window: ReportWindow, steps: i32) -> ReportWindow {
        let months = match window.kind {
            WindowKind::Monthly => steps,
            WindowKind::Quarterly => steps * 3,
            WindowKind::Semester => steps * 6,
            WindowKind::Annual | WindowKind::YearOverYear => steps * 12,
        };
        let shifted = MonthYear::new(window.month, window.year).shift(months);
        ReportWindow::new(window.kind, shifted.month, shifted.year)
    }
}

fn bad_descriptor(descriptor: &str) -> DreError {
    DreError::Period(format!(
        "Unrecognized period '{}'. Use YYYY, YYYY-MM, YYYY-qN, or YYYY-sN.",
        descriptor
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_parse_monthly() {
        let settings = default_settings();
        let service = PeriodService::new(&settings);

        assert_eq!(
            service.parse("2026-01").unwrap(),
            ReportWindow::monthly(1, 2026)
        );
        assert_eq!(
            service.parse("2026-12").unwrap(),
            ReportWindow::monthly(12, 2026)
        );
    }

    #[test]
    fn test_parse_quarterly() {
        let settings = default_settings();
        let service = PeriodService::new(&settings);

        assert_eq!(
            service.parse("2026-q1").unwrap(),
            ReportWindow::quarterly(1, 2026)
        );
        assert_eq!(
            service.parse("2026-Q4").unwrap(),
            ReportWindow::quarterly(10, 2026)
        );
        assert!(service.parse("2026-q5").is_err());
    }

    #[test]
    fn test_parse_semester() {
        let settings = default_settings();
        let service = PeriodService::new(&settings);

        assert_eq!(
            service.parse("2026-s1").unwrap(),
            ReportWindow::semester(1, 2026)
        );
        assert_eq!(
            service.parse("2026-s2").unwrap(),
            ReportWindow::semester(7, 2026)
        );
        assert!(service.parse("2026-s3").is_err());
    }

    #[test]
    fn test_parse_annual() {
        let settings = default_settings();
        let service = PeriodService::new(&settings);

        assert_eq!(service.parse("2026").unwrap(), ReportWindow::annual(2026));
        assert!(service.parse("26").is_err());
    }

    #[test]
    fn test_parse_relative() {
        let settings = default_settings();
        let service = PeriodService::new(&settings);

        let current = service.current_window();
        assert_eq!(service.parse("current").unwrap(), current);
        assert_eq!(service.parse("now").unwrap(), current);
        assert_eq!(
            service.parse("last").unwrap(),
            PeriodService::shift_window(current, -1)
        );
        assert_eq!(
            service.parse("next").unwrap(),
            PeriodService::shift_window(current, 1)
        );
    }

    #[test]
    fn test_parse_garbage() {
        let settings = default_settings();
        let service = PeriodService::new(&settings);

        for bad in ["", "banana", "2026-13", "2026-00", "2026-1-1", "q1-2026"] {
            let result = service.parse(bad);
            assert!(
                matches!(result, Err(DreError::Period(_))),
                "expected period error for '{}'",
                bad
            );
        }
    }

    #[test]
    fn test_parse_or_current_default() {
        let settings = default_settings();
        let service = PeriodService::new(&settings);

        assert_eq!(
            service.parse_or_current(None).unwrap(),
            service.current_window()
        );
    }

    #[test]
    fn test_shift_window_across_year() {
        let dec = ReportWindow::monthly(12, 2025);
        assert_eq!(
            PeriodService::shift_window(dec, 1),
            ReportWindow::monthly(1, 2026)
        );

        let q1 = ReportWindow::quarterly(1, 2026);
        assert_eq!(
            PeriodService::shift_window(q1, -1),
            ReportWindow::quarterly(10, 2025)
        );
    }

    #[test]
    fn test_window_for_date_uses_default_kind() {
        let mut settings = default_settings();
        settings.default_window = WindowKind::Quarterly;
        let service = PeriodService::new(&settings);

        let date = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        let window = service.window_for_date(date);
        assert_eq!(window.kind, WindowKind::Quarterly);
        assert!(window.contains(Some(date)));
    }
}
