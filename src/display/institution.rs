//! Entity and institution display formatting
//!
//! Formats entities and the institutions they own for terminal output.

use crate::models::{Entity, Institution, Money};

/// Format a list of entities as a table
pub fn format_entity_list(entities: &[Entity]) -> String {
    if entities.is_empty() {
        return "No entities found.".to_string();
    }

    let name_width = entities
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<10}  {}\n",
        "Name",
        "Kind",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<10}  {:-<12}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for entity in entities {
        output.push_str(&format!(
            "{:<name_width$}  {:<10}  {}\n",
            entity.name,
            entity.kind.to_string(),
            entity.id,
            name_width = name_width,
        ));
    }

    output
}

/// Format a list of institutions with their owning entities as a table
pub fn format_institution_list(institutions: &[Institution], entities: &[Entity]) -> String {
    if institutions.is_empty() {
        return "No institutions found.".to_string();
    }

    let name_width = institutions
        .iter()
        .map(|i| i.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<10}  {:<20}  {:>14}\n",
        "Name",
        "Kind",
        "Entity",
        "Opening",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<10}  {:-<20}  {:->14}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for institution in institutions {
        let entity_name = entities
            .iter()
            .find(|e| e.id == institution.entity_id)
            .map(|e| e.name.as_str())
            .unwrap_or("(unknown)");

        output.push_str(&format!(
            "{:<name_width$}  {:<10}  {:<20}  {:>14}\n",
            institution.name,
            institution.kind.to_string(),
            entity_name,
            institution.opening_balance.to_string(),
            name_width = name_width,
        ));
    }

    output
}

/// Format a single institution's details
pub fn format_institution_details(
    institution: &Institution,
    entity: Option<&Entity>,
    balance: Money,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Institution: {}\n", institution.name));
    output.push_str(&format!("  Kind:             {}\n", institution.kind));
    output.push_str(&format!("  ID:               {}\n", institution.id));
    if let Some(entity) = entity {
        output.push_str(&format!("  Entity:           {}\n", entity.name));
    }
    output.push('\n');
    output.push_str(&format!(
        "  Opening Balance:  {}\n",
        institution.opening_balance
    ));
    output.push_str(&format!("  Current Balance:  {}\n", balance));
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        institution.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityKind, InstitutionKind};

    #[test]
    fn test_format_entity_list() {
        let entities = vec![
            Entity::new("Household", EntityKind::Personal),
            Entity::new("Main holding", EntityKind::Business),
        ];

        let output = format_entity_list(&entities);
        assert!(output.contains("Household"));
        assert!(output.contains("Main holding"));
        assert!(output.contains("personal"));
        assert!(output.contains("business"));
    }

    #[test]
    fn test_format_empty_entity_list() {
        let output = format_entity_list(&[]);
        assert!(output.contains("No entities found"));
    }

    #[test]
    fn test_format_institution_list_resolves_entity() {
        let entity = Entity::new("Household", EntityKind::Personal);
        let institutions = vec![Institution::new(
            "Main bank",
            InstitutionKind::Bank,
            entity.id,
            Money::from_units(1_000),
        )];

        let output = format_institution_list(&institutions, std::slice::from_ref(&entity));
        assert!(output.contains("Main bank"));
        assert!(output.contains("Household"));
        assert!(output.contains("$1000.00"));
    }

    #[test]
    fn test_format_institution_details() {
        let entity = Entity::new("Household", EntityKind::Personal);
        let institution = Institution::new(
            "Brokerage",
            InstitutionKind::Brokerage,
            entity.id,
            Money::zero(),
        );

        let output =
            format_institution_details(&institution, Some(&entity), Money::from_units(250));
        assert!(output.contains("Brokerage"));
        assert!(output.contains("Household"));
        assert!(output.contains("Current Balance:  $250.00"));
    }
}
