use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::config::ColumnLayout;
use crate::models::{RawRow, RoleAssignment, ScoreMap, ScoringCriteria, SkillRecord};

/// Parses a cell as a score. Anything that is not a finite number becomes 0.
pub fn parse_score(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            debug!(cell = raw, "non-numeric score degraded to 0");
            0.0
        }
    }
}

pub fn clean_label(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

fn cell<'a>(row: &'a RawRow, column: &str) -> &'a str {
    let column = column.trim();
    row.iter()
        .find(|(key, _)| clean_label(key) == column)
        .map(|(_, value)| value.as_str())
        .unwrap_or("")
}

fn score_columns(row: &RawRow, identity: &[&str]) -> ScoreMap {
    row.iter()
        .filter_map(|(key, value)| {
            let key = clean_label(key);
            if key.is_empty() || identity.contains(&key.as_str()) {
                None
            } else {
                Some((key, parse_score(value)))
            }
        })
        .collect()
}

pub fn normalize_skills(rows: &[RawRow], layout: &ColumnLayout) -> Vec<SkillRecord> {
    let identity = [layout.skill_category.trim(), layout.skill_name.trim()];

    rows.iter()
        .filter_map(|row| {
            let category = clean_label(cell(row, &layout.skill_category));
            let name = clean_label(cell(row, &layout.skill_name));
            if category.is_empty() || name.is_empty() {
                debug!(category = %category, item = %name, "skipping skill row without category or item");
                return None;
            }
            Some(SkillRecord {
                category,
                name,
                scores_by_person: score_columns(row, &identity),
            })
        })
        .collect()
}

/// Collapses duplicate people: the last listed role wins, the first position is kept.
pub fn normalize_roles(rows: &[RawRow], layout: &ColumnLayout) -> Vec<RoleAssignment> {
    let mut assignments: Vec<RoleAssignment> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let person_name = clean_label(cell(row, &layout.person_name));
        if person_name.is_empty() {
            continue;
        }
        let role = clean_label(cell(row, &layout.role));

        if let Some(&index) = positions.get(&person_name) {
            warn!(
                person = %person_name,
                previous = %assignments[index].role,
                role = %role,
                "duplicate role assignment, keeping the last one"
            );
            assignments[index].role = role;
            continue;
        }

        positions.insert(person_name.clone(), assignments.len());
        assignments.push(RoleAssignment { person_name, role });
    }

    assignments
}

pub fn normalize_criteria(rows: &[RawRow], layout: &ColumnLayout) -> Vec<ScoringCriteria> {
    let identity = [layout.criteria_category.trim()];
    let mut seen = BTreeSet::new();

    rows.iter()
        .filter_map(|row| {
            let category = clean_label(cell(row, &layout.criteria_category));
            if category.is_empty() {
                return None;
            }
            if !seen.insert(category.clone()) {
                warn!(category = %category, "duplicate criteria row, lookups use the first one");
            }
            Some(ScoringCriteria {
                category,
                expected_by_role: score_columns(row, &identity),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn unparsable_scores_become_zero() {
        assert_eq!(parse_score("2.5"), 2.5);
        assert_eq!(parse_score(" 3 "), 3.0);
        assert_eq!(parse_score(""), 0.0);
        assert_eq!(parse_score("n/a"), 0.0);
        assert_eq!(parse_score("NaN"), 0.0);
        assert_eq!(parse_score("inf"), 0.0);
    }

    #[test]
    fn skill_rows_split_identity_and_person_columns() {
        let rows = vec![row(&[
            ("category", " Data "),
            ("item", "SQL"),
            ("Alice", "3"),
            (" Bob ", "oops"),
        ])];
        let skills = normalize_skills(&rows, &ColumnLayout::default());

        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].category, "Data");
        assert_eq!(skills[0].name, "SQL");
        assert_eq!(skills[0].scores_by_person.get("Alice"), Some(&3.0));
        assert_eq!(skills[0].scores_by_person.get("Bob"), Some(&0.0));
        assert_eq!(skills[0].scores_by_person.len(), 2);
    }

    #[test]
    fn blank_skill_rows_are_skipped_but_bad_cells_are_not() {
        let rows = vec![
            row(&[("category", ""), ("item", ""), ("Alice", "")]),
            row(&[("category", "Ops"), ("item", "Linux"), ("Alice", "x")]),
        ];
        let skills = normalize_skills(&rows, &ColumnLayout::default());
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].scores_by_person.get("Alice"), Some(&0.0));
    }

    #[test]
    fn skill_rows_need_both_category_and_item() {
        let rows = vec![
            row(&[("category", ""), ("item", "Orphan"), ("Alice", "3")]),
            row(&[("category", "Data"), ("item", "  "), ("Alice", "2")]),
            row(&[("category", "Data"), ("item", "SQL"), ("Alice", "1")]),
        ];
        let skills = normalize_skills(&rows, &ColumnLayout::default());

        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "SQL");
    }

    #[test]
    fn padded_column_names_still_match() {
        let layout = ColumnLayout {
            role: " role".to_string(),
            person_name: "name ".to_string(),
            ..ColumnLayout::default()
        };
        let rows = vec![row(&[("name", "Alice"), ("role", "DE")])];
        let roles = normalize_roles(&rows, &layout);

        assert_eq!(roles[0].person_name, "Alice");
        assert_eq!(roles[0].role, "DE");

        let layout = ColumnLayout {
            skill_category: "category ".to_string(),
            ..ColumnLayout::default()
        };
        let rows = vec![row(&[("category", "Data"), ("item", "SQL"), ("Alice", "2")])];
        let skills = normalize_skills(&rows, &layout);
        assert_eq!(skills[0].category, "Data");
        assert!(!skills[0].scores_by_person.contains_key("category"));
    }

    #[test]
    fn bom_prefixed_headers_still_match() {
        let rows = vec![row(&[("\u{feff}category", "Data"), ("item", "SQL")])];
        let skills = normalize_skills(&rows, &ColumnLayout::default());
        assert_eq!(skills[0].category, "Data");
        assert!(skills[0].scores_by_person.is_empty());
    }

    #[test]
    fn duplicate_people_keep_first_position_and_last_role() {
        let rows = vec![
            row(&[("name", "Alice"), ("role", "BA")]),
            row(&[("name", "Bob"), ("role", "DE")]),
            row(&[("name", "Alice "), ("role", " DS ")]),
            row(&[("name", ""), ("role", "DS")]),
        ];
        let roles = normalize_roles(&rows, &ColumnLayout::default());

        assert_eq!(
            roles,
            vec![
                RoleAssignment {
                    person_name: "Alice".to_string(),
                    role: "DS".to_string(),
                },
                RoleAssignment {
                    person_name: "Bob".to_string(),
                    role: "DE".to_string(),
                },
            ]
        );
    }

    #[test]
    fn criteria_are_trimmed_and_keyed_by_role() {
        let rows = vec![row(&[("category", " Data "), (" DE ", "2"), ("DS", "")])];
        let criteria = normalize_criteria(&rows, &ColumnLayout::default());

        assert_eq!(criteria[0].category, "Data");
        assert_eq!(criteria[0].expected_by_role.get("DE"), Some(&2.0));
        assert_eq!(criteria[0].expected_by_role.get("DS"), Some(&0.0));
    }

    #[test]
    fn duplicate_criteria_rows_are_kept_in_order() {
        let rows = vec![
            row(&[("category", "Data"), ("DE", "2")]),
            row(&[("category", "Data"), ("DE", "3")]),
        ];
        let criteria = normalize_criteria(&rows, &ColumnLayout::default());
        assert_eq!(criteria.len(), 2);
        assert_eq!(criteria[0].expected_by_role.get("DE"), Some(&2.0));
    }
}
