use crate::domain::{BeneficiaryRow, Project, ProjectId, SENTINEL};
use serde::Serialize;
use std::collections::BTreeMap;

/// A beneficiary table row with its project resolved to a name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub row: BeneficiaryRow,
    pub project_name: String,
}

impl RosterEntry {
    /// Dangling or missing project references resolve to `-`.
    pub fn resolve(row: BeneficiaryRow, projects: &BTreeMap<ProjectId, String>) -> Self {
        let project_name = row
            .project_id
            .and_then(|id| projects.get(&id).cloned())
            .unwrap_or_else(|| SENTINEL.to_string());
        Self { row, project_name }
    }

    /// Case-insensitive substring match against every displayed column.
    pub fn matches(&self, term: &str) -> bool {
        let Some(needle) = needle(term) else {
            return true;
        };
        self.row.id.to_string().contains(&needle)
            || self
                .row
                .text_columns()
                .iter()
                .any(|column| column.to_lowercase().contains(&needle))
            || self.project_name.to_lowercase().contains(&needle)
    }
}

pub fn project_matches(project: &Project, term: &str) -> bool {
    let Some(needle) = needle(term) else {
        return true;
    };
    project.id.to_string().contains(&needle)
        || project.name.to_lowercase().contains(&needle)
        || project.category_label().to_lowercase().contains(&needle)
}

fn needle(term: &str) -> Option<String> {
    let term = term.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectCategory;

    fn row(id: i64, lname: &str, project_id: Option<ProjectId>) -> BeneficiaryRow {
        BeneficiaryRow {
            id,
            lname: lname.into(),
            fname: "JUAN".into(),
            mname: "-".into(),
            suffix: "-".into(),
            gender: "MALE".into(),
            street: "-".into(),
            barangay: "POBLACION".into(),
            contactno: "-".into(),
            project_id,
        }
    }

    #[test]
    fn resolves_project_names() {
        let projects = BTreeMap::from([(1, "Rice Retail".to_string())]);
        let entry = RosterEntry::resolve(row(1, "DELACRUZ", Some(1)), &projects);
        assert_eq!(entry.project_name, "Rice Retail");

        let dangling = RosterEntry::resolve(row(2, "REYES", Some(9)), &projects);
        assert_eq!(dangling.project_name, "-");

        let unassigned = RosterEntry::resolve(row(3, "CRUZ", None), &projects);
        assert_eq!(unassigned.project_name, "-");
    }

    #[test]
    fn search_spans_all_columns() {
        let projects = BTreeMap::from([(1, "Rice Retail".to_string())]);
        let entry = RosterEntry::resolve(row(12, "DELACRUZ", Some(1)), &projects);

        assert!(entry.matches(""));
        assert!(entry.matches("  "));
        assert!(entry.matches("delacruz"));
        assert!(entry.matches("poblacion"));
        assert!(entry.matches("rice"));
        assert!(entry.matches("12"));
        assert!(!entry.matches("santos"));
    }

    #[test]
    fn project_search() {
        let project = Project {
            id: 3,
            name: "Welding NC II".into(),
            category: Some(ProjectCategory::SkillsTraining),
        };
        assert!(project_matches(&project, "welding"));
        assert!(project_matches(&project, "skills"));
        assert!(project_matches(&project, "3"));
        assert!(!project_matches(&project, "referral"));
    }

    #[test]
    fn serializes_flat() {
        let entry = RosterEntry::resolve(row(1, "DELACRUZ", None), &BTreeMap::new());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["lname"], "DELACRUZ");
        assert_eq!(json["project_name"], "-");
    }
}
