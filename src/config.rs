use std::path::PathBuf;

use clap::Args;

/// Header names of the identity columns in each source table.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ColumnLayout {
    #[arg(long = "skills-category-column", env = "SKILLGAP_SKILLS_CATEGORY_COLUMN", default_value = "category")]
    pub skill_category: String,
    #[arg(long = "skills-item-column", env = "SKILLGAP_SKILLS_ITEM_COLUMN", default_value = "item")]
    pub skill_name: String,
    #[arg(long = "roles-name-column", env = "SKILLGAP_ROLES_NAME_COLUMN", default_value = "name")]
    pub person_name: String,
    #[arg(long = "roles-role-column", env = "SKILLGAP_ROLES_ROLE_COLUMN", default_value = "role")]
    pub role: String,
    #[arg(long = "criteria-category-column", env = "SKILLGAP_CRITERIA_CATEGORY_COLUMN", default_value = "category")]
    pub criteria_category: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            skill_category: "category".to_string(),
            skill_name: "item".to_string(),
            person_name: "name".to_string(),
            role: "role".to_string(),
            criteria_category: "category".to_string(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SourcePaths {
    /// Skill scores: category, item, then one column per person
    #[arg(long, env = "SKILLGAP_SKILLS")]
    pub skills: PathBuf,
    /// Role assignments: name, role
    #[arg(long, env = "SKILLGAP_ROLES")]
    pub roles: PathBuf,
    /// Scoring criteria: category, then one column per role
    #[arg(long, env = "SKILLGAP_CRITERIA")]
    pub criteria: PathBuf,
}
