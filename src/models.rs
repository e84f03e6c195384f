use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Person (or role) name to numeric score.
pub type ScoreMap = BTreeMap<String, f64>;

/// One source row, header name to raw cell text.
pub type RawRow = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillRecord {
    pub category: String,
    pub name: String,
    pub scores_by_person: ScoreMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleAssignment {
    pub person_name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringCriteria {
    pub category: String,
    pub expected_by_role: ScoreMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedSkill {
    pub category: String,
    pub skill_name: String,
    #[serde(serialize_with = "rounded")]
    pub actual_score: f64,
    #[serde(serialize_with = "rounded")]
    pub expected_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSkillProfile {
    pub name: String,
    /// Empty when the person has no role assignment.
    pub role: String,
    pub skills: Vec<ExpandedSkill>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    pub skill_name: String,
    #[serde(serialize_with = "rounded")]
    pub actual_score: f64,
    #[serde(serialize_with = "rounded")]
    pub expected_score: f64,
    #[serde(serialize_with = "rounded")]
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGapGroup {
    pub category: String,
    pub skills: Vec<SkillGap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGap {
    pub category: String,
    #[serde(serialize_with = "rounded")]
    pub actual_average: f64,
    #[serde(serialize_with = "rounded")]
    pub expected_average: f64,
    #[serde(serialize_with = "rounded")]
    pub gap: f64,
    /// Distinct contributing people; only set for team views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAverage {
    pub category: String,
    #[serde(serialize_with = "rounded")]
    pub average: f64,
}

/// Everything a presentation layer needs from one load cycle.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedReport {
    pub skills: Vec<SkillRecord>,
    pub profiles: Vec<MemberSkillProfile>,
    pub category_averages: Vec<CategoryAverage>,
    pub criteria: Vec<ScoringCriteria>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}
