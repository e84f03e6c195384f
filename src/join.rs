use tracing::debug;

use crate::models::{
    ExpandedSkill, LoadedReport, MemberSkillProfile, RoleAssignment, ScoringCriteria, SkillRecord,
};

/// Expected score for a (category, role) pair, compared trimmed. The first
/// criteria row for a category wins; any miss yields 0.
pub fn expected_score(criteria: &[ScoringCriteria], category: &str, role: &str) -> f64 {
    let category = category.trim();
    let role = role.trim();

    let Some(row) = criteria.iter().find(|c| c.category.trim() == category) else {
        debug!(category, "no scoring criteria for category");
        return 0.0;
    };

    match row
        .expected_by_role
        .iter()
        .find(|(label, _)| label.trim() == role)
    {
        Some((_, score)) => *score,
        None => {
            debug!(category, role, "no expected score for role");
            0.0
        }
    }
}

/// Builds one person's profile. A person without a role expects 0 everywhere.
pub fn profile_for(
    skills: &[SkillRecord],
    criteria: &[ScoringCriteria],
    name: &str,
    role: Option<&str>,
) -> MemberSkillProfile {
    let role = role.map(str::trim).unwrap_or("");

    let expanded = skills
        .iter()
        .map(|skill| ExpandedSkill {
            category: skill.category.trim().to_string(),
            skill_name: skill.name.clone(),
            actual_score: skill.scores_by_person.get(name).copied().unwrap_or(0.0),
            expected_score: if role.is_empty() {
                0.0
            } else {
                expected_score(criteria, &skill.category, role)
            },
        })
        .collect();

    MemberSkillProfile {
        name: name.to_string(),
        role: role.to_string(),
        skills: expanded,
    }
}

pub fn join(
    skills: &[SkillRecord],
    roles: &[RoleAssignment],
    criteria: &[ScoringCriteria],
) -> Vec<MemberSkillProfile> {
    roles
        .iter()
        .map(|assignment| {
            profile_for(
                skills,
                criteria,
                &assignment.person_name,
                Some(&assignment.role),
            )
        })
        .collect()
}

fn in_skills_source(report: &LoadedReport, name: &str) -> bool {
    report
        .skills
        .iter()
        .any(|skill| skill.scores_by_person.contains_key(name))
}

/// Finds a joined profile by name. People who only appear in the skills source
/// get a role-less profile built on the spot.
pub fn lookup_profile(report: &LoadedReport, name: &str) -> Option<MemberSkillProfile> {
    let name = name.trim();
    if let Some(profile) = report.profiles.iter().find(|profile| profile.name == name) {
        return Some(profile.clone());
    }

    in_skills_source(report, name).then(|| profile_for(&report.skills, &report.criteria, name, None))
}

/// Scores a known person against an arbitrary role instead of their assigned one.
pub fn profile_against_role(
    report: &LoadedReport,
    name: &str,
    role: &str,
) -> Option<MemberSkillProfile> {
    let name = name.trim();
    let known = report.profiles.iter().any(|profile| profile.name == name)
        || in_skills_source(report, name);

    known.then(|| profile_for(&report.skills, &report.criteria, name, Some(role)))
}
