use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::join::expected_score;
use crate::models::{
    CategoryAverage, CategoryGap, MemberSkillProfile, ScoringCriteria, SkillGap,
    SkillGapGroup, SkillRecord,
};

#[derive(Default)]
struct Totals {
    actual: f64,
    expected: f64,
    count: usize,
}

/// Accumulates values per category in first-encounter order.
struct CategoryTally<T> {
    order: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T: Default> CategoryTally<T> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn entry(&mut self, category: &str) -> &mut T {
        let category = category.trim();
        if !self.index.contains_key(category) {
            self.index.insert(category.to_string(), self.order.len());
            self.order.push((category.to_string(), T::default()));
        }
        let position = self.index[category];
        &mut self.order[position].1
    }

    fn into_vec(self) -> Vec<(String, T)> {
        self.order
    }
}

// Descending by raw gap; sort_by is stable so ties keep encounter order.
fn by_gap_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn per_skill_gap(profile: &MemberSkillProfile) -> Vec<SkillGapGroup> {
    let mut tally: CategoryTally<Vec<SkillGap>> = CategoryTally::new();

    for skill in &profile.skills {
        tally.entry(&skill.category).push(SkillGap {
            skill_name: skill.skill_name.clone(),
            actual_score: skill.actual_score,
            expected_score: skill.expected_score,
            gap: skill.actual_score - skill.expected_score,
        });
    }

    tally
        .into_vec()
        .into_iter()
        .map(|(category, mut skills)| {
            skills.sort_by(|a, b| by_gap_desc(a.gap, b.gap));
            SkillGapGroup { category, skills }
        })
        .collect()
}

pub fn per_category_for_person(profile: &MemberSkillProfile) -> Vec<CategoryGap> {
    let mut tally: CategoryTally<Totals> = CategoryTally::new();

    for skill in &profile.skills {
        let entry = tally.entry(&skill.category);
        entry.actual += skill.actual_score;
        entry.expected += skill.expected_score;
        entry.count += 1;
    }

    let mut gaps: Vec<CategoryGap> = tally
        .into_vec()
        .into_iter()
        .filter(|(_, totals)| totals.count > 0)
        .map(|(category, totals)| {
            let actual_average = totals.actual / totals.count as f64;
            let expected_average = totals.expected / totals.count as f64;
            CategoryGap {
                category,
                actual_average,
                expected_average,
                gap: actual_average - expected_average,
                member_count: None,
            }
        })
        .collect();

    gaps.sort_by(|a, b| by_gap_desc(a.gap, b.gap));
    gaps
}

pub fn in_team(profile: &MemberSkillProfile, role: &str) -> bool {
    let profile_role = profile.role.trim();
    !profile_role.is_empty() && profile_role == role.trim()
}

pub fn team_members<'a>(profiles: &'a [MemberSkillProfile], role: &str) -> Vec<&'a str> {
    profiles
        .iter()
        .filter(|profile| in_team(profile, role))
        .map(|profile| profile.name.as_str())
        .collect()
}

/// Team view: actual scores are averaged over every (person, skill) pair of the
/// role's members; the expected score comes straight from the criteria.
pub fn per_category_for_team(
    profiles: &[MemberSkillProfile],
    role: &str,
    criteria: &[ScoringCriteria],
) -> Vec<CategoryGap> {
    #[derive(Default)]
    struct TeamTotals {
        actual: f64,
        count: usize,
        members: BTreeSet<String>,
    }

    let mut tally: CategoryTally<TeamTotals> = CategoryTally::new();

    for profile in profiles.iter().filter(|profile| in_team(profile, role)) {
        for skill in &profile.skills {
            let entry = tally.entry(&skill.category);
            entry.actual += skill.actual_score;
            entry.count += 1;
            entry.members.insert(profile.name.clone());
        }
    }

    let mut gaps: Vec<CategoryGap> = tally
        .into_vec()
        .into_iter()
        .filter(|(_, totals)| totals.count > 0)
        .map(|(category, totals)| {
            let actual_average = totals.actual / totals.count as f64;
            let expected_average = expected_score(criteria, &category, role);
            CategoryGap {
                actual_average,
                expected_average,
                gap: actual_average - expected_average,
                member_count: Some(totals.members.len()),
                category,
            }
        })
        .collect();

    gaps.sort_by(|a, b| by_gap_desc(a.gap, b.gap));
    gaps
}

pub fn global_category_average(skills: &[SkillRecord]) -> Vec<CategoryAverage> {
    let mut tally: CategoryTally<Totals> = CategoryTally::new();

    for skill in skills {
        let entry = tally.entry(&skill.category);
        for score in skill.scores_by_person.values() {
            entry.actual += score;
            entry.count += 1;
        }
    }

    tally
        .into_vec()
        .into_iter()
        .filter(|(_, totals)| totals.count > 0)
        .map(|(category, totals)| CategoryAverage {
            category,
            average: totals.actual / totals.count as f64,
        })
        .collect()
}

/// Distinct role labels offered by the criteria, sorted.
pub fn roles(criteria: &[ScoringCriteria]) -> Vec<String> {
    criteria
        .iter()
        .flat_map(|row| row.expected_by_role.keys())
        .map(|role| role.trim())
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
