use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate;
use crate::models::{
    round2, CategoryAverage, CategoryGap, LoadedReport, MemberSkillProfile, SkillGapGroup,
};

#[derive(Debug, Serialize)]
pub struct PersonSection<'a> {
    pub name: &'a str,
    pub role: &'a str,
    pub categories: Vec<CategoryGap>,
    pub skills: Vec<SkillGapGroup>,
}

#[derive(Debug, Serialize)]
pub struct TeamSection<'a> {
    pub role: String,
    pub members: Vec<&'a str>,
    pub categories: Vec<CategoryGap>,
}

#[derive(Debug, Serialize)]
pub struct FullReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub category_averages: &'a [CategoryAverage],
    pub roles: Vec<String>,
    pub people: Vec<PersonSection<'a>>,
    pub teams: Vec<TeamSection<'a>>,
}

pub fn person_section(profile: &MemberSkillProfile) -> PersonSection<'_> {
    PersonSection {
        name: &profile.name,
        role: &profile.role,
        categories: aggregate::per_category_for_person(profile),
        skills: aggregate::per_skill_gap(profile),
    }
}

pub fn team_section<'a>(report: &'a LoadedReport, role: &str) -> TeamSection<'a> {
    TeamSection {
        role: role.trim().to_string(),
        members: aggregate::team_members(&report.profiles, role),
        categories: aggregate::per_category_for_team(&report.profiles, role, &report.criteria),
    }
}

pub fn full_report(report: &LoadedReport, generated_at: DateTime<Utc>) -> FullReport<'_> {
    let roles = aggregate::roles(&report.criteria);
    let teams = roles.iter().map(|role| team_section(report, role)).collect();

    FullReport {
        generated_at,
        category_averages: &report.category_averages,
        roles,
        people: report.profiles.iter().map(person_section).collect(),
        teams,
    }
}

pub fn format_gap(gap: f64) -> String {
    let gap = round2(gap);
    if gap > 0.0 {
        format!("+{gap:.2} (surplus)")
    } else if gap < 0.0 {
        format!("{gap:.2} (shortfall)")
    } else {
        "0.00".to_string()
    }
}

pub fn write_overview(output: &mut String, averages: &[CategoryAverage], roles: &[String]) {
    let _ = writeln!(output, "## Category Averages");
    if averages.is_empty() {
        let _ = writeln!(output, "No skill scores recorded.");
    } else {
        for average in averages {
            let _ = writeln!(output, "- {}: {:.2}", average.category, round2(average.average));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Roles");
    if roles.is_empty() {
        let _ = writeln!(output, "No roles found in the scoring criteria.");
    } else {
        let _ = writeln!(output, "{}", roles.join(", "));
    }
}

pub fn write_people(output: &mut String, profiles: &[MemberSkillProfile]) {
    let _ = writeln!(output, "## People");
    if profiles.is_empty() {
        let _ = writeln!(output, "No role assignments found.");
    }
    for profile in profiles {
        let role = if profile.role.is_empty() {
            "no role"
        } else {
            &profile.role
        };
        let _ = writeln!(output, "- {} ({})", profile.name, role);
    }
}

pub fn write_person(output: &mut String, section: &PersonSection<'_>, include_skills: bool) {
    let role = if section.role.is_empty() {
        "no role"
    } else {
        section.role
    };
    let _ = writeln!(output, "### {} ({})", section.name, role);

    if section.categories.is_empty() {
        let _ = writeln!(output, "No skills recorded.");
        return;
    }

    for gap in &section.categories {
        let _ = writeln!(
            output,
            "- {}: actual {:.2} vs expected {:.2}, gap {}",
            gap.category,
            round2(gap.actual_average),
            round2(gap.expected_average),
            format_gap(gap.gap)
        );
    }

    if !include_skills {
        return;
    }

    for group in &section.skills {
        let _ = writeln!(output);
        let _ = writeln!(output, "#### {}", group.category);
        for skill in &group.skills {
            let _ = writeln!(
                output,
                "- {}: {:.2} / {:.2}, gap {}",
                skill.skill_name,
                round2(skill.actual_score),
                round2(skill.expected_score),
                format_gap(skill.gap)
            );
        }
    }
}

pub fn write_team(output: &mut String, section: &TeamSection<'_>) {
    let _ = writeln!(output, "### {} team", section.role);

    if section.members.is_empty() {
        let _ = writeln!(output, "No members hold this role.");
        return;
    }

    let _ = writeln!(output, "Members: {}", section.members.join(", "));
    for gap in &section.categories {
        let _ = writeln!(
            output,
            "- {}: actual {:.2} vs expected {:.2}, gap {} across {} members",
            gap.category,
            round2(gap.actual_average),
            round2(gap.expected_average),
            format_gap(gap.gap),
            gap.member_count.unwrap_or(0)
        );
    }
}

pub fn build_markdown(full: &FullReport<'_>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Skill Gap Report");
    let _ = writeln!(
        output,
        "Generated {} for {} people",
        full.generated_at.format("%Y-%m-%d %H:%M UTC"),
        full.people.len()
    );
    let _ = writeln!(output);
    write_overview(&mut output, full.category_averages, &full.roles);

    let _ = writeln!(output);
    let _ = writeln!(output, "## People");
    if full.people.is_empty() {
        let _ = writeln!(output, "No role assignments found.");
    }
    for person in &full.people {
        let _ = writeln!(output);
        write_person(&mut output, person, true);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Teams");
    if full.teams.is_empty() {
        let _ = writeln!(output, "No roles found in the scoring criteria.");
    }
    for team in &full.teams {
        let _ = writeln!(output);
        write_team(&mut output, team);
    }

    output
}
