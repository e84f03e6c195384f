use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::aggregate::global_category_average;
use crate::config::{ColumnLayout, SourcePaths};
use crate::join::join;
use crate::models::{LoadedReport, RawRow};
use crate::normalize::{normalize_criteria, normalize_roles, normalize_skills};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Skills,
    Roles,
    Criteria,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Skills => "skills",
            SourceKind::Roles => "roles",
            SourceKind::Criteria => "criteria",
        };
        f.write_str(label)
    }
}

/// A source could not be fetched. Fatal for the whole load; no partial report.
#[derive(Debug, Error)]
pub enum SourceLoadError {
    #[error("failed to open {kind} source {}", .path.display())]
    Io {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {kind} source {}", .path.display())]
    Csv {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{kind} source reader did not complete")]
    Task {
        kind: SourceKind,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl SourceLoadError {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceLoadError::Io { kind, .. }
            | SourceLoadError::Csv { kind, .. }
            | SourceLoadError::Task { kind, .. } => *kind,
        }
    }
}

/// Reads header-delimited rows. Short records simply lack the trailing cells.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn read_source(kind: SourceKind, path: &Path) -> Result<Vec<RawRow>, SourceLoadError> {
    let file = File::open(path).map_err(|source| SourceLoadError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    read_rows(file).map_err(|source| SourceLoadError::Csv {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

async fn fetch(kind: SourceKind, path: PathBuf) -> Result<Vec<RawRow>, SourceLoadError> {
    tokio::task::spawn_blocking(move || read_source(kind, &path))
        .await
        .map_err(|source| SourceLoadError::Task { kind, source })?
}

/// Normalizes, joins and summarizes already-fetched rows.
pub fn assemble(
    skill_rows: &[RawRow],
    role_rows: &[RawRow],
    criteria_rows: &[RawRow],
    layout: &ColumnLayout,
) -> LoadedReport {
    let skills = normalize_skills(skill_rows, layout);
    let roles = normalize_roles(role_rows, layout);
    let criteria = normalize_criteria(criteria_rows, layout);

    let profiles = join(&skills, &roles, &criteria);
    let category_averages = global_category_average(&skills);

    info!(
        skills = skills.len(),
        people = profiles.len(),
        categories = criteria.len(),
        "report assembled"
    );

    LoadedReport {
        skills,
        profiles,
        category_averages,
        criteria,
    }
}

/// Fetches the three sources concurrently; any single failure aborts the load.
pub async fn load_report(
    paths: &SourcePaths,
    layout: &ColumnLayout,
) -> Result<LoadedReport, SourceLoadError> {
    info!(
        skills = %paths.skills.display(),
        roles = %paths.roles.display(),
        criteria = %paths.criteria.display(),
        "loading sources"
    );

    let (skill_rows, role_rows, criteria_rows) = tokio::try_join!(
        fetch(SourceKind::Skills, paths.skills.clone()),
        fetch(SourceKind::Roles, paths.roles.clone()),
        fetch(SourceKind::Criteria, paths.criteria.clone()),
    )?;

    Ok(assemble(&skill_rows, &role_rows, &criteria_rows, layout))
}
