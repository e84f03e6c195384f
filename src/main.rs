use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

mod aggregate;
mod config;
mod join;
mod models;
mod normalize;
mod report;
mod source;

use config::{ColumnLayout, SourcePaths};

#[derive(Parser)]
#[command(name = "skill-gap-report")]
#[command(about = "Per-person and per-team skill gap reports from score, role and criteria tables", long_about = None)]
struct Cli {
    #[command(flatten)]
    sources: SourcePaths,
    #[command(flatten)]
    layout: ColumnLayout,
    /// Emit debug diagnostics (degraded cells, lookup misses) on stderr
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Category averages across everyone, plus the known roles and people
    Overview,
    /// Category gaps for one person
    Person {
        #[arg(long)]
        name: String,
        /// Include the per-skill breakdown
        #[arg(long)]
        detail: bool,
        /// Compare against this role's expectations instead of the assigned role
        #[arg(long)]
        against_role: Option<String>,
    },
    /// Category gaps for everyone holding a role
    Team {
        #[arg(long)]
        role: String,
    },
    /// Write the full report covering every person and role
    Report {
        #[arg(long, default_value = "skill-gap-report.md")]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;

    let loaded = match source::load_report(&cli.sources, &cli.layout).await {
        Ok(loaded) => loaded,
        Err(err) => {
            error!(kind = %err.kind(), "source load failed, no report produced");
            return Err(err).context("failed to load skill gap sources");
        }
    };

    match cli.command {
        Commands::Overview => {
            let mut output = String::new();
            report::write_overview(
                &mut output,
                &loaded.category_averages,
                &aggregate::roles(&loaded.criteria),
            );
            output.push('\n');
            report::write_people(&mut output, &loaded.profiles);
            print!("{output}");
        }
        Commands::Person {
            name,
            detail,
            against_role,
        } => {
            let profile = match against_role.as_deref() {
                Some(role) => join::profile_against_role(&loaded, &name, role),
                None => join::lookup_profile(&loaded, &name),
            }
            .with_context(|| format!("{name} appears in neither the roles nor the skills source"))?;

            let mut output = String::new();
            report::write_person(&mut output, &report::person_section(&profile), detail);
            print!("{output}");
        }
        Commands::Team { role } => {
            let section = report::team_section(&loaded, &role);
            let mut output = String::new();
            report::write_team(&mut output, &section);
            print!("{output}");
        }
        Commands::Report { out, format } => {
            let full = report::full_report(&loaded, chrono::Utc::now());
            let rendered = match format {
                Format::Markdown => report::build_markdown(&full),
                Format::Json => serde_json::to_string_pretty(&full)?,
            };
            std::fs::write(&out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_accepts_detail_and_against_role() {
        let cli = Cli::try_parse_from([
            "skill-gap-report",
            "--skills",
            "raw.csv",
            "--roles",
            "job.csv",
            "--criteria",
            "criteria.csv",
            "person",
            "--name",
            "Avery",
            "--detail",
            "--against-role",
            "DS",
        ])
        .unwrap();

        match cli.command {
            Commands::Person {
                name,
                detail,
                against_role,
            } => {
                assert_eq!(name, "Avery");
                assert!(detail);
                assert_eq!(against_role.as_deref(), Some("DS"));
            }
            _ => panic!("expected the person subcommand"),
        }
    }
}
