use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use walkdir::WalkDir;

use crate::config::{discover_config, QualityConfig};
use crate::report::{QualityGrade, QualityReport, QualityReportGenerator};

#[derive(Parser, Debug)]
#[command(name = "qualitymap")]
#[command(about = "Code quality scoring and remediation roadmap generator", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score parsed source facts and print the quality report
    Analyze {
        /// Facts files, or directories searched for *.json facts
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Configuration file (defaults to the nearest .qualitymap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "summary")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort when the analysis takes longer than this many seconds
        #[arg(long = "timeout-secs")]
        timeout_secs: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Summary,
}

/// Log filter for the given `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Read every facts document under `paths`, keyed by path.
pub fn collect_sources(paths: &[PathBuf]) -> Result<BTreeMap<PathBuf, String>> {
    let mut sources = BTreeMap::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry =
                    entry.with_context(|| format!("Failed to walk {}", path.display()))?;
                if entry.file_type().is_file() && is_facts_file(entry.path()) {
                    read_into(&mut sources, entry.path())?;
                }
            }
        } else {
            read_into(&mut sources, path)?;
        }
    }
    if sources.is_empty() {
        bail!("No facts files found in the given paths");
    }
    Ok(sources)
}

fn is_facts_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn read_into(sources: &mut BTreeMap<PathBuf, String>, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    sources.insert(path.to_path_buf(), contents);
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<QualityConfig> {
    match explicit {
        Some(path) => QualityConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Ok(discover_config(&cwd))
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            paths,
            config,
            format,
            output,
            timeout_secs,
        } => {
            let config = load_config(config.as_deref())?;
            if let Err(err) = config.validate() {
                tracing::warn!(error = %err, "Configuration did not validate; continuing");
            }
            let sources = collect_sources(&paths)?;
            let generator = QualityReportGenerator::new(config);

            let report = match timeout_secs {
                Some(secs) => {
                    generator
                        .generate_with_deadline(sources, Duration::from_secs(secs))
                        .await?
                }
                None => {
                    generator
                        .generate_until(sources, std::future::pending())
                        .await?
                }
            };

            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
                OutputFormat::Summary => render_summary(&report),
            };
            match output {
                Some(path) => std::fs::write(&path, rendered)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{rendered}"),
            }
            Ok(())
        }
    }
}

fn colored_grade(grade: QualityGrade) -> String {
    let label = grade.to_string();
    match grade {
        QualityGrade::Excellent => label.green().bold().to_string(),
        QualityGrade::Good => label.blue().bold().to_string(),
        QualityGrade::Fair => label.yellow().bold().to_string(),
        QualityGrade::Poor => label.red().bold().to_string(),
    }
}

/// Human-readable summary: component table plus the top recommendations.
pub fn render_summary(report: &QualityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {:.1}/100 ({})",
        "Overall quality:".bold(),
        report.overall_score,
        colored_grade(report.grade)
    );
    let _ = writeln!(
        out,
        "Files analyzed: {} ({} skipped)",
        report.files_analyzed,
        report.parse_failures.len()
    );

    let mut scores = Table::new();
    scores
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Component", "Score", "Status"]);
    for indicator in &report.dashboard.health {
        scores.add_row(vec![
            Cell::new(indicator.component),
            Cell::new(format!("{:.1}", indicator.score)),
            Cell::new(format!("{} {}", indicator.icon, indicator.status)),
        ]);
    }
    let _ = writeln!(out, "\n{scores}");

    for alert in &report.dashboard.alerts {
        let _ = writeln!(out, "{} {}", "!".red().bold(), alert.message);
    }

    if !report.recommendations.is_empty() {
        let mut recs = Table::new();
        recs.load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["#", "Priority", "Recommendation", "Location", "Hours"]);
        for (rank, rec) in report.recommendations.iter().take(10).enumerate() {
            recs.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(rec.priority),
                Cell::new(&rec.title),
                Cell::new(&rec.location),
                Cell::new(format!("{:.1}", rec.effort_hours)),
            ]);
        }
        let _ = writeln!(out, "\n{recs}");
    }

    if let Some(summary) = &report.executive_summary {
        let _ = writeln!(out, "\n{}", summary.headline);
    }
    out
}
