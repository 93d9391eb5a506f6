use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use loadwise::config::AppConfig;
use loadwise::engine::AnalyticsEngine;
use loadwise::error::ErrorSeverity;
use loadwise::export::{self, text, AssessmentReport, ExportFormat};
use loadwise::history::RunHistory;
use loadwise::import::ImportManager;
use loadwise::logging::{init_logging, LogFormat, LogLevel};
use loadwise::models::{AgeGroup, AthleteProfile, ExperienceTier, LoadAssessment};
use loadwise::quick_score::quick_score;
use loadwise::synthetic::{OverloadBlock, SyntheticConfig, SyntheticHistoryGenerator};

/// LoadWise - Training Load & Risk Analytics CLI
///
/// Computes acute and chronic training load, the acute:chronic workload
/// ratio, an injury risk score and recovery alerts from a run history.
#[derive(Parser)]
#[command(name = "loadwise")]
#[command(author = "LoadWise Contributors")]
#[command(version)]
#[command(about = "Training Load & Risk Analytics CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log level (error, warn, info, debug, trace); overrides -v and config
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format on stderr (pretty, json, compact); overrides config
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess training load and injury risk for one or more histories
    Assess {
        /// History file(s) (CSV or JSON); one athlete per file
        #[arg(short, long, num_args = 1..)]
        file: Vec<PathBuf>,

        /// Directory of history files to assess
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Experience tier (Beginner, Intermediate, Expert); overrides config
        #[arg(short, long)]
        experience: Option<String>,

        /// Age group (18-29, 30-39, 40-49, 50-59, 60+); overrides config
        #[arg(short, long)]
        age_group: Option<String>,

        /// Output format (table, json, text, csv)
        #[arg(short = 'F', long, default_value = "table")]
        format: String,

        /// Write the report to a file instead of the terminal
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a synthetic run history
    Generate {
        /// Number of calendar days to cover
        #[arg(short, long, default_value = "60")]
        days: usize,

        /// Random seed; the same seed reproduces the same history
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Last day of the history (YYYY-MM-DD, default today)
        #[arg(long)]
        end_date: Option<String>,

        /// Add an overload block over the most recent K days
        #[arg(long, value_name = "K")]
        overload_days: Option<usize>,

        /// Probability that a day has no session
        #[arg(long, default_value = "0.2")]
        rest_probability: f64,

        /// Output file path (.csv or .json)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Quick load score for a single run
    Quick {
        /// Average heart rate (bpm)
        #[arg(long)]
        heart_rate: f64,

        /// Average pace per mile (mm:ss)
        #[arg(short, long)]
        pace: String,

        /// Distance in miles
        #[arg(short, long)]
        distance: f64,
    },

    /// Configure application settings
    Config {
        /// Write a default configuration file
        #[arg(short, long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long)]
        force: bool,

        /// Print the active configuration
        #[arg(short, long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (app_config, config_error) = AppConfig::load_or_default(cli.config.as_deref());

    let mut log_config = app_config.logging.clone();
    if let Some(level) = cli.log_level {
        log_config.level = level;
    } else if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
        eprintln!("{}", format!("Log level: {}", log_config.level.as_str()).dimmed());
    }
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    init_logging(&log_config).context("Failed to initialize logging")?;

    if let Some(err) = config_error {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(AppConfig::default_config_path);
        tracing::warn!(
            path = %path.display(),
            error = %format!("{:#}", err),
            "Config file unusable, using defaults"
        );
    }

    match cli.command {
        Commands::Assess {
            file,
            dir,
            experience,
            age_group,
            format,
            output,
        } => {
            let mut profile = app_config.athlete;
            if let Some(experience) = experience {
                profile.experience_tier = ExperienceTier::parse(&experience);
            }
            if let Some(age_group) = age_group {
                profile.age_group = AgeGroup::parse(&age_group);
            }
            warn_unrecognized(&profile);

            let histories = load_histories(&file, dir.as_deref())?;
            let engine = AnalyticsEngine::with_config(app_config.engine.clone())
                .context("Invalid engine configuration")?;

            let inputs: Vec<(RunHistory, AthleteProfile)> = histories
                .iter()
                .map(|(_, history)| (history.clone(), profile))
                .collect();
            let assessments = engine.assess_batch(&inputs);

            let reports: Vec<AssessmentReport> = histories
                .iter()
                .zip(assessments)
                .map(|((source, history), assessment)| {
                    AssessmentReport::for_history(source.clone(), profile, history, assessment)
                })
                .collect();

            write_reports(&reports, &format, output.as_deref())?;
        }

        Commands::Generate {
            days,
            seed,
            end_date,
            overload_days,
            rest_probability,
            output,
        } => {
            if !(0.0..=1.0).contains(&rest_probability) {
                bail!("--rest-probability must be between 0 and 1");
            }

            let end_date = match end_date {
                Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .with_context(|| format!("Invalid end date '{}', expected YYYY-MM-DD", value))?,
                None => chrono::Local::now().date_naive(),
            };

            let config = SyntheticConfig {
                rest_day_probability: rest_probability,
                overload: overload_days.map(|days| OverloadBlock {
                    days,
                    ..OverloadBlock::default()
                }),
                ..SyntheticConfig::default()
            };

            let history =
                SyntheticHistoryGenerator::with_config(config).generate_seeded(days, end_date, seed);
            let format = ExportFormat::from_path(&output)
                .context("Output must end in .csv or .json")?;
            export::export_history(&history, format, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "{} {} sessions over {} days (seed {}) to {}",
                "✓ Generated".green().bold(),
                history.len(),
                days,
                seed,
                output.display()
            );
        }

        Commands::Quick {
            heart_rate,
            pace,
            distance,
        } => {
            let result = quick_score(heart_rate, &pace, distance)
                .map_err(|e| anyhow::anyhow!("Invalid input: {}", e))?;

            println!("{}", "Quick Load Score".cyan().bold());
            println!("  Score: {:.2}", result.score);
            println!("  Pace: {:.2} min/mile", result.pace_min_per_mile);
            println!("  {}", result.recommendation.message().bold());
        }

        Commands::Config { init, force, show } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(AppConfig::default_config_path);

            if init {
                if path.exists() && !force {
                    bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                let mut config = AppConfig::default();
                config.save_to_file(&path)?;
                println!(
                    "{} {}",
                    "✓ Wrote default configuration to".green(),
                    path.display()
                );
            }

            if show || !init {
                let rendered = toml::to_string_pretty(&app_config)
                    .context("Failed to render configuration")?;
                println!("{}", format!("# {}", path.display()).dimmed());
                println!("{}", rendered);
            }
        }
    }

    Ok(())
}

/// Import every requested history; one progress bar across files
fn load_histories(files: &[PathBuf], dir: Option<&Path>) -> Result<Vec<(String, RunHistory)>> {
    let manager = ImportManager::new();
    let mut histories = Vec::new();

    if let Some(dir) = dir {
        for (path, history) in manager
            .import_directory(dir)
            .with_context(|| format!("Failed to read {}", dir.display()))?
        {
            histories.push((display_name(&path), history));
        }
    }

    let pb = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    for file in files {
        let name = display_name(file);
        if let Some(pb) = &pb {
            pb.set_message(format!("Importing {}", name));
        }

        match manager.import_history(file) {
            Ok(history) => histories.push((name, history)),
            Err(e) if e.severity() == ErrorSeverity::Warning => {
                tracing::warn!(file = %file.display(), "Skipping history: {}", e.user_message());
            }
            Err(e) => {
                return Err(anyhow::anyhow!(e.user_message()))
                    .with_context(|| format!("Failed to import {}", file.display()));
            }
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if histories.is_empty() {
        bail!("No history to assess: pass --file or --dir");
    }
    Ok(histories)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn warn_unrecognized(profile: &AthleteProfile) {
    if profile.experience_tier == ExperienceTier::Unrecognized {
        eprintln!(
            "{}",
            "Unrecognized experience tier, using the expert threshold".yellow()
        );
    }
    if profile.age_group == AgeGroup::Unrecognized {
        eprintln!(
            "{}",
            "Unrecognized age group, no masters adjustment applied".yellow()
        );
    }
}

fn write_reports(reports: &[AssessmentReport], format: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        let format = if format.eq_ignore_ascii_case("table") {
            ExportFormat::from_path(path).context("Cannot infer export format from output path")?
        } else {
            ExportFormat::from_str(format)?
        };
        export::export_reports(reports, format, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} {}", "✓ Report written to".green(), path.display());
        return Ok(());
    }

    match format.to_lowercase().as_str() {
        "table" => print_table(reports),
        "json" => println!("{}", export::json::to_json_string(reports)?),
        "text" | "txt" => {
            for report in reports {
                println!("{}", text::render_report(report));
            }
        }
        "csv" => bail!("CSV output needs --output"),
        other => bail!("Unknown format '{}': use table, json, text or csv", other),
    }
    Ok(())
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Sessions")]
    sessions: usize,
    #[tabled(rename = "Acute")]
    acute: String,
    #[tabled(rename = "Chronic")]
    chronic: String,
    #[tabled(rename = "A:C Ratio")]
    ratio: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
    #[tabled(rename = "Warning Index")]
    warning_index: String,
    #[tabled(rename = "Risk")]
    risk: String,
}

impl From<&AssessmentReport> for SummaryRow {
    fn from(report: &AssessmentReport) -> Self {
        let a = &report.assessment;
        SummaryRow {
            source: report.source.clone(),
            sessions: report.sessions,
            acute: fmt_opt(a.acute_load, 1),
            chronic: fmt_opt(a.chronic_load, 1),
            ratio: fmt_opt(a.acute_chronic_ratio, 2),
            threshold: fmt_opt(a.overtraining_threshold, 2),
            warning_index: fmt_opt(a.overtraining_warning_index, 2),
            risk: format!("{}/100", a.injury_risk_score),
        }
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", precision, v))
}

fn print_table(reports: &[AssessmentReport]) {
    let rows: Vec<SummaryRow> = reports.iter().map(SummaryRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());

    println!("{}", "Training Load Assessment".cyan().bold());
    println!("{}", table);

    for report in reports {
        print_alerts(&report.source, &report.assessment);
    }
}

fn print_alerts(source: &str, assessment: &LoadAssessment) {
    println!();
    let header = if assessment.injury_risk_score >= 60 {
        source.red().bold()
    } else if assessment.injury_risk_score >= 20 {
        source.yellow().bold()
    } else {
        source.green().bold()
    };
    println!("{}", header);

    if !assessment.has_data() {
        println!("  {}", "Insufficient data: log a few runs first".dimmed());
        return;
    }
    if let Some(zone) = assessment.ratio_zone {
        println!("  {} {}", zone.description(), format!("({})", zone.recommendation()).dimmed());
    }
    if assessment.alerts.is_empty() {
        println!("  {}", "No alerts".green());
    }
    for alert in &assessment.alerts {
        println!("  {} {}", "⚠".yellow(), alert);
    }
}
