//! # AstraMech
//!
//! Company efficiency analysis: KPI calculation against industry
//! benchmarks, as a CLI and an HTTP server.

use astramech::api::{self, AppState};
use astramech::cli::{self, ProfileAnswers};
use astramech::config::{AppConfig, ConfigOverrides};
use astramech_core::{BenchmarkManager, BenchmarkSource, KpiCalculator};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "astramech", version, about = "Company efficiency KPI engine")]
struct Cli {
    /// TOML configuration file (default: ./astramech.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Benchmark table (.toml, .yaml or .json) replacing the embedded one
    #[arg(long, global = true)]
    benchmarks: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute KPIs for an input JSON document
    Analyze {
        input: PathBuf,
        /// Saved company profile; its industry and headcount apply
        #[arg(long)]
        profile: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// List industries or show one industry's benchmarks
    Benchmarks {
        #[arg(long)]
        industry: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Classify a value against a benchmark
    Compare {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        #[arg(allow_negative_numbers = true)]
        benchmark: f64,
        #[arg(long)]
        lower_is_better: bool,
    },
    /// Record questionnaire answers as a company profile
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        industry: String,
        #[arg(long)]
        employees: u32,
        #[arg(long)]
        age: u32,
        /// excel or pdf
        #[arg(long)]
        format: String,
        /// Financial data covers a month rather than a year
        #[arg(long)]
        monthly: bool,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let bind = match &args.command {
        Command::Serve { bind } => bind.clone(),
        _ => None,
    };
    let config = AppConfig::resolve(&ConfigOverrides {
        config_path: args.config.clone(),
        bind,
        benchmarks_path: args.benchmarks.clone(),
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let benchmarks = BenchmarkManager::load_or_default(config.benchmarks_path.as_deref());
    match benchmarks.source() {
        BenchmarkSource::Fallback { path, reason } => {
            warn!(
                path = %path.display(),
                reason = %reason,
                "Benchmark file unusable, using embedded table"
            );
        }
        source => info!(source = %cli::describe_source(source), "Benchmarks loaded"),
    }
    let calculator = KpiCalculator::new(benchmarks);

    match args.command {
        Command::Analyze {
            input,
            profile,
            json,
        } => {
            println!("{}", cli::cmd_analyze(&calculator, &input, profile.as_deref(), json)?);
        }
        Command::Benchmarks { industry, json } => {
            println!(
                "{}",
                cli::cmd_benchmarks(calculator.benchmarks(), industry.as_deref(), json)?
            );
        }
        Command::Compare {
            value,
            benchmark,
            lower_is_better,
        } => {
            println!("{}", cli::cmd_compare(value, benchmark, lower_is_better)?);
        }
        Command::Profile {
            name,
            industry,
            employees,
            age,
            format,
            monthly,
            notes,
            output,
        } => {
            let answers = ProfileAnswers {
                company_name: name,
                industry,
                employee_count: employees,
                company_age_years: age,
                file_format: format,
                is_annual_financial_data: !monthly,
                additional_notes: notes,
            };
            println!("{}", cli::cmd_profile(&answers, &output)?);
        }
        Command::Serve { .. } => {
            api::serve(&config.bind, AppState::new(calculator)).await?;
        }
    }

    Ok(())
}
