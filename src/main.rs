//! pddl-validate: check PDDL plans against a domain and problem.
//!
//! - `pddl-validate check` - validate one plan
//! - `pddl-validate batch` - validate every plan in a directory
//! - `pddl-validate problem` - check that a problem compiles against its domain
//!
//! Exit status: 0 valid, 1 invalid plan, 2 inputs that could not be validated.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use pddl_validator::pddl::plan::PlanFormat;
use pddl_validator::validator::batch::{load_plans, validate_batch, BatchSummary};
use pddl_validator::validator::check_problem_files;
use pddl_validator::{validate, Domain, Plan, Problem, ValidatorConfig};

#[derive(Parser)]
#[command(name = "pddl-validate")]
#[command(about = "Validate PDDL plans", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Validator configuration (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single plan
    Check {
        domain: PathBuf,
        problem: PathBuf,
        plan: PathBuf,

        /// Read the plan as a JSON step list
        #[arg(long)]
        steps_json: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate every plan file in a directory
    Batch {
        domain: PathBuf,
        problem: PathBuf,
        plan_dir: PathBuf,

        /// Read every plan as a JSON step list
        #[arg(long)]
        steps_json: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that a problem compiles against its domain
    Problem {
        domain: PathBuf,
        problem: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn plan_format(steps_json: bool) -> PlanFormat {
    if steps_json {
        PlanFormat::StepsJson
    } else {
        PlanFormat::Pddl
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ValidatorConfig> {
    match path {
        Some(path) => Ok(ValidatorConfig::load(path)?),
        None => Ok(ValidatorConfig::default()),
    }
}

/// Returns the process exit status.
fn run(cli: Cli) -> Result<u8> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Check { domain, problem, plan, steps_json, json } => {
            check(&domain, &problem, &plan, plan_format(steps_json), json, &config)
        }
        Commands::Batch { domain, problem, plan_dir, steps_json, json } => {
            batch(&domain, &problem, &plan_dir, plan_format(steps_json), json, &config)
        }
        Commands::Problem { domain, problem, json } => check_problem(&domain, &problem, json),
    }
}

fn check(domain: &Path, problem: &Path, plan: &Path, format: PlanFormat, json: bool, config: &ValidatorConfig) -> Result<u8> {
    let domain = Domain::from_file(domain)?;
    let problem = Problem::from_file(&domain, problem)?;
    let plan = Plan::from_file_as(&domain, &problem, format, plan)?;
    let report = validate(&domain, &problem, &plan, config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(if report.is_valid() { 0 } else { 1 })
}

fn batch(domain: &Path, problem: &Path, plan_dir: &Path, format: PlanFormat, json: bool, config: &ValidatorConfig) -> Result<u8> {
    let domain = Domain::from_file(domain)?;
    let problem = Problem::from_file(&domain, problem)?;
    let plans = load_plans(plan_dir).with_context(|| format!("Failed to read plans from {}", plan_dir.display()))?;
    let records = validate_batch(&domain, &problem, &plans, format, config);
    let summary = BatchSummary::from_records(&records);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for record in &records {
            match &record.outcome {
                Ok(report) => match &report.failure {
                    Some(failure) => println!("{}: {} at step {} {}", record.name, report.verdict, failure.step, failure.action),
                    None => println!("{}: {}", record.name, report.verdict),
                },
                Err(e) => println!("{}: {}\n{}", record.name, e.kind(), e),
            }
        }
        println!(
            "{} plans, {} valid, {} invalid, {} not validated (valid rate {:.3})",
            summary.total_records, summary.valid_plans, summary.invalid_plans, summary.errors, summary.valid_rate
        );
    }
    Ok(summary.exit_status())
}

fn check_problem(domain: &Path, problem: &Path, json: bool) -> Result<u8> {
    let summary = check_problem_files(domain, problem)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
    }
    Ok(0)
}
