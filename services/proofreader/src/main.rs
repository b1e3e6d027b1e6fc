//! Proofreader CLI for derived ocean composite statistics.
//!
//! Spot-checks stored mean/count fields by recomputing them from raw daily
//! swath files and comparing against the reference archives and the
//! document store.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use proofreader::{AuditRunner, ProofreaderConfig};

#[derive(Parser)]
#[command(name = "proofreader")]
#[command(about = "Spot-check audit tool for ocean composite statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one audit profile for a bounded number of iterations
    Run {
        /// Path to configuration YAML file
        #[arg(short, long, default_value = "profiles.yaml")]
        config: PathBuf,

        /// Profile name from the configuration
        #[arg(short, long)]
        profile: String,

        /// Number of sampling iterations
        #[arg(short, long, default_value = "1000")]
        iterations: u64,

        /// RNG seed for reproducible sampling (entropy when absent)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write mismatch records as JSONL to this path
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Output format: table (default), json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Log level
        #[arg(long, default_value = "info", env = "RUST_LOG")]
        log_level: String,
    },

    /// List the profiles defined in a configuration file
    Profiles {
        /// Path to configuration YAML file
        #[arg(short, long, default_value = "profiles.yaml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            profile,
            iterations,
            seed,
            report,
            output,
            log_level,
        } => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
            fmt().with_env_filter(filter).with_target(false).init();

            let config = ProofreaderConfig::from_file(&config)?;
            config.validate()?;

            let runner = AuditRunner::new(config, &profile)?;
            let summary = runner.run(iterations, seed, report.as_deref()).await?;

            match output.as_str() {
                "json" => println!("{}", summary.format_json()?),
                _ => print!("{}", summary.format_table()),
            }

            Ok(())
        }
        Commands::Profiles { config } => {
            let config = ProofreaderConfig::from_file(&config)?;
            config.validate()?;

            for profile in &config.profiles {
                println!("{}  ({})", profile.name, profile.kind.kind_name());
            }

            Ok(())
        }
    }
}
