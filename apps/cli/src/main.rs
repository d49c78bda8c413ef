//! # formguard CLI entry point
//!
//! Parses arguments, loads the layered configuration, installs logging and
//! dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use formguard_cli::check::{CheckArgs, run_check};
use formguard_cli::config::CliConfig;
use formguard_cli::list::{ListArgs, run_list};

/// Exit code for configuration, input and evaluation failures.
const EXIT_FAILURE: u8 = 2;

/// Validate JSON documents and uploaded files against formguard schemas.
#[derive(Parser, Debug)]
#[command(name = "formguard", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (defaults to ./formguard.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON document against a bundled schema.
    Check(CheckArgs),

    /// List the bundled schemas.
    #[command(name = "schemas")]
    List(ListArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let logging = if cli.verbose > 0 {
        config.logging.clone().with_verbosity(cli.verbose)
    } else {
        config.logging.clone()
    };
    let _logger = match formguard_log::init_with(logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {e}");
            None
        }
    };

    tracing::debug!(config = ?cli.config, "formguard starting");

    match run(cli.command, &config) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(command: Commands, config: &CliConfig) -> anyhow::Result<u8> {
    match command {
        Commands::Check(args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_check(&args, config))
        }
        Commands::List(args) => run_list(&args, config),
    }
}
