//! # Proof-of-Funds Organizer CLI
//!
//! ```text
//! pof message --address <ADDR> --chain <ethereum|solana> [--issued-at <TS>]
//! pof build <BLOCK_FILE>... [--existing <BUNDLE>] [--mode replace|append] [--output <OUT>]
//! pof verify <BUNDLE>
//! ```
//!
//! `verify` exits with status 2 when any attestation fails.

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pof_consent::{ChainTag, ConsentService, MergeMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, log_rejected, CliConfig};

/// Proof-of-funds consent bundle tool
#[derive(Parser, Debug)]
#[command(name = "pof")]
#[command(about = "Build and verify proof-of-funds consent bundles")]
struct Args {
    /// Log filter (overrides POF_LOG_LEVEL; RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the consent message an account must sign
    Message {
        #[arg(short, long)]
        address: String,

        /// ethereum or solana
        #[arg(short, long, value_parser = parse_chain)]
        chain: ChainTag,

        /// Timestamp for the `Issued At:` line (defaults to now, UTC)
        #[arg(long)]
        issued_at: Option<String>,
    },

    /// Validate pasted attestation blocks into a bundle
    Build {
        /// Files each holding one pasted attestation block
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Previously saved bundle to append to
        #[arg(short, long)]
        existing: Option<PathBuf>,

        /// replace or append (defaults to POF_MERGE_MODE, then replace)
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<MergeMode>,

        /// Write the bundle here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify every attestation in a bundle file
    Verify {
        bundle: PathBuf,

        /// Disable parallel verification
        #[arg(long)]
        sequential: bool,
    },
}

fn parse_chain(s: &str) -> Result<ChainTag, String> {
    s.parse().map_err(|e: pof_consent::ParseError| e.to_string())
}

fn parse_mode(s: &str) -> Result<MergeMode, String> {
    s.parse()
}

fn init_logging(config: &CliConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))
}

fn run(args: Args, mut config: CliConfig) -> Result<ExitCode> {
    if matches!(args.command, Command::Verify { sequential: true, .. }) {
        config.verifier.parallel = false;
    }
    let service = ConsentService::new(config.verifier.clone());

    match args.command {
        Command::Message {
            address,
            chain,
            issued_at,
        } => {
            println!(
                "{}",
                commands::message(&service, &address, chain, issued_at)?
            );
        }
        Command::Build {
            inputs,
            existing,
            mode,
            output,
        } => {
            let mode = mode.unwrap_or(config.default_mode);
            let json = commands::build(
                &service,
                &inputs,
                existing.as_deref(),
                mode,
                output.as_deref(),
            )?;
            if output.is_none() {
                println!("{json}");
            }
        }
        Command::Verify { bundle, .. } => {
            let result = commands::verify(&service, &bundle)?;
            println!("{}", result.render_report());
            info!(
                valid = result.valid_count(),
                invalid = result.invalid_count(),
                "verification finished"
            );
            if !result.all_valid {
                return Ok(ExitCode::from(2));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let (mut config, rejected) = load_config();
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    config.json_logs |= args.json_logs;

    init_logging(&config)?;
    log_rejected(&rejected);

    run(args, config)
}
