//! evmux CLI - inspect recordings and exercise the multiplexer
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`EVMUX_*`)
//! 3. Config file given with `--config`
//! 4. Global config (`~/.evmux/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `EVMUX_DEBUG`: Enable debug mode (`true`/`false`)
//! - `EVMUX_RECORD_INPUT_FILE`: Input log; each channel writes `<stem>.<channel>.<ext>`
//! - `EVMUX_RECORD_OUTPUT_FILE`: Output log; each channel writes `<stem>.<channel>.<ext>`
//! - `EVMUX_DELETE_RECORDINGS_ON_ABORT`: Discard logs on abort (`true`/`false`)

mod demo;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use evmux_runtime::{read_records, ConfigError, ConfigLoader, EvmuxConfig, Record};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// evmux CLI - masked event multiplexing
#[derive(Parser, Debug)]
#[command(name = "evmux")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip ~/.evmux/config.toml
    #[arg(long, global = true)]
    no_global_config: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the records of a recording log
    Dump {
        /// Log file to read
        log: PathBuf,

        /// Print raw JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Run two consumers and a producer over one multiplexer
    Demo {
        /// Events per prefix (`a.*`, `b.*` and unroutable `c.*`)
        #[arg(short = 'n', long, default_value_t = 5)]
        events: usize,

        /// Record every channel into this directory
        #[arg(long, value_name = "DIR")]
        record_dir: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Resolves [`EvmuxConfig`] from files and env vars, then applies CLI
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    debug: bool,
    config_file: Option<PathBuf>,
    skip_global: bool,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        Self {
            debug: args.debug,
            config_file: args.config.clone(),
            skip_global: args.no_global_config,
        }
    }

    fn resolve(&self) -> Result<EvmuxConfig, ConfigError> {
        let mut loader = ConfigLoader::new();
        if self.skip_global {
            loader = loader.skip_global_config();
        }
        if let Some(ref path) = self.config_file {
            loader = loader.with_file(path);
        }

        let mut config = loader.load()?;

        // CLI args override (highest priority)
        if self.debug {
            config.debug = true;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = CliConfigResolver::from_args(&args);
    let config = resolver
        .resolve()
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    // Terminal filter: --debug > --verbose > RUST_LOG env > default "warn"
    let filter = if config.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr so `dump` output stays pipeable
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();

    info!(debug = config.debug, "configuration resolved");

    match args.command {
        Command::Dump { log, json } => dump(&log, json),
        Command::Demo { events, record_dir } => {
            let summary = demo::run(&config, events, record_dir.as_deref())?;
            print!("{summary}");
            Ok(())
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn dump(log: &std::path::Path, json: bool) -> Result<()> {
    let records =
        read_records(log).with_context(|| format!("cannot dump {}", log.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in &records {
        if json {
            writeln!(out, "{}", serde_json::to_string(record)?)?;
        } else {
            writeln!(out, "{}", format_record(record))?;
        }
    }
    info!(path = %log.display(), records = records.len(), "dump complete");
    Ok(())
}

/// One record as `id <- address [category] payload`.
fn format_record(record: &Record) -> String {
    let mut line = record.id.to_string();
    if let Some(ref address) = record.address {
        line.push_str(&format!(" <- {address}"));
    }
    line.push_str(&format!(" [{}]", record.category));
    if let Some(ref payload) = record.payload {
        line.push_str(&format!(" {}", payload.value()));
    }
    line
}
