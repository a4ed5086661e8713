//! CCNx PIT - command-line entrypoint.
//!
//! Loads and validates configuration, writes a default configuration file,
//! or replays a forwarding trace against a Pending Interest Table.

use ccnx_pit_lib::config::{ConfigLoader, LogConfig, PitConfig, ENV_PREFIX};
use ccnx_pit_lib::error::{CcnxError, CcnxResult};
use ccnx_pit_lib::trace::TraceRunner;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the CCNx PIT.
#[derive(Parser, Debug)]
#[clap(name = "ccnx-pit", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },

    /// Replay a forwarding trace and print the outcome of each event
    Replay {
        /// Trace file, one event per line
        #[clap(value_parser)]
        trace: PathBuf,
    },
}

/// Initialize the logging system. `RUST_LOG` takes precedence over the configured level.
fn init_logging(log: &LogConfig) -> CcnxResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_line_number(log.source_location)
        .with_file(log.source_location);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| CcnxError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

fn load_or_exit(loader: &ConfigLoader) -> PitConfig {
    match loader.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    }
}

/// Main entry point for the application.
fn main() -> CcnxResult<()> {
    let args = Args::parse();
    let loader = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX);

    match args.command {
        Command::Validate => {
            let config = load_or_exit(&loader);
            init_logging(&config.log)?;
            info!("Configuration validated successfully");
            println!("{}", toml::to_string_pretty(&config).map_err(|e| {
                CcnxError::Custom(format!("Failed to serialize config: {e}"))
            })?);
            Ok(())
        }
        Command::GenConfig { output } => {
            init_logging(&LogConfig::default())?;
            info!("Generating default configuration");
            let default_config = PitConfig::default();

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .map_err(|e| CcnxError::Custom(format!("Failed to serialize config: {e}")))?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
        Command::Replay { trace } => {
            let config = load_or_exit(&loader);
            init_logging(&config.log)?;
            info!(trace = ?trace, max_size = config.table.max_size, "Replaying trace");

            let input = BufReader::new(File::open(&trace)?);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let mut runner = TraceRunner::new(&config.table);
            let report = runner.run(input, &mut out)?;
            writeln!(out, "# {report}")?;
            Ok(())
        }
    }
}
