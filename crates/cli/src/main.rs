//! hapticctl - Haptic Motor Control CLI
//!
//! Command-line front end over the OpenHaptic SDK: driver version and
//! controller queries, plus interactive HE effect playback.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "hapticctl")]
#[command(about = "Haptic Motor Control CLI - Query and drive the native vibration driver")]
#[command(version)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Enable the native driver's debug log
    #[arg(long, global = true)]
    debug_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an HE effect file until a key is pressed
    Play {
        /// Path to the effect file; prompted for when omitted
        file: Option<PathBuf>,
    },

    /// Print the driver version
    Version,

    /// List connected game controllers
    Controllers,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("hapticctl={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let result = match cli.command {
        Commands::Play { file } => commands::play(file, cli.debug_log),
        Commands::Version => commands::version(),
        Commands::Controllers => commands::controllers(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            output::print_error(&error);
            ExitCode::FAILURE
        }
    }
}
