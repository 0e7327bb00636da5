//! liveserve CLI - live-reloading static file server.
//!
//! Provides commands for:
//! - `serve`: Start the static file server with live reload (also the
//!   default when no subcommand is given)

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ServeArgs;
use output::Output;

/// liveserve - local static file server with live reload.
#[derive(Parser)]
#[command(name = "liveserve", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the static file server with live reload.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Running without a subcommand serves the current directory
    let args = match cli.command {
        Some(Commands::Serve(args)) => args,
        None => ServeArgs::default(),
    };

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(args.execute());

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
