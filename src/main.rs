//! codewarden - audit a source tree with a pluggable rule engine
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use codewarden::cli::{commands, Cli, Commands};
use codewarden::exit_codes;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args).await,
        Commands::Rules(args) => commands::rules::execute(args).await,
        Commands::Init(args) => commands::init::execute(args).await,
    };

    // Handle exit codes for CI integration
    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
