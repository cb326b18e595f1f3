//! todoctl CLI - database bootstrap for the todo backend
//!
//! Entry point that owns the fail-fast policy: the core library returns
//! errors, and this binary turns any of them into a logged error and a
//! non-zero exit.
//! - `connect`: load configuration and open the database once
//! - `check`: connect, ping, and print the server version
//! - `env`: show the resolved configuration without connecting

use std::future::Future;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todoctl_core::{Bootstrap, ProcessEnv};
use tracing::error;

mod commands;
mod tracing_setup;

use commands::BootstrapArgs;

#[derive(Parser, Debug)]
#[command(
    name = "todoctl",
    author,
    version,
    about = "Connect the todo backend to PostgreSQL",
    long_about = "Loads a local .env file unless running on a hosted deployment, reads \
                  DATABASE_URL, and opens a PostgreSQL connection pool. Exits non-zero \
                  if the connection string is missing or the connection fails."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    bootstrap: BootstrapArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the database connection and report success
    Connect,
    /// Connect, ping the server, and print its version
    Check(commands::connect::CheckArgs),
    /// Show the resolved environment without connecting
    Env,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }) {
        eprintln!("Failed to initialize logging: {err}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("❌ {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let bootstrap = Bootstrap::new(cli.bootstrap.resolve()?);

    // The env file is written into the process environment, so load it while
    // this is still the only thread.
    let prepared = bootstrap.prepare(&mut ProcessEnv);

    match cli.command {
        Commands::Connect => block_on(commands::connect::run_connect(&bootstrap, prepared)),
        Commands::Check(args) => {
            block_on(commands::connect::run_check(&bootstrap, prepared, args))
        }
        Commands::Env => commands::env::run_env(&bootstrap, prepared),
    }
}

fn block_on<F>(future: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::runtime::Runtime::new()
        .context("Failed to start tokio runtime")?
        .block_on(future)
}
