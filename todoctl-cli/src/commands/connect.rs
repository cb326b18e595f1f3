//! Connection commands
//!
//! `connect` runs the bootstrap and reports the result; `check` goes one
//! step further and queries the server.

use anyhow::{Context, Result};
use clap::Parser;
use todoctl_core::{
    Bootstrap, Bootstrapped, Database, EnvFileOutcome, PgConnector, ProcessEnv, RuntimeEnv,
};
use tracing::info;

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Print only the server version
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

async fn open(
    bootstrap: &Bootstrap,
    prepared: (RuntimeEnv, EnvFileOutcome),
) -> Result<Bootstrapped<Database>> {
    let connector = PgConnector::new(bootstrap.config().max_connections);
    bootstrap
        .connect_prepared(&ProcessEnv, &connector, prepared)
        .await
        .context("Database bootstrap failed")
}

/// Open the database once and close it again
pub async fn run_connect(
    bootstrap: &Bootstrap,
    prepared: (RuntimeEnv, EnvFileOutcome),
) -> Result<()> {
    let done = open(bootstrap, prepared).await?;

    if let EnvFileOutcome::Loaded { path, applied } = &done.env_file {
        info!("{} variables came from {}", applied, path.display());
    }

    done.handle.close().await;
    Ok(())
}

/// Connect, ping, and print the server version
pub async fn run_check(
    bootstrap: &Bootstrap,
    prepared: (RuntimeEnv, EnvFileOutcome),
    args: CheckArgs,
) -> Result<()> {
    let done = open(bootstrap, prepared).await?;
    let db = done.handle;

    let result = async {
        db.ping().await.context("Ping failed")?;
        db.server_version()
            .await
            .context("Failed to read server version")
    }
    .await;
    db.close().await;

    let version = result?;
    if args.quiet {
        println!("{}", version);
    } else {
        println!("✅ {} ({} runtime)", db.display_url(), done.runtime);
        println!("   PostgreSQL {}", version);
    }
    Ok(())
}
