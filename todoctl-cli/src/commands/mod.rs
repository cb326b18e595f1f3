//! Command implementations for todoctl
//!
//! Each submodule holds one subcommand; [`BootstrapArgs`] carries the
//! flags every command shares.

pub mod connect;
pub mod env;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use todoctl_core::BootstrapConfig;

/// Flags that shape the bootstrap. Precedence: flag/env var, then config file, then defaults.
#[derive(Args, Debug, Default)]
pub struct BootstrapArgs {
    /// TOML config file with an optional [database] table
    #[arg(long, global = true, env = "TODOCTL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Local env file loaded outside hosted deployments (default: .env)
    #[arg(long, global = true, env = "TODOCTL_ENV_FILE", value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Maximum pool connections (default: 5)
    #[arg(
        long,
        global = true,
        env = "TODOCTL_MAX_CONNECTIONS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_connections: Option<u32>,

    /// Variable whose presence marks a hosted deployment (default: RENDER)
    #[arg(long, global = true, value_name = "VAR")]
    pub hosted_marker: Option<String>,

    /// Variable holding the connection string (default: DATABASE_URL)
    #[arg(long, global = true, value_name = "VAR")]
    pub database_url_var: Option<String>,
}

impl BootstrapArgs {
    /// Merge flags over the config file (if any) and defaults
    pub fn resolve(&self) -> Result<BootstrapConfig> {
        let mut config = match &self.config {
            Some(path) => BootstrapConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => BootstrapConfig::default(),
        };

        if let Some(env_file) = &self.env_file {
            config.env_file = env_file.clone();
        }
        if let Some(max) = self.max_connections {
            config.max_connections = max;
        }
        if let Some(marker) = &self.hosted_marker {
            config.hosted_marker = marker.clone();
        }
        if let Some(var) = &self.database_url_var {
            config.database_url_var = var.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
