//! Connection bootstrap
//!
//! Runs once at startup:
//!
//! ```text
//! Uninitialized -> LoadingConfig -> Connecting -> Ready
//! ```
//!
//! Any failure ends the run with a [`BootstrapError`]; there is no retry.
//! Deciding whether that terminates the process is left to the caller.

use std::fmt;

use tracing::{debug, info};

use crate::config::BootstrapConfig;
use crate::connector::Connector;
use crate::database::redact_url;
use crate::env::{load_env_file, EnvFileOutcome, Environment, RuntimeEnv};
use crate::error::{BootstrapError, Result};

/// Bootstrap progress, logged at debug level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Uninitialized,
    LoadingConfig,
    Connecting,
    Ready,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Uninitialized => "uninitialized",
            Stage::LoadingConfig => "loading-config",
            Stage::Connecting => "connecting",
            Stage::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Result of a successful bootstrap
#[derive(Debug)]
pub struct Bootstrapped<H> {
    pub handle: H,
    pub runtime: RuntimeEnv,
    pub env_file: EnvFileOutcome,
}

/// Environment-driven connection bootstrap
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    config: BootstrapConfig,
}

impl Bootstrap {
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Detect the runtime and, when local, merge the env file into `env`.
    ///
    /// With [`ProcessEnv`](crate::ProcessEnv) this writes process variables; call it before any
    /// other thread starts reading the environment.
    pub fn prepare(&self, env: &mut impl Environment) -> (RuntimeEnv, EnvFileOutcome) {
        debug!(stage = %Stage::LoadingConfig, "Resolving configuration");
        let runtime = RuntimeEnv::detect(&*env, &self.config.hosted_marker);
        let outcome = if runtime.is_hosted() {
            debug!(
                "{} is set, skipping {}",
                self.config.hosted_marker,
                self.config.env_file.display()
            );
            EnvFileOutcome::SkippedHosted
        } else {
            load_env_file(env, &self.config.env_file)
        };
        (runtime, outcome)
    }

    /// The connection string, or an error if it is unset or blank
    pub fn database_url(&self, env: &impl Environment) -> Result<String> {
        let var = &self.config.database_url_var;
        match env.var(var) {
            Some(url) if !url.trim().is_empty() => Ok(url.trim().to_string()),
            _ => Err(BootstrapError::missing_database_url(var.as_str())),
        }
    }

    /// Run every stage against `env`, opening the handle through `connector`.
    pub async fn run<E, C>(&self, env: &mut E, connector: &C) -> Result<Bootstrapped<C::Handle>>
    where
        E: Environment,
        C: Connector,
    {
        debug!(stage = %Stage::Uninitialized, "Starting database bootstrap");
        let prepared = self.prepare(env);
        self.connect_prepared(&*env, connector, prepared).await
    }

    /// Finish a bootstrap whose [`prepare`](Self::prepare) step already ran.
    ///
    /// Lets a binary load the env file on the main thread and only then start
    /// its async runtime. `env` is only read here.
    pub async fn connect_prepared<E, C>(
        &self,
        env: &E,
        connector: &C,
        prepared: (RuntimeEnv, EnvFileOutcome),
    ) -> Result<Bootstrapped<C::Handle>>
    where
        E: Environment,
        C: Connector,
    {
        let (runtime, env_file) = prepared;
        let url = self.database_url(env)?;
        let display_url = redact_url(&url);

        debug!(stage = %Stage::Connecting, url = %display_url, "Opening connection");
        let handle = connector
            .connect(&url)
            .await
            .map_err(|e| BootstrapError::connect(display_url.as_str(), e))?;

        debug!(stage = %Stage::Ready, runtime = %runtime, "Bootstrap complete");
        info!("Connected to PostgreSQL database at {}", display_url);

        Ok(Bootstrapped {
            handle,
            runtime,
            env_file,
        })
    }
}
