//! todoctl-core: PostgreSQL connection bootstrap
//!
//! Resolves configuration from the environment (plus a local `.env` file
//! outside hosted deployments), opens one pool, and hands the caller a
//! [`Database`] handle. Errors are returned, never turned into exits here.

pub mod bootstrap;
pub mod config;
pub mod connector;
pub mod database;
pub mod env;
pub mod error;

pub use bootstrap::{Bootstrap, Bootstrapped, Stage};
pub use config::BootstrapConfig;
pub use connector::{Connector, PgConnector};
pub use database::{redact_url, Database};
pub use env::{EnvFileOutcome, Environment, MemoryEnv, ProcessEnv, RuntimeEnv};
pub use error::{BootstrapError, Result};
