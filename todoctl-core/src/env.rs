//! Environment access and local `.env` loading
//!
//! The bootstrap never touches `std::env` directly; it goes through the
//! [`Environment`] trait so tests and embedders can hand it a [`MemoryEnv`].
//!
//! [`ProcessEnv`] writes with `std::env::set_var`, which is only sound while
//! no other thread reads the environment. Load the env file before starting
//! a multi-threaded runtime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// Read/write view of a set of environment variables
pub trait Environment {
    /// Value of `key`, if set
    fn var(&self, key: &str) -> Option<String>;

    /// Set `key` only when it is not already present.
    ///
    /// Returns `true` if the value was written.
    fn set_if_absent(&mut self, key: &str, value: &str) -> bool;
}

/// The real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set_if_absent(&mut self, key: &str, value: &str) -> bool {
        if std::env::var_os(key).is_some() {
            return false;
        }
        std::env::set_var(key, value);
        true
    }
}

/// In-memory environment
#[derive(Debug, Default, Clone)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, overriding any previous value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl Environment for MemoryEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set_if_absent(&mut self, key: &str, value: &str) -> bool {
        if self.vars.contains_key(key) {
            return false;
        }
        self.vars.insert(key.to_string(), value.to_string());
        true
    }
}

/// Where the process is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    /// Developer machine; the local env file is consulted
    Local,
    /// Managed deployment; configuration comes from the platform only
    Hosted,
}

impl RuntimeEnv {
    /// Hosted when `marker` is set to a non-empty value. The value itself is ignored.
    pub fn detect(env: &impl Environment, marker: &str) -> Self {
        match env.var(marker) {
            Some(value) if !value.is_empty() => RuntimeEnv::Hosted,
            _ => RuntimeEnv::Local,
        }
    }

    pub fn is_hosted(self) -> bool {
        self == RuntimeEnv::Hosted
    }
}

impl std::fmt::Display for RuntimeEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeEnv::Local => f.write_str("local"),
            RuntimeEnv::Hosted => f.write_str("hosted"),
        }
    }
}

/// What happened to the local env file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileOutcome {
    /// Hosted runtime; the file was never opened
    SkippedHosted,
    /// No file at `path`
    NotFound { path: PathBuf },
    /// Parsed; `applied` keys were new to the environment
    Loaded { path: PathBuf, applied: usize },
    /// File present but unreadable or unparseable; nothing from it was applied
    Malformed { path: PathBuf, reason: String },
}

impl EnvFileOutcome {
    pub fn is_malformed(&self) -> bool {
        matches!(self, EnvFileOutcome::Malformed { .. })
    }
}

/// Load `path` into `env` without overriding variables that are already set.
///
/// All-or-nothing: a parse error anywhere in the file leaves `env` untouched.
/// Never fails; problems are reported through the returned outcome and a warning.
pub fn load_env_file(env: &mut impl Environment, path: &Path) -> EnvFileOutcome {
    if !path.exists() {
        debug!("No env file at {}, using environment only", path.display());
        return EnvFileOutcome::NotFound {
            path: path.to_path_buf(),
        };
    }

    let pairs = match read_env_file(path) {
        Ok(pairs) => pairs,
        Err(err) if err.not_found() => {
            debug!("Env file {} disappeared before it could be read", path.display());
            return EnvFileOutcome::NotFound {
                path: path.to_path_buf(),
            };
        }
        Err(err) => {
            warn!(
                "Failed to load {}, using existing environment: {}",
                path.display(),
                err
            );
            return EnvFileOutcome::Malformed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            };
        }
    };

    if let Err(reason) = check_pairs(&pairs) {
        warn!(
            "Failed to load {}, using existing environment: {}",
            path.display(),
            reason
        );
        return EnvFileOutcome::Malformed {
            path: path.to_path_buf(),
            reason,
        };
    }

    let applied = pairs
        .iter()
        .filter(|(key, value)| env.set_if_absent(key, value))
        .count();

    info!(
        "Loaded {} of {} variables from {}",
        applied,
        pairs.len(),
        path.display()
    );

    EnvFileOutcome::Loaded {
        path: path.to_path_buf(),
        applied,
    }
}

fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, dotenvy::Error> {
    dotenvy::from_path_iter(path)?.collect()
}

/// dotenvy accepts pairs the OS environment cannot hold; `set_var` panics on them.
fn check_pairs(pairs: &[(String, String)]) -> Result<(), String> {
    for (key, value) in pairs {
        if key.is_empty() {
            return Err("empty variable name".to_string());
        }
        if key.contains(['=', '\0']) {
            return Err(format!("invalid variable name {:?}", key));
        }
        if value.contains('\0') {
            return Err(format!("value of {} contains a NUL byte", key));
        }
    }
    Ok(())
}
