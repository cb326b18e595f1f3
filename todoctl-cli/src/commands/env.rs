//! `todoctl env`: show what the bootstrap would use, without connecting

use anyhow::Result;
use todoctl_core::{redact_url, Bootstrap, EnvFileOutcome, ProcessEnv, RuntimeEnv};

pub fn run_env(bootstrap: &Bootstrap, prepared: (RuntimeEnv, EnvFileOutcome)) -> Result<()> {
    let (runtime, outcome) = prepared;
    let config = bootstrap.config();

    println!("runtime:      {}", runtime);
    println!("env file:     {}", describe(&outcome));
    match bootstrap.database_url(&ProcessEnv) {
        Ok(url) => println!("{}: {}", config.database_url_var, redact_url(&url)),
        Err(_) => println!("{}: (not set)", config.database_url_var),
    }
    println!("pool size:    {}", config.max_connections);

    Ok(())
}

fn describe(outcome: &EnvFileOutcome) -> String {
    match outcome {
        EnvFileOutcome::SkippedHosted => "skipped (hosted)".to_string(),
        EnvFileOutcome::NotFound { path } => format!("{} (not found)", path.display()),
        EnvFileOutcome::Loaded { path, applied } => {
            format!("{} ({} applied)", path.display(), applied)
        }
        EnvFileOutcome::Malformed { path, reason } => {
            format!("{} (ignored: {})", path.display(), reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn describes_outcomes() {
        assert_eq!(describe(&EnvFileOutcome::SkippedHosted), "skipped (hosted)");
        assert_eq!(
            describe(&EnvFileOutcome::Loaded {
                path: PathBuf::from(".env"),
                applied: 3
            }),
            ".env (3 applied)"
        );
        assert!(describe(&EnvFileOutcome::Malformed {
            path: PathBuf::from(".env"),
            reason: "bad line".to_string()
        })
        .contains("ignored: bad line"));
    }
}
