//! # CLI Configuration
//!
//! Defaults, overridden by environment, overridden by command-line flags.
//!
//! | Variable              | Field             |
//! |-----------------------|-------------------|
//! | `POF_LOG_LEVEL`       | `log_level`       |
//! | `POF_JSON_LOGS`       | `json_logs`       |
//! | `POF_PARALLEL_VERIFY` | `verifier.parallel` |
//! | `POF_MERGE_MODE`      | `default_mode`    |

use pof_consent::{MergeMode, VerifierConfig};
use tracing::warn;

/// An environment value that could not be parsed and was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedVar {
    pub name: &'static str,
    pub value: String,
}

/// Complete CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit logs as JSON lines.
    pub json_logs: bool,
    /// Batch verification tuning.
    pub verifier: VerifierConfig,
    /// Merge mode used by `build` when `--mode` is not given.
    pub default_mode: MergeMode,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
            verifier: VerifierConfig::default(),
            default_mode: MergeMode::Replace,
        }
    }
}

/// Load configuration from the process environment.
///
/// Runs before the subscriber exists, so rejected values are returned for
/// [`log_rejected`] instead of being logged here.
pub fn load_config() -> (CliConfig, Vec<RejectedVar>) {
    from_lookup(|key| std::env::var(key).ok())
}

/// Build configuration from an arbitrary variable lookup.
///
/// Unparseable values keep their default and are returned.
pub fn from_lookup<F>(lookup: F) -> (CliConfig, Vec<RejectedVar>)
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = CliConfig::default();
    let mut rejected = Vec::new();
    let mut reject =
        |name: &'static str, value: String| rejected.push(RejectedVar { name, value });

    if let Some(level) = lookup("POF_LOG_LEVEL") {
        if !level.trim().is_empty() {
            config.log_level = level.trim().to_string();
        }
    }

    if let Some(value) = lookup("POF_JSON_LOGS") {
        match parse_bool(&value) {
            Some(b) => config.json_logs = b,
            None => reject("POF_JSON_LOGS", value),
        }
    }

    if let Some(value) = lookup("POF_PARALLEL_VERIFY") {
        match parse_bool(&value) {
            Some(b) => config.verifier.parallel = b,
            None => reject("POF_PARALLEL_VERIFY", value),
        }
    }

    if let Some(value) = lookup("POF_MERGE_MODE") {
        match value.parse() {
            Ok(mode) => config.default_mode = mode,
            Err(_) => reject("POF_MERGE_MODE", value),
        }
    }

    (config, rejected)
}

/// Warn about every ignored environment value.
pub fn log_rejected(rejected: &[RejectedVar]) {
    for var in rejected {
        warn!(var = var.name, value = %var.value, "ignoring invalid environment value");
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
