//! TOML configuration file loading
//!
//! Keys use the long option names (`producer-wait`, `log-format`, ...).
//! A value from the file only fills an option the command line left unset.

use crate::app::error::AppError;
use crate::core::logging::LogFormat;
use crate::core::validation::ValidationError;
use crate::metrics::report::SummaryFormat;
use crate::worker::BlockDetection;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::args::Args;

/// Default configuration location, e.g. `~/.config/Prioflow/prioflow.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Prioflow").join("prioflow.toml"))
}

impl Args {
    /// Load the configuration file, if any, into unset options
    ///
    /// An explicitly named file must exist; the default file is optional.
    /// Returns the path that was applied.
    pub fn load_config(&mut self) -> Result<Option<PathBuf>, AppError> {
        let config_path = match &self.config_file {
            Some(path) if !path.exists() => {
                return Err(AppError::Config {
                    path: path.clone(),
                    message: "the specified configuration file does not exist".to_string(),
                })
            }
            Some(path) => Some(path.clone()),
            None => default_config_path().filter(|path| path.exists()),
        };

        match config_path {
            Some(path) => {
                self.apply_config_file(&path)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    fn apply_config_file(&mut self, path: &Path) -> Result<(), AppError> {
        let config_error = |message: String| AppError::Config {
            path: path.to_path_buf(),
            message,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config =
            toml::from_str::<toml::Table>(&contents).map_err(|e| config_error(e.to_string()))?;
        Self::apply_toml_values(self, &config).map_err(|e| config_error(e.to_string()))
    }

    /// Apply TOML values to every option not already set
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if args.producer_wait.is_none() {
            args.producer_wait = unsigned_field(config, "producer-wait", &mut issues);
        }
        if args.consumer_wait.is_none() {
            args.consumer_wait = unsigned_field(config, "consumer-wait", &mut issues);
        }
        if args.seed.is_none() {
            args.seed = unsigned_field(config, "seed", &mut issues);
        }
        if args.block_detection.is_none() {
            args.block_detection = enum_field(config, "block-detection", &mut issues);
        }
        if args.summary_format.is_none() {
            args.summary_format = enum_field(config, "summary-format", &mut issues);
        }
        if args.log_format.is_none() {
            args.log_format = enum_field(config, "log-format", &mut issues);
        }
        if args.color.is_none() {
            args.color = config.get("color").and_then(|v| v.as_bool());
        }
        if args.log_level.is_none() {
            if let Some(level) = config.get("log-level").and_then(|v| v.as_str()) {
                match level {
                    "trace" | "debug" | "info" | "warn" | "error" | "off" => {
                        args.log_level = Some(level.to_string())
                    }
                    other => issues.push(format!("log-level: unknown level '{}'", other)),
                }
            }
        }
        if args.log_file.is_none() {
            args.log_file = config
                .get("log-file")
                .and_then(|v| v.as_str())
                .map(PathBuf::from);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::from_issues(issues))
        }
    }
}

fn unsigned_field(config: &toml::Table, key: &str, issues: &mut Vec<String>) -> Option<u64> {
    let value = config.get(key)?;
    match value.as_integer().map(u64::try_from) {
        Some(Ok(n)) => Some(n),
        _ => {
            issues.push(format!(
                "{}: expected a non-negative integer, got {}",
                key, value
            ));
            None
        }
    }
}

fn enum_field<T: FromStr>(config: &toml::Table, key: &str, issues: &mut Vec<String>) -> Option<T> {
    let value = config.get(key)?;
    match value.as_str().map(T::from_str) {
        Some(Ok(parsed)) => Some(parsed),
        _ => {
            issues.push(format!("{}: unsupported value {}", key, value));
            None
        }
    }
}
