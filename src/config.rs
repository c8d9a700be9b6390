//! Runtime configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, a `key = value`
//! config file, `LANSNIFF_*` environment variables, then command-line flags
//! (applied by the binary).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/lansniff.conf";
const DEFAULT_OUTPUT: &str = "packets.json";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to capture on; the first suitable one when unset
    pub interface: Option<String>,
    /// Published snapshot path
    pub output: PathBuf,
    /// `tracing` filter directive used when RUST_LOG is unset
    pub log_filter: String,
    /// Also print every accepted packet to stdout
    pub console: bool,
    /// Config file keys that were not recognised, in file order
    pub unknown_keys: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            console: false,
            unknown_keys: Vec::new(),
        }
    }
}

impl Config {
    /// Load from `path` (or the default location) and the environment.
    ///
    /// A missing default config file is fine; a missing explicit one is not.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let explicit = path.is_some();
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            config.apply_file(&content)?;
        } else if explicit {
            return Err(ConfigError::Invalid(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `key = value` lines. Blank lines and `#` comments are skipped.
    ///
    /// Unknown keys are kept in `unknown_keys` for the caller to report once
    /// logging is set up.
    pub fn apply_file(&mut self, content: &str) -> Result<(), ConfigError> {
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                ConfigError::Invalid(format!("line {}: expected key = value", number + 1))
            })?;
            let key = key.trim();
            let value = value.trim();

            match key {
                "interface" => self.interface = non_empty(value),
                "output" => self.output = PathBuf::from(value),
                "log" => self.log_filter = value.to_string(),
                "console" => self.console = parse_bool(key, value)?,
                _ => self.unknown_keys.push(key.to_string()),
            }
        }
        Ok(())
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("LANSNIFF_INTERFACE") {
            self.interface = non_empty(&val);
        }
        if let Some(val) = lookup("LANSNIFF_OUTPUT") {
            self.output = PathBuf::from(val);
        }
        if let Some(val) = lookup("LANSNIFF_LOG") {
            self.log_filter = val;
        }
        if let Some(val) = lookup("LANSNIFF_CONSOLE") {
            self.console = parse_bool("LANSNIFF_CONSOLE", &val)?;
        }
        Ok(())
    }

    pub fn tracing_filter(&self) -> &str {
        &self.log_filter
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(format!(
            "invalid boolean for {}: {}",
            key, value
        ))),
    }
}
