use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Agent settings, read once at startup.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// Name reported as the `source` of every report.
    pub hostname: String,
    /// Registry base URL; the hostname is appended to form the request URL.
    pub targets_url: String,
    /// Telemetry WebSocket endpoint.
    pub web_socket: String,
    #[serde(default)]
    pub log_level: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {:?}", path))?;
        Self::from_json_str(&contents).with_context(|| format!("invalid config {:?}", path))
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("hostname", &self.hostname),
            ("targets_url", &self.targets_url),
            ("web_socket", &self.web_socket),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow!("config field `{field}` must not be empty"));
            }
        }
        Ok(())
    }

    /// URL of this host's target list.
    pub fn targets_endpoint(&self) -> String {
        format!("{}{}", self.targets_url, self.hostname)
    }

    pub fn level_filter(&self) -> LevelFilter {
        parse_log_level(&self.log_level)
    }
}

/// Maps the configured level name; unknown names fall back to info.
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level {
        "TRACE" => LevelFilter::Trace,
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}
