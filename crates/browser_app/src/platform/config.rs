use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use browser_core::PollPolicy;
use browser_engine::ApiSettings;
use browser_logging::{browser_info, browser_warn, parse_level, LevelFilter};
use serde::{Deserialize, Serialize};

use super::logging::{default_log_file, LogDestination};

pub const DEFAULT_CONFIG_FILENAME: &str = "browser.ron";

/// Contents of `browser.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub base_url: String,
    pub poll_delay_ms: u64,
    pub attempt_budget: u32,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        let policy = PollPolicy::default();
        Self {
            base_url: api.base_url,
            poll_delay_ms: policy.delay.as_millis() as u64,
            attempt_budget: policy.attempt_budget,
            connect_timeout_ms: api.connect_timeout.as_millis() as u64,
            request_timeout_ms: api.request_timeout.as_millis() as u64,
            log_destination: LogDestination::default(),
            log_file: default_log_file(),
            log_level: "info".to_string(),
        }
    }
}

impl BrowserConfig {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            attempt_budget: self.attempt_budget,
            delay: Duration::from_millis(self.poll_delay_ms),
        }
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            ..ApiSettings::default()
        }
    }

    pub fn level(&self) -> LevelFilter {
        parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

/// Reads the config file, falling back to defaults when it is missing or broken.
///
/// Runs before the logger exists, so problems are returned as warnings for
/// the caller to log once logging is up.
pub(crate) fn load_config(path: &Path) -> (BrowserConfig, Vec<String>) {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (BrowserConfig::default(), Vec::new());
        }
        Err(err) => {
            let warning = format!("Failed to read config from {:?}: {}", path, err);
            return (BrowserConfig::default(), vec![warning]);
        }
    };

    let config: BrowserConfig = match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            let warning = format!("Failed to parse config from {:?}: {}", path, err);
            return (BrowserConfig::default(), vec![warning]);
        }
    };

    let mut warnings = Vec::new();
    if parse_level(&config.log_level).is_none() {
        warnings.push(format!(
            "Unknown log level {:?}, using info",
            config.log_level
        ));
    }
    (config, warnings)
}

pub(crate) fn log_loaded(path: &Path, config: &BrowserConfig, warnings: &[String]) {
    for warning in warnings {
        browser_warn!("{}", warning);
    }
    browser_info!(
        "Config from {:?}: base_url={} poll_delay_ms={} attempt_budget={}",
        path,
        config.base_url,
        config.poll_delay_ms,
        config.attempt_budget
    );
}
