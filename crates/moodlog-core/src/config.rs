use std::{fs, io, path::Path, time::Duration};

use anyhow::{anyhow, Context, Result};
use moodlog_classifier::{DEFAULT_EMOTION_ENDPOINT, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};

/// Value shipped in sample configs; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_HUGGINGFACE_API_KEY_HERE";

fn default_endpoint() -> String {
    DEFAULT_EMOTION_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// Remote emotion classifier settings.
///
/// `api_key: None` is the "not configured" sentinel. Loading normalizes an
/// empty key or [`PLACEHOLDER_API_KEY`] to `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteClassifierConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteClassifierConfig {
    /// Usable API key, if any. Holds for configs built in code as well as loaded ones.
    pub fn credential(&self) -> Option<String> {
        normalize_credential(self.api_key.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.enabled && self.credential().is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub remote: RemoteClassifierConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Expand `${NAME}` references from the environment. Unset names expand to
/// an empty string; an unterminated `${` is kept as written.
pub fn resolve_env_var(raw: &str) -> String {
    let mut resolved = String::with_capacity(raw.len());
    let mut remaining = raw;

    while let Some((literal, reference)) = remaining.split_once("${") {
        resolved.push_str(literal);
        match reference.split_once('}') {
            Some((name, rest)) => {
                resolved.push_str(&std::env::var(name).unwrap_or_default());
                remaining = rest;
            }
            None => {
                resolved.push_str("${");
                resolved.push_str(reference);
                return resolved;
            }
        }
    }

    resolved.push_str(remaining);
    resolved
}

pub fn normalize_credential(raw: Option<String>) -> Option<String> {
    let key = raw?.trim().to_string();
    if key.is_empty() || key == PLACEHOLDER_API_KEY {
        None
    } else {
        Some(key)
    }
}

/// Load `config.yaml`. A missing file means local-only defaults.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(AppConfig::default());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read config file: {}", path.display()))
        }
    };

    parse_config(&content)
        .with_context(|| format!("failed to load config file: {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<AppConfig> {
    let mut config: AppConfig =
        serde_yaml::from_str(content).context("failed to parse yaml config")?;
    resolve_config_env(&mut config);
    validate_config(&config)?;
    Ok(config)
}

fn resolve_config_env(config: &mut AppConfig) {
    let remote = &mut config.analysis.remote;
    remote.api_key = normalize_credential(remote.api_key.take().map(|key| resolve_env_var(&key)));
    remote.endpoint = resolve_env_var(&remote.endpoint);
}

pub fn validate_config(config: &AppConfig) -> Result<()> {
    let remote = &config.analysis.remote;
    if remote.timeout_secs == 0 {
        return Err(anyhow!("analysis.remote.timeout_secs must be greater than zero"));
    }
    if remote.enabled && remote.endpoint.trim().is_empty() {
        return Err(anyhow!("analysis.remote.endpoint must not be empty when enabled"));
    }
    Ok(())
}
