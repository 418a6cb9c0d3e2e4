//! Configuration file loading, validation and the zone directory.

use crate::error::{Error, Result};
use crate::types::WildcardPolicy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub auth: AuthConfig,
    /// Arbitrary key → zone name.
    #[serde(default)]
    pub zones: BTreeMap<String, String>,
    /// Same keys as `zones` → zone id.
    #[serde(default)]
    pub zone_ids: BTreeMap<String, String>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// When set, requests use `X-Auth-Email`/`X-Auth-Key`; otherwise the
    /// token is sent as a bearer token.
    #[serde(default)]
    pub email: Option<String>,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// `pretty`, `compact` or `json`
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub wildcard_policy: WildcardPolicy,
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    let config: Config = match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
        "json" => serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("json: {}", e)))?,
        "yaml" | "yml" => serde_yaml::from_str(&data)?,
        "toml" => toml::from_str(&data)?,
        other => {
            return Err(Error::Config(format!(
                "unsupported config format: {:?}",
                other
            )))
        }
    };

    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.auth.token.trim().is_empty() {
        return Err(Error::Config("auth.token is empty".into()));
    }
    if config.auth.content_type.trim().is_empty() {
        return Err(Error::Config("auth.content_type is empty".into()));
    }
    if config.zones.is_empty() {
        return Err(Error::Config("no zones configured".into()));
    }
    for key in config.zones.keys() {
        if !config.zone_ids.contains_key(key) {
            return Err(Error::Config(format!("zone '{}' has no entry in zone_ids", key)));
        }
    }
    if config.api.base_url.trim().is_empty() {
        return Err(Error::Config("api.base_url is empty".into()));
    }
    if config.api.timeout_secs == 0 {
        return Err(Error::Config("api.timeout_secs must be > 0".into()));
    }
    Ok(())
}

/// Zone name → zone id, resolved once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneDirectory {
    zones: BTreeMap<String, String>,
}

impl ZoneDirectory {
    /// Joins `zones` and `zone_ids` on their shared keys.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut zones = BTreeMap::new();
        for (key, name) in &config.zones {
            let id = config
                .zone_ids
                .get(key)
                .ok_or_else(|| Error::Config(format!("zone '{}' has no entry in zone_ids", key)))?;
            zones.insert(name.clone(), id.clone());
        }
        Ok(Self { zones })
    }

    pub fn zone_id(&self, name: &str) -> Result<&str> {
        self.zones
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownZone(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for ZoneDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            zones: iter.into_iter().collect(),
        }
    }
}
