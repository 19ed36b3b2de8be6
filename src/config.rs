use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::audio::{ValidationPolicy, DEFAULT_MAX_FILE_SIZE_BYTES};
use crate::transcription::{ApiKey, AuthScheme, ClientConfig};

/// Process-wide settings, read once at start-up
///
/// Sources, lowest precedence first: an optional config file, then environment
/// variables (`ENDPOINT_URL`, `API_KEY`, `MAX_FILE_SIZE_BYTES`, `TIMEOUT_SECS`,
/// `AUTH_SCHEME`, `HTTP__BIND`, `HTTP__PORT`).
#[derive(Debug, Deserialize)]
pub struct Config {
    pub endpoint_url: String,
    pub api_key: ApiKey,

    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub auth_scheme: AuthScheme,

    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_max_file_size_bytes() -> u64 {
    DEFAULT_MAX_FILE_SIZE_BYTES
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load from `path` (any extension the `config` crate understands; may be absent)
    /// with environment variables layered on top
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load from a file only, ignoring the environment
    pub fn load_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.endpoint_url.clone(), self.api_key.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_auth_scheme(self.auth_scheme)
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy::new(self.max_file_size_bytes)
    }
}
