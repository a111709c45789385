// Client configuration.
//
// All tunables live in `ClientConfig`, loaded from an optional JSON file.
// Every field has a default, so a partial file (or no file at all) is valid.
// Precedence, lowest to highest: built-in defaults, config file, environment
// (`CHORDROLL_ENDPOINT`, `CHORDROLL_LOG`), command-line flags.
//
// See also: `main.rs`, which applies the command-line layer, and
// `chordroll_music::render::RenderOptions` / `chordroll_music::midi::MidiOptions`
// for the nested output sections.

use chordroll_music::midi::MidiOptions;
use chordroll_music::render::RenderOptions;
use chordroll_protocol::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ClientError;

/// Environment variable overriding `endpoint`.
pub const ENDPOINT_ENV: &str = "CHORDROLL_ENDPOINT";

/// Environment variable overriding `log_level`.
pub const LOG_ENV: &str = "CHORDROLL_LOG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the detection endpoint.
    pub endpoint: String,
    /// Whole-request timeout. Detection on long files is slow, so this is generous.
    pub timeout_secs: u64,
    /// Default tracing level; `RUST_LOG` still wins when set.
    pub log_level: String,
    pub render: RenderOptions,
    pub midi: MidiOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 60,
            log_level: "info".to_string(),
            render: RenderOptions::default(),
            midi: MidiOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, ClientError> {
        let config: ClientConfig = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CHORDROLL_ENDPOINT` / `CHORDROLL_LOG` if set.
    pub fn apply_env(&mut self) {
        self.apply_overrides(std::env::var(ENDPOINT_ENV).ok(), std::env::var(LOG_ENV).ok());
    }

    /// Replace endpoint and log level with any non-empty override.
    pub fn apply_overrides(&mut self, endpoint: Option<String>, log_level: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|s| !s.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(level) = log_level.filter(|s| !s.trim().is_empty()) {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".into()));
        }
        self.midi
            .validate()
            .map_err(|msg| ClientError::Config(format!("midi: {msg}")))?;
        Ok(())
    }
}
