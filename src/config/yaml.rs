//! YAML configuration file loading.
//!
//! Every field is optional; anything unset falls back to the environment and
//! then to built-in defaults. Unknown keys are rejected so typos fail loudly
//! at startup instead of being silently ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Values read from a YAML configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls_cert_path: Option<PathBuf>,
    pub tls_key_path: Option<PathBuf>,
    pub openai_api_key: Option<String>,
    pub realtime_model: Option<String>,
    pub voice: Option<String>,
    pub temperature: Option<f32>,
    pub vad_threshold: Option<f32>,
    pub vad_prefix_padding_ms: Option<u32>,
    pub vad_silence_duration_ms: Option<u32>,
    pub greeting: Option<String>,
    pub instructions: Option<String>,
    pub schedule_url: Option<String>,
    pub admin_secret: Option<String>,
}

impl YamlConfig {
    /// Read and parse a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}
