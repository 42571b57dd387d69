//! Configuration module for the voicebridge server.
//!
//! Configuration comes from an optional YAML file, environment variables, and
//! `.env` values, with priority: YAML > ENV vars > defaults. The process
//! refuses to start without the OpenAI credential.
//!
//! # Example
//! ```rust,no_run
//! use voicebridge::config::ServerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::core::realtime::DEFAULT_REALTIME_MODEL;

mod yaml;

pub use yaml::YamlConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5050;
const DEFAULT_VOICE: &str = "alloy";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_VAD_THRESHOLD: f32 = 0.5;
const DEFAULT_VAD_PREFIX_PADDING_MS: u32 = 300;
const DEFAULT_VAD_SILENCE_DURATION_MS: u32 = 500;

/// Built-in behavioral instructions, used until the admin edits them.
pub const DEFAULT_INSTRUCTIONS: &str = "You are the virtual receptionist for the Modelo clinic. \
Be warm and concise. Answer questions about the clinic, help callers find an \
appointment slot, and never give medical advice.";

/// Built-in prompt for the synthetic first turn.
pub const DEFAULT_GREETING: &str = "Greet the caller: introduce yourself as the clinic's \
assistant and ask how you can help.";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential is absent; the process must not start
    #[error("Missing required credential: {0}")]
    MissingCredential(&'static str),

    /// A value failed to parse or a pairing constraint was violated
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// Configuration file could not be read
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// TLS configuration for HTTPS and WSS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains everything needed to run the bridge: listener settings, the
/// OpenAI credential and model, voice and turn-detection tunables applied at
/// session initialization, the instruction template and its collaborators
/// (schedule URL, admin secret).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    /// OpenAI API key for the Realtime API; required
    pub openai_api_key: String,
    /// Realtime model to request on the AI leg
    pub realtime_model: String,

    // Session tunables
    /// Synthesized voice identity
    pub voice: String,
    /// Sampling randomness, 0.0 to 1.0
    pub temperature: f32,
    /// Server VAD activation threshold
    pub vad_threshold: f32,
    /// Audio included before detected speech, in ms
    pub vad_prefix_padding_ms: u32,
    /// Silence that ends a caller turn, in ms
    pub vad_silence_duration_ms: u32,

    /// Prompt for the synthetic first turn; `None` waits for the caller
    pub greeting: Option<String>,
    /// Instruction template, editable through the admin page
    pub instruction_template: String,
    /// Calendar collaborator URL for the daily schedule document
    pub schedule_url: Option<String>,
    /// Shared secret guarding the admin endpoints; unset disables them
    pub admin_secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(YamlConfig::default(), |key| std::env::var(key).ok())
    }

    /// Load configuration from a YAML file with environment variable
    /// fallbacks.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let overrides = YamlConfig::load(path)?;
        Self::build(overrides, |key| std::env::var(key).ok())
    }

    fn build(
        overrides: YamlConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let openai_api_key = overrides
            .openai_api_key
            .or_else(|| env("OPENAI_API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingCredential("OPENAI_API_KEY"))?;

        let host = overrides
            .host
            .or_else(|| env("HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match overrides.port {
            Some(port) => port,
            None => parse_value(env("PORT"), "PORT", DEFAULT_PORT)?,
        };

        let cert_path = overrides
            .tls_cert_path
            .or_else(|| env("TLS_CERT_PATH").map(PathBuf::from));
        let key_path = overrides
            .tls_key_path
            .or_else(|| env("TLS_KEY_PATH").map(PathBuf::from));
        let tls = match (cert_path, key_path) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path,
                key_path,
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "TLS_CERT_PATH/TLS_KEY_PATH".to_string(),
                    value: "both must be set to enable TLS".to_string(),
                });
            }
        };

        let temperature = match overrides.temperature {
            Some(temperature) => temperature,
            None => parse_value(env("TEMPERATURE"), "TEMPERATURE", DEFAULT_TEMPERATURE)?,
        };
        let vad_threshold = match overrides.vad_threshold {
            Some(threshold) => threshold,
            None => parse_value(env("VAD_THRESHOLD"), "VAD_THRESHOLD", DEFAULT_VAD_THRESHOLD)?,
        };
        let vad_prefix_padding_ms = match overrides.vad_prefix_padding_ms {
            Some(ms) => ms,
            None => parse_value(
                env("VAD_PREFIX_PADDING_MS"),
                "VAD_PREFIX_PADDING_MS",
                DEFAULT_VAD_PREFIX_PADDING_MS,
            )?,
        };
        let vad_silence_duration_ms = match overrides.vad_silence_duration_ms {
            Some(ms) => ms,
            None => parse_value(
                env("VAD_SILENCE_DURATION_MS"),
                "VAD_SILENCE_DURATION_MS",
                DEFAULT_VAD_SILENCE_DURATION_MS,
            )?,
        };

        // An explicitly empty greeting disables the synthetic first turn.
        let greeting = match overrides.greeting.or_else(|| env("GREETING")) {
            Some(greeting) if greeting.trim().is_empty() => None,
            Some(greeting) => Some(greeting),
            None => Some(DEFAULT_GREETING.to_string()),
        };

        Ok(Self {
            host,
            port,
            tls,
            openai_api_key,
            realtime_model: overrides
                .realtime_model
                .or_else(|| env("REALTIME_MODEL"))
                .unwrap_or_else(|| DEFAULT_REALTIME_MODEL.to_string()),
            voice: overrides
                .voice
                .or_else(|| env("VOICE"))
                .unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            temperature,
            vad_threshold,
            vad_prefix_padding_ms,
            vad_silence_duration_ms,
            greeting,
            instruction_template: overrides
                .instructions
                .or_else(|| env("INSTRUCTIONS"))
                .unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string()),
            schedule_url: overrides
                .schedule_url
                .or_else(|| env("SCHEDULE_URL"))
                .filter(|url| !url.trim().is_empty()),
            admin_secret: overrides
                .admin_secret
                .or_else(|| env("ADMIN_SECRET"))
                .filter(|secret| !secret.trim().is_empty()),
        })
    }

    /// Listener address in `host:port` form.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }
}

/// Zeroize secret fields when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        self.openai_api_key.zeroize();
        if let Some(ref mut secret) = self.admin_secret {
            secret.zeroize();
        }
    }
}

fn parse_value<T: FromStr>(
    value: Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let result = ServerConfig::build(YamlConfig::default(), env_from(&[]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingCredential("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        let result = ServerConfig::build(
            YamlConfig::default(),
            env_from(&[("OPENAI_API_KEY", "   ")]),
        );
        assert!(matches!(result, Err(ConfigError::MissingCredential(_))));
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = ServerConfig::build(
            YamlConfig::default(),
            env_from(&[("OPENAI_API_KEY", "sk-test")]),
        )
        .unwrap();

        assert_eq!(config.address(), "0.0.0.0:5050");
        assert!(!config.is_tls_enabled());
        assert_eq!(config.voice, "alloy");
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.vad_silence_duration_ms, 500);
        assert_eq!(config.greeting.as_deref(), Some(DEFAULT_GREETING));
        assert_eq!(config.instruction_template, DEFAULT_INSTRUCTIONS);
        assert!(config.schedule_url.is_none());
        assert!(config.admin_secret.is_none());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = ServerConfig::build(
            YamlConfig::default(),
            env_from(&[("OPENAI_API_KEY", "sk-test"), ("PORT", "not-a-port")]),
        );
        match result {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "PORT"),
            other => panic!("Expected InvalidValue error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_greeting_disables_synthetic_turn() {
        let config = ServerConfig::build(
            YamlConfig::default(),
            env_from(&[("OPENAI_API_KEY", "sk-test"), ("GREETING", "")]),
        )
        .unwrap();
        assert!(config.greeting.is_none());
    }

    #[test]
    fn test_yaml_overrides_environment() {
        let overrides = YamlConfig {
            port: Some(8080),
            voice: Some("verse".to_string()),
            ..Default::default()
        };
        let config = ServerConfig::build(
            overrides,
            env_from(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("PORT", "9000"),
                ("VOICE", "ash"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.voice, "verse");
    }

    #[test]
    fn test_tls_requires_both_paths() {
        let result = ServerConfig::build(
            YamlConfig::default(),
            env_from(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("TLS_CERT_PATH", "/tmp/cert.pem"),
            ]),
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
