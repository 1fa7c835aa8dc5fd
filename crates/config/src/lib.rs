//! Configuration loading and validation for MINA.
//!
//! Loads `~/.mina/config.toml` with a `GROQ_API_KEY` environment override.
//! Every field has a default, so a missing file yields a working
//! configuration — minus the API key, which is never embedded and must come
//! from the file or the environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use mina_core::{KnowledgeBase, Personality};
use serde::{Deserialize, Serialize};

/// The root configuration structure.
///
/// Maps directly to `~/.mina/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Groq API key. No built-in fallback exists; without a key every
    /// completion call fails closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// OpenAI-compatible endpoint root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model requested from the completion service
    #[serde(default = "default_model")]
    pub model: String,

    /// Default sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per generated answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on the remote call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default personality preset name
    #[serde(default = "default_personality")]
    pub personality: String,

    /// Gateway bind settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Extra knowledge-base entries (trigger = response), merged over the
    /// built-ins; an entry with a built-in trigger replaces it
    #[serde(default)]
    pub knowledge: HashMap<String, String>,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_model() -> String {
    "llama3-8b-8192".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_personality() -> String {
    "Amichevole".into()
}

/// Redact a secret for Debug output: first 4 chars + ellipsis.
fn redact(s: &Option<String>) -> String {
    match s {
        Some(key) => {
            let head: String = key.chars().take(4).collect();
            format!("{head}…")
        }
        None => "None".into(),
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("personality", &self.personality)
            .field("gateway", &self.gateway)
            .field("knowledge", &self.knowledge)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    7445
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (`~/.mina/config.toml`).
    ///
    /// A `GROQ_API_KEY` environment variable, when set and non-empty, wins
    /// over the file's `api_key`.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.trim().is_empty() {
                config.api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".mina")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.1..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.1 and 2.0".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be at least 1".into(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be at least 1".into(),
            ));
        }

        if Personality::from_name(&self.personality).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "unknown personality '{}' (expected one of: {})",
                self.personality,
                Personality::ALL.map(|p| p.name()).join(", ")
            )));
        }

        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must be non-zero".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The configured personality preset.
    ///
    /// `validate()` guarantees the name is known; an unvalidated config
    /// falls back to the default preset.
    pub fn active_personality(&self) -> Personality {
        Personality::from_name(&self.personality).unwrap_or_default()
    }

    /// Build the knowledge base: built-ins plus the `[knowledge]` table.
    pub fn knowledge_base(&self) -> KnowledgeBase {
        let mut kb = KnowledgeBase::with_defaults();
        kb.extend(self.knowledge.iter().map(|(t, r)| (t.clone(), r.clone())));
        kb
    }

    /// The commented config template written by `mina onboard`.
    pub fn default_toml() -> String {
        concat!(
            "# MINA — configuration\n",
            "#\n",
            "# The API key can also come from the GROQ_API_KEY environment\n",
            "# variable, which wins over this file.\n",
            "# api_key = \"gsk_...\"\n",
            "\n",
            "base_url = \"https://api.groq.com/openai/v1\"\n",
            "model = \"llama3-8b-8192\"\n",
            "temperature = 0.7\n",
            "max_tokens = 1000\n",
            "timeout_secs = 30\n",
            "personality = \"Amichevole\"\n",
            "\n",
            "[gateway]\n",
            "host = \"127.0.0.1\"\n",
            "port = 7445\n",
            "\n",
            "# Extra knowledge-base entries, merged over the built-ins.\n",
            "# [knowledge]\n",
            "# \"il mio progetto\" = \"Sto costruendo una dashboard in Rust.\"\n",
        )
        .into()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            personality: default_personality(),
            gateway: GatewayConfig::default(),
            knowledge: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "llama3-8b-8192");
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.gateway.port, 7445);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.personality, config.personality);
    }

    #[test]
    fn temperature_bounds_enforced() {
        let mut config = AppConfig::default();
        config.temperature = 0.05;
        assert!(config.validate().is_err());
        config.temperature = 2.5;
        assert!(config.validate().is_err());
        config.temperature = 2.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_personality_rejected() {
        let config = AppConfig {
            personality: "Scontrosa".into(),
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Scontrosa"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().model, "llama3-8b-8192");
    }

    #[test]
    fn load_from_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
api_key = "gsk_test_key"
temperature = 1.3
personality = "tecnico"

[gateway]
port = 9000

[knowledge]
"il mio hobby" = "Colleziono sintetizzatori."
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("gsk_test_key"));
        assert!((config.temperature - 1.3).abs() < f32::EPSILON);
        assert_eq!(config.active_personality(), Personality::Tecnico);
        assert_eq!(config.gateway.port, 9000);
        // Untouched fields keep their defaults.
        assert_eq!(config.model, "llama3-8b-8192");
        assert_eq!(config.timeout_secs, 30);

        let kb = config.knowledge_base();
        assert_eq!(kb.len(), 7);
        assert!(kb.lookup("qual è il mio hobby?").is_some());
    }

    #[test]
    fn invalid_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "temperature = \"alta\"").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let config = AppConfig {
            api_key: Some("gsk_supersecretvalue".into()),
            ..AppConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("supersecret"));
        assert!(rendered.contains("gsk_…"));
    }

    #[test]
    fn default_toml_parses_to_defaults() {
        let parsed: AppConfig = toml::from_str(&AppConfig::default_toml()).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(parsed.model, defaults.model);
        assert_eq!(parsed.base_url, defaults.base_url);
        assert_eq!(parsed.personality, defaults.personality);
        assert_eq!(parsed.gateway.port, defaults.gateway.port);
        assert!(parsed.api_key.is_none());
        assert!(parsed.knowledge.is_empty());
    }

    #[test]
    fn knowledge_entries_override_builtins() {
        let mut config = AppConfig::default();
        config
            .knowledge
            .insert("contatti".into(), "scrivimi su Matrix".into());
        let kb = config.knowledge_base();
        assert_eq!(kb.len(), 6);
        assert_eq!(kb.lookup("contatti").unwrap().response, "scrivimi su Matrix");
    }
}
