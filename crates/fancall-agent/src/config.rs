//! Agent configuration loading from file and environment variables.

use fancall_types::AgentPersona;
use fancall_voice::{DEFAULT_FETCH_TIMEOUT, DEFAULT_LLM_MODEL};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Agent worker settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Persona defaults used when a dispatch leaves a field out.
    #[serde(default)]
    pub persona: AgentPersona,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "fancall_agent=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Agent worker configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Agent name registered for LiveKit dispatch.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Chat model backing the companion.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Upper bound on a remote profile picture fetch, in seconds.
    #[serde(default = "default_image_fetch_timeout_secs")]
    pub image_fetch_timeout_secs: u64,
}

impl AgentConfig {
    pub fn image_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.image_fetch_timeout_secs)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_agent_name() -> String {
    "fancall".to_string()
}

fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

fn default_image_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_secs()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            llm_model: default_llm_model(),
            image_fetch_timeout_secs: default_image_fetch_timeout_secs(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting parsed but holds an unusable value.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `FANCALL_LOG_LEVEL` overrides `logging.level`
/// - `FANCALL_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `FANCALL_AGENT_NAME` overrides `agent.name`
/// - `OPENAI_MODEL` overrides `agent.llm_model`
/// - `FANCALL_OPENAI_MODEL` overrides `agent.llm_model`, taking priority over `OPENAI_MODEL`
/// - `FANCALL_IMAGE_FETCH_TIMEOUT_SECS` overrides `agent.image_fetch_timeout_secs`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed, or
/// if `agent.name` or `agent.llm_model` is blank after overrides.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.agent.name.trim().is_empty() {
        return Err(ConfigError::Invalid("agent.name must not be empty".to_string()));
    }
    if config.agent.llm_model.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "agent.llm_model must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(level) = var("FANCALL_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("FANCALL_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(name) = var("FANCALL_AGENT_NAME").filter(|v| !v.is_empty()) {
        config.agent.name = name;
    }
    if let Some(model) = var("FANCALL_OPENAI_MODEL")
        .or_else(|| var("OPENAI_MODEL"))
        .filter(|v| !v.is_empty())
    {
        config.agent.llm_model = model;
    }
    if let Some(timeout) = var("FANCALL_IMAGE_FETCH_TIMEOUT_SECS") {
        if let Ok(parsed) = timeout.parse() {
            config.agent.image_fetch_timeout_secs = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file() {
        let config = load_config(Some("/nonexistent/fancall.toml")).unwrap();
        assert_eq!(config.agent.name, "fancall");
        assert_eq!(config.agent.image_fetch_timeout(), Duration::from_secs(10));
        assert!(config.persona.system_prompt.is_none());
    }

    #[test]
    fn parses_sections() {
        let contents = r#"
[logging]
level = "debug"
json = true

[agent]
name = "companion"
image_fetch_timeout_secs = 3

[persona]
voiceId = "persona-voice"
systemPrompt = "You are Mina."
"#;

        let config: Config = toml::from_str(contents).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.agent.name, "companion");
        assert_eq!(config.agent.llm_model, "gpt-4o-mini");
        assert_eq!(config.agent.image_fetch_timeout_secs, 3);
        assert_eq!(config.persona.voice_id.as_deref(), Some("persona-voice"));
        assert_eq!(config.persona.system_prompt.as_deref(), Some("You are Mina."));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[agent\nname = ").unwrap();
        let path = file.path().to_string_lossy().into_owned();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn empty_model_is_rejected() {
        let config: Config = toml::from_str("[agent]\nllm_model = \"\"\n").unwrap();
        match validate(&config) {
            Err(ConfigError::Invalid(message)) => assert!(message.contains("llm_model")),
            other => panic!("Expected invalid value, got {:?}", other),
        }
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            vars(&[
                ("FANCALL_LOG_JSON", "1"),
                ("FANCALL_AGENT_NAME", "night-shift"),
                ("OPENAI_MODEL", "gpt-4o"),
                ("FANCALL_IMAGE_FETCH_TIMEOUT_SECS", "not-a-number"),
            ]),
        );
        assert!(config.logging.json);
        assert_eq!(config.agent.name, "night-shift");
        assert_eq!(config.agent.llm_model, "gpt-4o");
        assert_eq!(config.agent.image_fetch_timeout_secs, 10);
    }

    #[test]
    fn prefixed_model_wins() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            vars(&[
                ("OPENAI_MODEL", "gpt-4o"),
                ("FANCALL_OPENAI_MODEL", "gpt-4.1-mini"),
            ]),
        );
        assert_eq!(config.agent.llm_model, "gpt-4.1-mini");
    }
}
