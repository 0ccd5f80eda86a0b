//! Assistant Configuration
//!
//! Loads the nested YAML configuration (`config.yaml`) into strongly typed
//! sections. Every key has a default so a partial file is always valid.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// API key value shipped in `config.example.yaml`; treated as "not configured".
pub const PLACEHOLDER_WEATHER_API_KEY: &str = "your-openweathermap-api-key";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Configuration file not found: {}. Please copy {} to {}",
        path.display(),
        example.display(),
        path.display()
    )]
    NotFound { path: PathBuf, example: PathBuf },
    #[error("Failed to read configuration file {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Root of the configuration tree.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub assistant: AssistantSettings,
    pub ai: AiSettings,
    pub skills: SkillsSettings,
    pub logging: LoggingSettings,
}

/// Identity and conversational tone of the assistant.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssistantSettings {
    pub name: String,
    /// Number of user/assistant exchanges kept in memory.
    pub conversation_memory: usize,
    pub personality: String,
    pub response_style: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            name: "Claire".to_string(),
            conversation_memory: 10,
            personality: "helpful and friendly".to_string(),
            response_style: "concise but informative".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiSettings {
    pub provider: String,
    pub temperature: f32,
    pub ollama: OllamaSettings,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            temperature: 0.7,
            ollama: OllamaSettings::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaSettings {
    pub url: String,
    pub model: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "llama2".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkillsSettings {
    pub weather: WeatherSettings,
    pub system_control: SystemControlSettings,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherSettings {
    pub enabled: bool,
    pub api_key: String,
    pub default_location: String,
    /// OpenWeatherMap unit system: `metric` or `imperial`.
    pub units: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            default_location: "New York".to_string(),
            units: "metric".to_string(),
        }
    }
}

impl WeatherSettings {
    /// Returns the API key unless it is empty or still the example placeholder.
    pub fn configured_api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_WEATHER_API_KEY {
            None
        } else {
            Some(key)
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SystemControlSettings {
    pub enabled: bool,
    pub allow_shutdown: bool,
}

impl Default for SystemControlSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_shutdown: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: PathBuf::from("logs/claire.log"),
        }
    }
}

impl AppConfig {
    /// Parses a configuration document and validates its values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        let config: AppConfig = if yaml.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from `path`, applying environment overrides.
    ///
    /// If the file is missing but a `config.example.yaml` sits next to it, the
    /// example is copied into place first.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        if !path.exists() {
            bootstrap_from_example(path)?;
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config = Self::from_yaml_str(&raw)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Overrides secrets and connection settings from the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENWEATHER_API_KEY") {
            self.skills.weather.api_key = key;
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            self.ai.ollama.url = url;
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            self.ai.ollama.model = model;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.assistant.conversation_memory == 0 {
            return Err(ConfigError::InvalidValue(
                "assistant.conversation_memory".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(ConfigError::InvalidValue(
                "ai.temperature".to_string(),
                format!("{} is outside 0.0..=2.0", self.ai.temperature),
            ));
        }
        Ok(())
    }
}

fn example_path_for(path: &Path) -> PathBuf {
    path.with_file_name("config.example.yaml")
}

fn bootstrap_from_example(path: &Path) -> Result<(), ConfigError> {
    let example = example_path_for(path);
    if !example.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
            example,
        });
    }
    std::fs::copy(&example, path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    info!(from = %example.display(), to = %path.display(), "Created configuration from example");
    Ok(())
}
