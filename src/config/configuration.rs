use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_FAST_LLM_MODEL: &str = "openai/gpt-4o-mini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configurable must be a JSON object, got {0}")]
    NotAnObject(String),
    #[error("invalid configuration value: {0}")]
    InvalidValue(#[from] serde_json::Error),
}

/// Model selection shared by the nodes of one graph.
///
/// Both fields are `provider/model` identifiers, see
/// [`ModelIdentifier`](crate::services::llm::ModelIdentifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Main model, used for long-form answers.
    pub model: String,
    /// Cheaper model for auxiliary steps such as topic expansion.
    pub fast_llm_model: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            fast_llm_model: DEFAULT_FAST_LLM_MODEL.into(),
        }
    }
}

impl Configuration {
    /// Defaults overridden by `LLM_MODEL` and `FAST_LLM_MODEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        cfg.apply_lookup(lookup);
        cfg
    }

    /// Builds a configuration from a generic `configurable` map.
    ///
    /// Known keys are taken, unknown keys are ignored and missing keys fall
    /// back to the defaults.
    pub fn from_configurable(configurable: &Value) -> Result<Self, ConfigError> {
        if !configurable.is_object() {
            return Err(ConfigError::NotAnObject(configurable.to_string()));
        }
        Ok(serde_json::from_value(configurable.clone())?)
    }

    /// Defaults < environment < `configurable`.
    ///
    /// Meant to run once, where the graph is entered.
    pub fn resolve(configurable: Option<&Value>) -> Result<Self, ConfigError> {
        Self::resolve_with(configurable, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(configurable: Option<&Value>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::from_lookup(lookup);
        let Some(configurable) = configurable else {
            return Ok(cfg);
        };
        let Some(map) = configurable.as_object() else {
            return Err(ConfigError::NotAnObject(configurable.to_string()));
        };

        if let Some(v) = map.get("model") {
            cfg.model = serde_json::from_value(v.clone())?;
        }
        if let Some(v) = map.get("fast_llm_model") {
            cfg.fast_llm_model = serde_json::from_value(v.clone())?;
        }
        Ok(cfg)
    }

    fn apply_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(model) = non_empty("LLM_MODEL") {
            self.model = model;
        }
        if let Some(model) = non_empty("FAST_LLM_MODEL") {
            self.fast_llm_model = model;
        }
    }
}
