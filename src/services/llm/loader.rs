use std::{collections::HashMap, fmt, sync::Arc};

use tracing::debug;

use crate::services::llm::{
    ChatModel, ClientBuilder, ClientConfig, InferenceClient, InferenceClientError, LoadedModel,
    Provider,
};

/// A fully specified model name: `provider/model`.
///
/// Only the first `/` separates the provider, so OpenRouter style names such as
/// `openrouter/meta-llama/llama-3.1-8b-instruct` keep their inner slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIdentifier {
    pub provider: Provider,
    pub model: String,
}

impl ModelIdentifier {
    pub fn parse(identifier: &str) -> Result<Self, InferenceClientError> {
        let Some((provider, model)) = identifier.trim().split_once('/') else {
            return Err(InferenceClientError::Config(format!(
                "Model identifier '{identifier}' must have the form provider/model"
            )));
        };
        if provider.is_empty() || model.is_empty() {
            return Err(InferenceClientError::Config(format!(
                "Model identifier '{identifier}' must have the form provider/model"
            )));
        }
        Ok(Self {
            provider: provider.parse()?,
            model: model.to_string(),
        })
    }
}

impl fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Turns a model identifier into a callable chat model.
pub trait ModelLoader: Send + Sync {
    fn load(&self, identifier: &str) -> Result<Arc<dyn ChatModel>, InferenceClientError>;
}

/// Loads models through the built-in provider clients, one [`ClientConfig`]
/// per provider. Providers without a registered config get the defaults.
#[derive(Debug, Clone, Default)]
pub struct ProviderModelLoader {
    configs: HashMap<Provider, ClientConfig>,
}

impl ProviderModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `cfg` for its provider, replacing any earlier one.
    pub fn with_client_config(mut self, cfg: ClientConfig) -> Self {
        let provider = cfg.provider.clone().unwrap_or_default();
        self.configs.insert(provider, cfg);
        self
    }

    pub fn from_env() -> Self {
        [Provider::Ollama, Provider::OpenAi, Provider::OpenRouter]
            .into_iter()
            .fold(Self::new(), |loader, p| {
                loader.with_client_config(ClientConfig::from_env(p))
            })
    }

    pub fn client_config(&self, provider: &Provider) -> Option<&ClientConfig> {
        self.configs.get(provider)
    }
}

impl ModelLoader for ProviderModelLoader {
    fn load(&self, identifier: &str) -> Result<Arc<dyn ChatModel>, InferenceClientError> {
        let id = ModelIdentifier::parse(identifier)?;
        let cfg = self
            .configs
            .get(&id.provider)
            .cloned()
            .unwrap_or_else(|| ClientConfig::default().provider(Some(id.provider.clone())));
        let client = InferenceClient::try_from(cfg)?;
        debug!(provider = %id.provider, model = %id.model, "chat model loaded");
        Ok(Arc::new(LoadedModel::new(client, id.model)))
    }
}

/// Loads `identifier` with provider settings taken from the environment.
pub fn load_chat_model(identifier: &str) -> Result<Arc<dyn ChatModel>, InferenceClientError> {
    ProviderModelLoader::from_env().load(identifier)
}
