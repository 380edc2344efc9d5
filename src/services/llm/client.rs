use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;

use crate::services::llm::{
    models::{
        chat::{ChatRequest, ChatResponse},
        errors::InferenceClientError,
        structured_output::{SchemaSpec, StructuredOutputFormat},
    },
    ClientConfig,
};

use super::providers::{ollama::OllamaClient, openai::OpenAiClient};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Provider {
    #[default]
    Ollama,
    OpenAi,
    OpenRouter,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Ollama => "ollama",
            Provider::OpenAi => "openai",
            Provider::OpenRouter => "openrouter",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = InferenceClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "openai" => Ok(Provider::OpenAi),
            "openrouter" => Ok(Provider::OpenRouter),
            other => Err(InferenceClientError::Config(format!(
                "Unknown provider '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
enum ClientInner {
    Ollama(OllamaClient),
    OpenAi(OpenAiClient),
}

#[derive(Clone, Debug)]
pub struct InferenceClient {
    config: ClientConfig,
    inner: Arc<ClientInner>,
}

impl InferenceClient {
    pub fn get_config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, InferenceClientError> {
        match &*self.inner {
            ClientInner::Ollama(c) => c.chat(req).await,
            ClientInner::OpenAi(c) => c.chat(req).await,
        }
    }

    /// Encodes `spec` the way this client's provider expects it in `format`.
    pub fn structured_format(&self, spec: &SchemaSpec) -> Value {
        match &*self.inner {
            ClientInner::Ollama(_) => OllamaClient::format(spec),
            ClientInner::OpenAi(_) => OpenAiClient::format(spec),
        }
    }
}

impl TryFrom<ClientConfig> for InferenceClient {
    type Error = InferenceClientError;

    fn try_from(cfg: ClientConfig) -> Result<Self, Self::Error> {
        let config = cfg.clone();
        let Some(provider) = cfg.provider.clone() else {
            return Err(InferenceClientError::Config("Provider not defined".into()));
        };
        let inner = match provider {
            Provider::Ollama => ClientInner::Ollama(OllamaClient::new(cfg)?),
            Provider::OpenAi => {
                ClientInner::OpenAi(OpenAiClient::new(cfg, "OpenAI", "https://api.openai.com/v1")?)
            }
            Provider::OpenRouter => ClientInner::OpenAi(OpenAiClient::new(
                cfg,
                "OpenRouter",
                "https://openrouter.ai/api/v1",
            )?),
        };
        Ok(Self {
            config,
            inner: Arc::new(inner),
        })
    }
}

/// A chat model bound to one model name, able to answer structured requests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Provider-side model name sent with every request.
    fn model(&self) -> &str;

    /// Encodes a schema into the request `format` for this model's provider.
    fn structured_format(&self, spec: &SchemaSpec) -> Value {
        spec.bare_schema()
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, InferenceClientError>;
}

/// An [`InferenceClient`] paired with the model it should address.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    client: InferenceClient,
    model: String,
}

impl LoadedModel {
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn client(&self) -> &InferenceClient {
        &self.client
    }
}

#[async_trait]
impl ChatModel for LoadedModel {
    fn model(&self) -> &str {
        &self.model
    }

    fn structured_format(&self, spec: &SchemaSpec) -> Value {
        self.client.structured_format(spec)
    }

    async fn chat(&self, mut request: ChatRequest) -> Result<ChatResponse, InferenceClientError> {
        request.base.model = self.model.clone();
        self.client.chat(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm::ClientBuilder;

    #[test]
    fn provider_names_round_trip() {
        for p in [Provider::Ollama, Provider::OpenAi, Provider::OpenRouter] {
            assert_eq!(p.as_str().parse::<Provider>().unwrap(), p);
        }
        assert_eq!(" OpenAI ".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert!(matches!(
            "anthropic".parse::<Provider>(),
            Err(InferenceClientError::Config(_))
        ));
    }

    #[test]
    fn missing_provider_is_a_config_error() {
        let err = InferenceClient::try_from(ClientConfig::default()).unwrap_err();
        assert_eq!(
            err,
            InferenceClientError::Config("Provider not defined".into())
        );
    }

    #[test]
    fn openai_requires_api_key() {
        let err = ClientConfig::default()
            .provider(Some(Provider::OpenAi))
            .build()
            .unwrap_err();
        assert!(matches!(err, InferenceClientError::Config(_)));
    }
}
