use std::{collections::HashMap, time::Duration};

use crate::services::llm::{InferenceClient, InferenceClientError, Provider};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    pub provider: Option<Provider>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub organization: Option<String>,
    pub extra_headers: Option<HashMap<String, String>>,
    /// Whole-request timeout applied by the HTTP client.
    pub timeout: Option<Duration>,
}

pub trait ClientBuilder {
    fn provider(self, provider: Option<Provider>) -> Self;
    fn base_url(self, base_url: Option<impl Into<String>>) -> Self;
    fn api_key(self, api_key: Option<impl Into<String>>) -> Self;
    fn organization(self, organization: Option<impl Into<String>>) -> Self;
    fn extra_headers(self, extra_headers: Option<HashMap<String, String>>) -> Self;
    fn timeout(self, timeout: Option<Duration>) -> Self;
    fn build(self) -> Result<InferenceClient, InferenceClientError>;
}

impl ClientBuilder for ClientConfig {
    fn provider(mut self, provider: Option<Provider>) -> Self {
        self.provider = provider;
        self
    }

    fn base_url(mut self, base_url: Option<impl Into<String>>) -> Self {
        self.base_url = base_url.map(|s| s.into());
        self
    }

    fn api_key(mut self, api_key: Option<impl Into<String>>) -> Self {
        self.api_key = api_key.map(|s| s.into());
        self
    }

    fn organization(mut self, organization: Option<impl Into<String>>) -> Self {
        self.organization = organization.map(|s| s.into());
        self
    }

    fn extra_headers(mut self, extra_headers: Option<HashMap<String, String>>) -> Self {
        self.extra_headers = extra_headers;
        self
    }

    fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn build(self) -> Result<InferenceClient, InferenceClientError> {
        InferenceClient::try_from(ClientConfig {
            provider: self.provider.or(Some(Provider::Ollama)),
            ..self
        })
    }
}

impl ClientConfig {
    /// Reads the connection settings of `provider` from environment variables.
    ///
    /// | provider     | variables                                                 |
    /// |--------------|-----------------------------------------------------------|
    /// | `ollama`     | `OLLAMA_BASE_URL`                                         |
    /// | `openai`     | `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_ORGANIZATION` |
    /// | `openrouter` | `OPENROUTER_API_KEY`, `OPENROUTER_BASE_URL`               |
    pub fn from_env(provider: Provider) -> Self {
        Self::from_lookup(provider, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(provider: Provider, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let cfg = ClientConfig::default().provider(Some(provider.clone()));
        match provider {
            Provider::Ollama => cfg.base_url(non_empty("OLLAMA_BASE_URL")),
            Provider::OpenAi => cfg
                .api_key(non_empty("OPENAI_API_KEY"))
                .base_url(non_empty("OPENAI_BASE_URL"))
                .organization(non_empty("OPENAI_ORGANIZATION")),
            Provider::OpenRouter => cfg
                .api_key(non_empty("OPENROUTER_API_KEY"))
                .base_url(non_empty("OPENROUTER_BASE_URL")),
        }
    }
}
