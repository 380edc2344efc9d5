use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{error, span, Instrument, Level, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::services::llm::models::{
    base::{Message, Role},
    chat::{ChatRequest, ChatResponse},
    errors::InferenceClientError,
    structured_output::{SchemaSpec, StructuredOutputFormat},
};
use crate::ClientConfig;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    pub client: Client,
    pub base_url: String,
}

impl OllamaClient {
    pub fn new(cfg: ClientConfig) -> Result<Self, InferenceClientError> {
        let base_url = cfg
            .base_url
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.into())
            .trim_end_matches('/')
            .to_string();

        let mut builder = Client::builder();
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Single non-streaming `/api/chat` call.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, InferenceClientError> {
        let body = OllamaChatRequest::from(&request);
        self.post("/api/chat", &body).await
    }

    /// POSTs `body` and decodes the reply inside a Langfuse-attributed span.
    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R, InferenceClientError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}{endpoint}", self.base_url);
        let span = span!(
            Level::INFO,
            "ollama.post",
            "langfuse.observation.name" = format!("POST {endpoint}").as_str(),
            "langfuse.observation.type" = "span",
            "http.request.method" = "POST",
            "url.full" = url.as_str(),
            "server.address" = self.base_url.as_str(),
        );
        if let Ok(input) = serde_json::to_string(body) {
            span.set_attribute("langfuse.observation.input", input);
        }

        async {
            let text = self.send(&url, body).await.map_err(mark_failed)?;
            Span::current().set_attribute("langfuse.observation.output", text.clone());

            serde_json::from_str::<R>(&text).map_err(|e| {
                mark_failed(InferenceClientError::Serialization(format!(
                    "Error decoding Ollama reply: {e}. Raw JSON was: '{text}'"
                )))
            })
        }
        .instrument(span)
        .await
    }

    /// Returns the body of a 2xx reply; any other status is an `Api` error
    /// carrying the status and body.
    async fn send<T: Serialize>(&self, url: &str, body: &T) -> Result<String, InferenceClientError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| InferenceClientError::Request(e.to_string()))?;

        let status = response.status();
        Span::current().set_attribute("http.response.status_code", i64::from(status.as_u16()));

        let text = response.text().await.map_err(|e| {
            InferenceClientError::Request(format!("Failed to read Ollama reply: {e}"))
        })?;

        if !status.is_success() {
            return Err(InferenceClientError::Api(format!(
                "Ollama request failed: {status} - {text}"
            )));
        }
        Ok(text)
    }
}

/// Logs `err` and marks the current span failed, handing `err` back.
fn mark_failed(err: InferenceClientError) -> InferenceClientError {
    error!(error = %err, "ollama request failed");
    let span = Span::current();
    span.set_status(opentelemetry::trace::Status::error(err.to_string()));
    span.set_attribute("langfuse.observation.level", "ERROR");
    span.set_attribute("langfuse.observation.status_message", err.to_string());
    err
}

impl StructuredOutputFormat for OllamaClient {
    fn format(spec: &SchemaSpec) -> Value {
        spec.bare_schema()
    }
}

#[derive(Serialize, Debug)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a Value>,
}

#[derive(Serialize, Debug)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatRequest> for OllamaChatRequest<'a> {
    fn from(req: &'a ChatRequest) -> Self {
        Self {
            model: &req.base.model,
            messages: req.messages.iter().map(OllamaMessage::from).collect(),
            // Replies are read whole.
            stream: false,
            format: req.base.format.as_ref(),
        }
    }
}

impl<'a> From<&'a Message> for OllamaMessage<'a> {
    fn from(m: &'a Message) -> Self {
        let role = match m.role {
            Role::Developer => Role::System,
            other => other,
        };
        Self {
            role: role.as_str(),
            content: m.text(),
        }
    }
}
