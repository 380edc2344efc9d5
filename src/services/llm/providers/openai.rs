use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, instrument};

use crate::services::llm::client_config::ClientConfig;
use crate::services::llm::models::base::{Message, Role};
use crate::services::llm::models::chat::{ChatRequest, ChatResponse};
use crate::services::llm::models::errors::InferenceClientError;
use crate::services::llm::models::structured_output::{SchemaSpec, StructuredOutputFormat};

/// Client for providers speaking the OpenAI Chat Completions protocol
/// (OpenAI itself and OpenRouter).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    label: &'static str,
}

impl OpenAiClient {
    pub fn new(
        cfg: ClientConfig,
        label: &'static str,
        default_base_url: &str,
    ) -> Result<Self, InferenceClientError> {
        let api_key = cfg
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| InferenceClientError::Config(format!("{label} requires api_key")))?;
        let base_url = cfg
            .base_url
            .unwrap_or_else(|| default_base_url.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                InferenceClientError::Config(format!("Invalid api_key header: {e}"))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(org) = cfg.organization {
            let value = HeaderValue::from_str(&org).map_err(|e| {
                InferenceClientError::Config(format!("Invalid organization header: {e}"))
            })?;
            headers.insert(HeaderName::from_static("openai-organization"), value);
        }

        if let Some(extra) = cfg.extra_headers {
            for (k, v) in extra.into_iter() {
                let name = HeaderName::from_bytes(k.as_bytes())
                    .map_err(|_| InferenceClientError::Config(format!("Invalid header name: {k}")))?;
                let value = HeaderValue::from_str(&v).map_err(|_| {
                    InferenceClientError::Config(format!("Invalid header value for {k}"))
                })?;
                headers.insert(name, value);
            }
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            label,
        })
    }

    fn map_messages(msgs: &[Message]) -> Vec<OaMessage> {
        msgs.iter()
            .map(|m| OaMessage {
                role: match m.role {
                    // Not every compatible provider knows "developer".
                    Role::Developer => Role::System.as_str().to_string(),
                    other => other.as_str().to_string(),
                },
                content: m.content.clone().unwrap_or_default(),
            })
            .collect()
    }

    #[instrument(name = "openai.chat", skip_all, fields(provider = self.label, model = %req.base.model))]
    pub async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, InferenceClientError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = OaChatRequest::from(req);

        let resp = self.client.post(url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        // HTTP error
        if !status.is_success() {
            error!(%status, body = %text, "request failed");
            if let Some(e) = self.parse_error(&text) {
                return Err(e);
            }
            return Err(InferenceClientError::Api(format!(
                "{} request failed: {status} - {text}",
                self.label
            )));
        }

        // HTTP 200 but body is an error envelope
        if let Some(e) = self.parse_error(&text) {
            return Err(e);
        }

        let oa: OaChatResponse = serde_json::from_str(&text).map_err(|e| {
            InferenceClientError::Serialization(format!("decode error: {e}; raw: {text}"))
        })?;
        debug!(model = %oa.model, choices = oa.choices.len(), "chat completion received");

        let choice = oa.choices.first();
        let message = choice
            .map(|c| Message::assistant(c.message.content.clone().unwrap_or_default()))
            .unwrap_or_else(|| Message::assistant(String::new()));

        Ok(ChatResponse {
            model: oa.model,
            created_at: oa.created.to_string(),
            message,
            done: true,
            done_reason: choice.and_then(|c| c.finish_reason.clone()),
            total_duration: None,
            prompt_eval_count: oa.usage.as_ref().map(|u| u.prompt_tokens),
            eval_count: oa.usage.as_ref().map(|u| u.completion_tokens),
        })
    }

    fn parse_error(&self, text: &str) -> Option<InferenceClientError> {
        let s = text.trim_start();
        if !s.starts_with('{') || !s.contains("\"error\"") {
            return None;
        }
        match serde_json::from_str::<OaErrorEnvelope>(s) {
            Ok(env) => {
                let code = env.error.code.unwrap_or(Value::Null);
                let msg = env.error.message;
                Some(InferenceClientError::Api(format!(
                    "{} error {code}: {msg}",
                    self.label
                )))
            }
            Err(_) => None,
        }
    }
}

impl StructuredOutputFormat for OpenAiClient {
    fn format(spec: &SchemaSpec) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": spec.name.clone().unwrap_or_else(|| "response".to_string()),
                "schema": spec.bare_schema(),
                "strict": spec.strict.unwrap_or(false),
            }
        })
    }
}

#[derive(Serialize)]
struct OaChatRequest {
    model: String,
    messages: Vec<OaMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

impl From<ChatRequest> for OaChatRequest {
    fn from(value: ChatRequest) -> Self {
        let ChatRequest { base, messages } = value;
        Self {
            model: base.model,
            messages: OpenAiClient::map_messages(&messages),
            stream: Some(false),
            response_format: base.format,
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
struct OaMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OaResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OaChoice {
    message: OaResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OaUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct OaChatResponse {
    #[serde(default)]
    created: u64,
    model: String,
    choices: Vec<OaChoice>,
    #[serde(default)]
    usage: Option<OaUsage>,
}

#[derive(Deserialize, Debug)]
struct OaErrorEnvelope {
    error: OaErrorBody,
}

#[derive(Deserialize, Debug)]
struct OaErrorBody {
    message: String,
    #[serde(default)]
    code: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_wraps_schema_in_json_schema_envelope() {
        let spec = SchemaSpec::from_value(json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object"
        }))
        .with_name("RelatedTopics")
        .strict(true);

        let f = OpenAiClient::format(&spec);
        assert_eq!(f["type"], "json_schema");
        assert_eq!(f["json_schema"]["name"], "RelatedTopics");
        assert_eq!(f["json_schema"]["strict"], true);
        assert_eq!(f["json_schema"]["schema"], json!({"type": "object"}));
    }

    #[test]
    fn developer_role_is_sent_as_system() {
        let mapped = OpenAiClient::map_messages(&[Message::developer("be brief"), Message::user("hi")]);
        assert_eq!(mapped[0].role, "system");
        assert_eq!(mapped[1].role, "user");
        assert_eq!(mapped[1].content, "hi");
    }
}
