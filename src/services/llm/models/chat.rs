use serde::{Deserialize, Serialize};

use crate::services::llm::models::base::{BaseRequest, Message};

#[derive(Serialize, Debug, Clone, Deserialize, PartialEq)]
pub struct ChatRequest {
    #[serde(flatten)]
    pub base: BaseRequest,
    pub messages: Vec<Message>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            base: BaseRequest {
                model: model.into(),
                format: None,
                stream: Some(false),
            },
            messages,
        }
    }
}

/// Provider-neutral chat response. Field names follow Ollama's `/api/chat`
/// reply, other providers are mapped onto it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub model: String,
    pub created_at: String,
    pub message: Message,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u32>,
}

impl ChatResponse {
    /// A completed assistant reply with no usage data.
    pub fn assistant(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            created_at: String::new(),
            message: Message::assistant(content),
            done: true,
            done_reason: Some("stop".into()),
            total_duration: None,
            prompt_eval_count: None,
            eval_count: None,
        }
    }
}
