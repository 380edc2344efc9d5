use serde::{Deserialize, Serialize};

use crate::services::llm::{ChatRequest, ChatResponse};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum NotificationContent {
    /// The node finished; carries the serialized result or the error text.
    Done(Success, Response),
    PromptRequest(ChatRequest),
    PromptSuccessResult(ChatResponse),
    PromptErrorResult(String),
}

pub type Success = bool;
pub type Response = Option<String>;
