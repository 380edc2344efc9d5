use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Developer,
    #[serde(alias = "human")]
    User,
    #[serde(alias = "ai")]
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Developer => "developer",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One conversation message.
///
/// `id` identifies the message inside the conversation state. It survives
/// persistence; provider clients map messages to their own wire shape and
/// leave it out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    #[serde(default = "new_uuid")]
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: String) -> Self {
        Self {
            id: new_uuid(),
            role,
            content: Some(content),
        }
    }

    pub fn system<T: Into<String>>(content: T) -> Self {
        Self::new(Role::System, content.into())
    }
    pub fn developer<T: Into<String>>(content: T) -> Self {
        Self::new(Role::Developer, content.into())
    }
    pub fn user<T: Into<String>>(content: T) -> Self {
        Self::new(Role::User, content.into())
    }
    pub fn assistant<T: Into<String>>(content: T) -> Self {
        Self::new(Role::Assistant, content.into())
    }
    pub fn tool<T: Into<String>>(content: T) -> Self {
        Self::new(Role::Tool, content.into())
    }

    /// Text content, or `""` when the message carries none.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

#[derive(Serialize, Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BaseRequest {
    pub model: String,
    /// Provider-formatted structured output constraint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_id_survives_a_serde_round_trip() {
        let original = Message::user("dogs");
        let json = serde_json::to_string(&original).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn stored_messages_without_id_get_one() {
        let m: Message = serde_json::from_value(json!({"role": "user", "content": "hi"})).unwrap();
        assert!(!m.id.is_empty());
    }

    #[test]
    fn langchain_role_names_are_accepted() {
        let human: Message =
            serde_json::from_value(json!({"role": "human", "content": "cats"})).unwrap();
        let ai: Message = serde_json::from_value(json!({"role": "ai", "content": "meow"})).unwrap();
        assert_eq!(human.role, Role::User);
        assert_eq!(ai.role, Role::Assistant);
        assert_eq!(serde_json::to_value(human.role).unwrap(), json!("user"));
    }
}
