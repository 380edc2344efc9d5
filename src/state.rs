//! Conversation state shared by the nodes of an agent graph, and the partial
//! updates nodes return.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::llm::{Message, Role};

/// Subjects related to the latest user message, most relevant first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RelatedTopics {
    /// Comprehensive list of related subjects, used as background research.
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_topics: Option<RelatedTopics>,
}

impl ConversationState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            related_topics: None,
        }
    }

    /// The most recent message written by the user, if any.
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::User)
    }
}

/// A partial state update returned by a node and merged by the graph.
pub trait StateUpdate<S> {
    fn apply(self, state: &mut S);
}

/// Update produced by the topic expansion node.
///
/// Serializes to an object with the single key `related_topics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTopicsUpdate {
    pub related_topics: RelatedTopics,
}

impl StateUpdate<ConversationState> for RelatedTopicsUpdate {
    fn apply(self, state: &mut ConversationState) {
        state.related_topics = Some(self.related_topics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_user_message_scans_from_the_end() {
        let state = ConversationState::new(vec![
            Message::system("sys"),
            Message::user("cats"),
            Message::assistant("ok"),
            Message::user("dogs"),
            Message::assistant("noted"),
            Message::tool("{}"),
        ]);
        assert_eq!(state.last_user_message().map(Message::text), Some("dogs"));
    }

    #[test]
    fn last_user_message_is_none_without_user_messages() {
        let state = ConversationState::new(vec![Message::system("sys"), Message::assistant("hi")]);
        assert!(state.last_user_message().is_none());
        assert!(ConversationState::default().last_user_message().is_none());
    }

    #[test]
    fn update_serializes_to_single_key_and_merges() {
        let update = RelatedTopicsUpdate {
            related_topics: RelatedTopics {
                topics: vec!["wolves".into()],
            },
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"related_topics": {"topics": ["wolves"]}})
        );

        let mut state = ConversationState::new(vec![Message::user("dogs")]);
        update.apply(&mut state);
        assert_eq!(
            state.related_topics.map(|t| t.topics),
            Some(vec!["wolves".to_string()])
        );
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn persisted_state_reloads_equal() {
        let mut state = ConversationState::new(vec![
            Message::system("sys"),
            Message::user("dogs"),
        ]);
        state.related_topics = Some(RelatedTopics {
            topics: vec!["wolves".into()],
        });

        let json = serde_json::to_string(&state).unwrap();
        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn state_with_langchain_roles_finds_the_human_message() {
        let state: ConversationState = serde_json::from_value(json!({
            "messages": [
                {"role": "human", "content": "cats"},
                {"role": "ai", "content": "meow"}
            ]
        }))
        .unwrap();
        assert_eq!(state.last_user_message().map(Message::text), Some("cats"));
    }
}
