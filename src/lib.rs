//! A conversational-agent graph node that expands the user's latest message
//! into a list of related topics using a language model with structured
//! output.
//!
//! ```no_run
//! use topic_expander::{ConversationState, Configuration, Message, RunConfig, TopicExpander};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::new(Configuration::resolve(None)?);
//! let state = ConversationState::new(vec![Message::user("Rust async runtimes")]);
//!
//! let update = TopicExpander::from_env().expand_topics(&state, &config).await?;
//! println!("{:?}", update.related_topics.topics);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod nodes;
pub mod notifications;
pub mod observability;
pub mod prompts;
pub mod services;
pub mod state;
pub mod templates;

pub use config::{ConfigError, Configuration, RunConfig};
pub use nodes::{run_node, Node, NodeError, TopicExpander};
pub use notifications::{Notification, NotificationContent, NotificationHandler};
pub use observability::init_default_tracing;
pub use services::llm::{
    load_chat_model, ChatModel, ClientBuilder, ClientConfig, InferenceClientError, Message,
    ModelLoader, Provider, ProviderModelLoader, Role,
};
pub use state::{ConversationState, RelatedTopics, RelatedTopicsUpdate, StateUpdate};
