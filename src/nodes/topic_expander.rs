use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::{
    config::RunConfig,
    prompts::{related_topics_prompt, TOPIC_VARIABLE},
    services::llm::{invoke_structured, ModelLoader, ProviderModelLoader},
    state::{ConversationState, RelatedTopics, RelatedTopicsUpdate},
    templates::Template,
    NotificationHandler,
};

use super::{Node, NodeError};

pub const TOPIC_EXPANDER_ID: &str = "expand_topics";

/// Asks the configured fast model for subjects related to the latest user
/// message.
///
/// Holds no mutable state; one instance can serve concurrent invocations.
#[derive(Clone)]
pub struct TopicExpander {
    loader: Arc<dyn ModelLoader>,
    prompt: Template,
}

impl TopicExpander {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            prompt: related_topics_prompt(),
        }
    }

    /// Expander loading models with provider settings from the environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(ProviderModelLoader::from_env()))
    }

    /// Expand the latest user message into related topics.
    ///
    /// Loads `fast_llm_model` from the run's configuration, renders the
    /// related-topics prompt with the most recent user message and asks the
    /// model for a [`RelatedTopics`] reply.
    ///
    /// Fails with [`NodeError::InvalidState`] when the state holds no user
    /// message; no model call is made in that case. Errors from loading or
    /// calling the model are returned unchanged as [`NodeError::Upstream`].
    #[instrument(
        level = "debug",
        name = "expand_topics",
        skip_all,
        fields(
            run_name = %config.run_name,
            tags = ?config.tags,
            metadata = ?config.metadata,
            model = %config.configuration().fast_llm_model,
        )
    )]
    pub async fn expand_topics(
        &self,
        state: &ConversationState,
        config: &RunConfig,
    ) -> Result<RelatedTopicsUpdate, NodeError> {
        let result = self.expand(state, config).await;
        match &result {
            Ok(update) => {
                config
                    .notify_done(true, serde_json::to_string(&update.related_topics).ok())
                    .await
            }
            Err(e) => config.notify_done(false, Some(e.to_string())).await,
        };
        result
    }

    async fn expand(
        &self,
        state: &ConversationState,
        config: &RunConfig,
    ) -> Result<RelatedTopicsUpdate, NodeError> {
        // A state without a user message is rejected before any model is loaded.
        let Some(last_user_message) = state.last_user_message() else {
            return Err(NodeError::InvalidState(
                "No user message found in state".into(),
            ));
        };

        let configuration = config.configuration();
        let model = self.loader.load(&configuration.fast_llm_model)?;

        let data = HashMap::from([(
            TOPIC_VARIABLE.to_string(),
            last_user_message.text().to_string(),
        )]);
        let prompt = self.prompt.compile(&data);

        let related_topics =
            invoke_structured::<RelatedTopics>(model.as_ref(), prompt, config).await?;
        info!(count = related_topics.topics.len(), "related topics generated");

        Ok(RelatedTopicsUpdate { related_topics })
    }
}

impl fmt::Debug for TopicExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicExpander")
            .field("loader", &"Arc<dyn ModelLoader>")
            .field("prompt", &self.prompt)
            .finish()
    }
}

#[async_trait]
impl Node<ConversationState> for TopicExpander {
    type Update = RelatedTopicsUpdate;

    fn id(&self) -> &str {
        TOPIC_EXPANDER_ID
    }

    async fn run(
        &self,
        state: &ConversationState,
        config: &RunConfig,
    ) -> Result<RelatedTopicsUpdate, NodeError> {
        self.expand_topics(state, config).await
    }
}
