//! Graph nodes: one unit of work taking shared state and a run configuration,
//! returning a partial state update.

mod topic_expander;

use async_trait::async_trait;
use thiserror::Error;

use crate::{config::RunConfig, services::llm::InferenceClientError, state::StateUpdate};

pub use topic_expander::TopicExpander;

#[derive(Debug, Error)]
pub enum NodeError {
    /// The state does not satisfy the node's precondition.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Loading or calling the model failed; the collaborator's error as is.
    #[error(transparent)]
    Upstream(#[from] InferenceClientError),
}

/// One step in a graph: borrowed state in, partial update out.
///
/// `id` must be unique within a graph. The graph merges the returned update
/// with [`StateUpdate::apply`].
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Send + Sync,
{
    type Update: StateUpdate<S> + Send;

    fn id(&self) -> &str;

    async fn run(&self, state: &S, config: &RunConfig) -> Result<Self::Update, NodeError>;
}

/// Runs `node` and merges its update into `state`. On error `state` is left
/// untouched.
pub async fn run_node<S, N>(node: &N, state: &mut S, config: &RunConfig) -> Result<(), NodeError>
where
    S: Send + Sync,
    N: Node<S> + ?Sized,
{
    let update = node.run(state, config).await?;
    update.apply(state);
    Ok(())
}
