//! Scripted chat model and loader for tests and examples.
//!
//! `MockChatModel` answers from a queue of canned replies and records every
//! request it receives, so callers can assert both on what was sent and on
//! how often the model was called.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;

use crate::services::llm::{
    ChatModel, ChatRequest, ChatResponse, InferenceClientError, ModelLoader,
};

type Reply = Result<String, InferenceClientError>;

/// Chat model returning queued replies in order.
///
/// When the queue runs dry the last reply is repeated; with no reply queued at
/// all the call fails with `InferenceClientError::Unsupported`.
#[derive(Debug, Default)]
pub struct MockChatModel {
    model: String,
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatModel {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Mock that always answers with `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self::new("mock").then_content(content)
    }

    /// Mock that always fails with `error`.
    pub fn with_error(error: InferenceClientError) -> Self {
        Self::new("mock").then_error(error)
    }

    /// Queues a successful reply (builder).
    pub fn then_content(self, content: impl Into<String>) -> Self {
        lock(&self.replies).push_back(Ok(content.into()));
        self
    }

    /// Queues a failing reply (builder).
    pub fn then_error(self, error: InferenceClientError) -> Self {
        lock(&self.replies).push_back(Err(error));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn next_reply(&self) -> Reply {
        let mut last = lock(&self.last);
        match lock(&self.replies).pop_front() {
            Some(reply) => {
                *last = Some(reply.clone());
                reply
            }
            None => last.clone().unwrap_or_else(|| {
                Err(InferenceClientError::Unsupported(
                    "MockChatModel has no scripted reply".into(),
                ))
            }),
        }
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, InferenceClientError> {
        lock(&self.requests).push(request);
        let content = self.next_reply()?;
        Ok(ChatResponse::assistant(self.model.clone(), content))
    }
}

/// Loader handing out one shared model, recording requested identifiers.
#[derive(Debug)]
pub struct MockModelLoader {
    model: Arc<MockChatModel>,
    failure: Option<InferenceClientError>,
    loaded: Mutex<Vec<String>>,
}

impl MockModelLoader {
    pub fn new(model: Arc<MockChatModel>) -> Self {
        Self {
            model,
            failure: None,
            loaded: Mutex::new(Vec::new()),
        }
    }

    /// Loader whose every `load` fails with `error`.
    pub fn failing(error: InferenceClientError) -> Self {
        Self {
            model: Arc::new(MockChatModel::default()),
            failure: Some(error),
            loaded: Mutex::new(Vec::new()),
        }
    }

    /// Identifiers passed to `load`, oldest first.
    pub fn loaded(&self) -> Vec<String> {
        lock(&self.loaded).clone()
    }
}

impl ModelLoader for MockModelLoader {
    fn load(&self, identifier: &str) -> Result<Arc<dyn ChatModel>, InferenceClientError> {
        lock(&self.loaded).push(identifier.to_string());
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.model.clone()),
        }
    }
}

// Ignore poisoning; the queues stay valid after a panicking caller.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_are_served_in_order_then_repeated() {
        let m = MockChatModel::with_content("a").then_content("b");
        let req = ChatRequest::new("mock", vec![]);
        assert_eq!(m.chat(req.clone()).await.unwrap().message.text(), "a");
        assert_eq!(m.chat(req.clone()).await.unwrap().message.text(), "b");
        assert_eq!(m.chat(req).await.unwrap().message.text(), "b");
        assert_eq!(m.call_count(), 3);
    }

    #[tokio::test]
    async fn unscripted_mock_fails() {
        let m = MockChatModel::new("mock");
        let err = m.chat(ChatRequest::new("mock", vec![])).await.unwrap_err();
        assert!(matches!(err, InferenceClientError::Unsupported(_)));
    }
}
