use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::{config::Configuration, Notification, NotificationHandler};

pub const DEFAULT_RUN_NAME: &str = "expand_topics";

/// Per-invocation settings threaded through every nested call.
///
/// Carries the resolved [`Configuration`], the optional notification channel
/// used as callback sink, and the labels recorded on tracing spans.
#[derive(Debug, Clone)]
pub struct RunConfig {
    configuration: Configuration,
    /// Name reported on notifications and spans.
    pub run_name: String,
    pub tags: Vec<String>,
    pub metadata: HashMap<String, Value>,
    /// Notification channel for emitting node events.
    pub notification_channel: Option<Sender<Notification>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

impl RunConfig {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            run_name: DEFAULT_RUN_NAME.into(),
            tags: Vec::new(),
            metadata: HashMap::new(),
            notification_channel: None,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn with_run_name(mut self, run_name: impl Into<String>) -> Self {
        self.run_name = run_name.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_notification_channel(mut self, sender: Sender<Notification>) -> Self {
        self.notification_channel = Some(sender);
        self
    }

    /// Create a new notification channel for this run.
    ///
    /// Replaces any previous sender and returns the receiving half.
    pub fn new_notification_channel(&mut self) -> Receiver<Notification> {
        let (s, r) = mpsc::channel::<Notification>(100);
        self.notification_channel = Some(s);
        r
    }
}

impl NotificationHandler for RunConfig {
    fn get_outgoing_channel(&self) -> &Option<Sender<Notification>> {
        &self.notification_channel
    }

    fn get_channel_name(&self) -> &str {
        &self.run_name
    }
}
