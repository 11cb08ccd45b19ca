//! In-memory topic registry.

use parking_lot::RwLock;
use std::collections::HashSet;

use crate::ports::outbound::TopicRegistry;

/// Set of topic names that may be subscribed to.
#[derive(Debug, Default)]
pub struct InMemoryTopicRegistry {
    topics: RwLock<HashSet<String>>,
}

impl InMemoryTopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with `topics`.
    pub fn with_topics<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: RwLock::new(topics.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns `true` if the topic was not already registered.
    pub fn add_topic(&self, topic: impl Into<String>) -> bool {
        self.topics.write().insert(topic.into())
    }

    /// Returns `true` if the topic was registered.
    pub fn remove_topic(&self, topic: &str) -> bool {
        self.topics.write().remove(topic)
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.read().contains(topic)
    }

    pub fn len(&self) -> usize {
        self.topics.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.read().is_empty()
    }
}

impl TopicRegistry for InMemoryTopicRegistry {
    fn topic_exists(&self, topic: &str) -> bool {
        self.has_topic(topic)
    }

    fn topics(&self) -> Vec<String> {
        self.topics.read().iter().cloned().collect()
    }
}
