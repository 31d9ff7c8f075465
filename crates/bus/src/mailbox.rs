//! Mailbox - topic-based publish/subscribe
//!
//! A topic fans every published message out to the FIFO queue of each
//! consumer subscribed *at publish time*. There is no backlog: a consumer
//! that subscribes later never sees earlier messages.
//!
//! Consumers are plain names. The mailbox also tracks, per consumer, which
//! topics it belongs to, so deleting a topic severs that back-reference.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

/// Mailbox errors. All are recoverable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MailboxError {
    #[error("topic '{0}' not found")]
    TopicNotFound(String),

    #[error("consumer '{consumer}' not found in topic '{topic}'")]
    ConsumerNotFound { topic: String, consumer: String },

    /// The message names a different topic than the one it is published to.
    #[error("message topic '{message_topic}' does not match topic '{topic}'")]
    TopicMismatch { topic: String, message_topic: String },

    #[error("topic '{0}' is disabled")]
    TopicDisabled(String),
}

/// A message. `timestamp_ms` is wall-clock milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub src: String,
    pub dst: String,
    pub content: String,
    pub timestamp_ms: u64,
}

impl Message {
    pub fn new(
        topic: impl Into<String>,
        src: impl Into<String>,
        dst: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            src: src.into(),
            dst: dst.into(),
            content: content.into(),
            timestamp_ms: now_ms(),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone)]
struct Subscription {
    consumer: String,
    queue: VecDeque<Message>,
}

#[derive(Debug, Clone)]
pub struct Topic {
    name: String,
    enabled: bool,
    subscriptions: Vec<Subscription>,
}

impl Topic {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            subscriptions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Consumers in subscription order.
    pub fn consumers(&self) -> impl Iterator<Item = &str> {
        self.subscriptions.iter().map(|s| s.consumer.as_str())
    }

    pub fn has_consumer(&self, consumer: &str) -> bool {
        self.subscription(consumer).is_some()
    }

    fn subscription(&self, consumer: &str) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.consumer == consumer)
    }

    fn subscription_mut(&mut self, consumer: &str) -> Option<&mut Subscription> {
        self.subscriptions.iter_mut().find(|s| s.consumer == consumer)
    }
}

#[derive(Debug, Default)]
pub struct Mailbox {
    topics: BTreeMap<String, Topic>,
    /// consumer name → topics it is subscribed to, in subscription order
    consumers: HashMap<String, Vec<String>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `name`, or return the existing topic.
    pub fn create_topic(&mut self, name: &str) -> &mut Topic {
        self.topics.entry(name.to_string()).or_insert_with(|| {
            tracing::debug!(topic = name, "topic created");
            Topic::new(name)
        })
    }

    /// Remove a topic and drop it from every consumer's topic list.
    pub fn delete_topic(&mut self, name: &str) -> Result<Topic, MailboxError> {
        let topic = self
            .topics
            .remove(name)
            .ok_or_else(|| MailboxError::TopicNotFound(name.to_string()))?;

        for sub in &topic.subscriptions {
            self.forget_membership(&sub.consumer, name);
        }
        tracing::debug!(topic = name, consumers = topic.subscriptions.len(), "topic deleted");
        Ok(topic)
    }

    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.get(name)
    }

    pub fn has_topic(&self, name: &str) -> bool {
        self.topics.contains_key(name)
    }

    /// Topic names in lexical order.
    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    /// Disabled topics reject publishes but keep their queues.
    pub fn set_topic_enabled(&mut self, name: &str, enabled: bool) -> Result<(), MailboxError> {
        self.topic_mut(name)?.enabled = enabled;
        Ok(())
    }

    /// Subscribe `consumer` to `topic`. Returns `false` when it already was.
    pub fn subscribe(&mut self, topic: &str, consumer: &str) -> Result<bool, MailboxError> {
        let t = self.topic_mut(topic)?;
        if t.has_consumer(consumer) {
            return Ok(false);
        }
        t.subscriptions.push(Subscription {
            consumer: consumer.to_string(),
            queue: VecDeque::new(),
        });
        self.consumers
            .entry(consumer.to_string())
            .or_default()
            .push(topic.to_string());

        tracing::debug!(topic, consumer, "consumer subscribed");
        Ok(true)
    }

    /// Remove `consumer` from `topic`, discarding its pending messages.
    pub fn unsubscribe(&mut self, topic: &str, consumer: &str) -> Result<(), MailboxError> {
        let t = self.topic_mut(topic)?;
        let before = t.subscriptions.len();
        t.subscriptions.retain(|s| s.consumer != consumer);
        if t.subscriptions.len() == before {
            return Err(consumer_not_found(topic, consumer));
        }
        self.forget_membership(consumer, topic);
        tracing::debug!(topic, consumer, "consumer unsubscribed");
        Ok(())
    }

    /// Append `message` to the queue of every consumer currently subscribed.
    ///
    /// Returns the number of queues it landed in.
    pub fn publish(&mut self, topic: &str, message: Message) -> Result<usize, MailboxError> {
        if message.topic != topic {
            return Err(MailboxError::TopicMismatch {
                topic: topic.to_string(),
                message_topic: message.topic,
            });
        }
        let t = self.topic_mut(topic)?;
        if !t.enabled {
            return Err(MailboxError::TopicDisabled(topic.to_string()));
        }

        let delivered = t.subscriptions.len();
        for sub in &mut t.subscriptions {
            sub.queue.push_back(message.clone());
        }
        tracing::trace!(topic, delivered, "message published");
        Ok(delivered)
    }

    /// Pop the oldest message for `consumer`. An empty queue is `Ok(None)`.
    pub fn consume(&mut self, topic: &str, consumer: &str) -> Result<Option<Message>, MailboxError> {
        let sub = self
            .topic_mut(topic)?
            .subscription_mut(consumer)
            .ok_or_else(|| consumer_not_found(topic, consumer))?;
        Ok(sub.queue.pop_front())
    }

    /// Number of messages waiting for `consumer` in `topic`.
    pub fn pending(&self, topic: &str, consumer: &str) -> Result<usize, MailboxError> {
        let t = self
            .topics
            .get(topic)
            .ok_or_else(|| MailboxError::TopicNotFound(topic.to_string()))?;
        t.subscription(consumer)
            .map(|s| s.queue.len())
            .ok_or_else(|| consumer_not_found(topic, consumer))
    }

    pub fn is_topic_in_consumer(&self, topic: &str, consumer: &str) -> bool {
        self.consumers
            .get(consumer)
            .is_some_and(|topics| topics.iter().any(|t| t == topic))
    }

    /// Topics `consumer` is subscribed to, in subscription order.
    pub fn consumer_topics(&self, consumer: &str) -> &[String] {
        self.consumers.get(consumer).map_or(&[], Vec::as_slice)
    }

    /// Drop every topic, consumer and queued message.
    pub fn clean(&mut self) {
        self.topics.clear();
        self.consumers.clear();
    }

    fn topic_mut(&mut self, name: &str) -> Result<&mut Topic, MailboxError> {
        self.topics
            .get_mut(name)
            .ok_or_else(|| MailboxError::TopicNotFound(name.to_string()))
    }

    fn forget_membership(&mut self, consumer: &str, topic: &str) {
        if let Some(topics) = self.consumers.get_mut(consumer) {
            topics.retain(|t| t != topic);
            if topics.is_empty() {
                self.consumers.remove(consumer);
            }
        }
    }
}

fn consumer_not_found(topic: &str, consumer: &str) -> MailboxError {
    MailboxError::ConsumerNotFound {
        topic: topic.to_string(),
        consumer: consumer.to_string(),
    }
}
