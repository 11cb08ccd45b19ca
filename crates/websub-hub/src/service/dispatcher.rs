//! # Notification Dispatcher
//!
//! One tick notifies every topic in the registry:
//!
//! 1. Build the topic payload (identical on every tick)
//! 2. Snapshot the topic's subscribers
//! 3. Sign per subscriber with its own secret and POST concurrently
//!
//! A failed delivery is logged and does not affect the other subscribers.
//! There is no retry; the subscriber simply gets the next tick.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{NotificationPayload, Subscription};
use crate::domain::signature::signature_header_value;
use crate::domain::store::SubscriptionStore;
use crate::error::{DeliveryFailure, HubError};
use crate::ports::outbound::{SignedNotification, SubscriberClient, TopicRegistry};
use crate::service::scheduler::{spawn_periodic, TaskHandle};

/// Outcome of one dispatch tick for one topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub topic: String,
    pub attempted: usize,
    pub delivered: usize,
    pub failures: Vec<DeliveryFailure>,
}

/// Pushes signed notifications to subscribers. Never mutates the store.
pub struct NotificationDispatcher {
    store: Arc<SubscriptionStore>,
    topics: Arc<dyn TopicRegistry>,
    client: Arc<dyn SubscriberClient>,
}

impl NotificationDispatcher {
    pub fn new(
        store: Arc<SubscriptionStore>,
        topics: Arc<dyn TopicRegistry>,
        client: Arc<dyn SubscriberClient>,
    ) -> Self {
        Self {
            store,
            topics,
            client,
        }
    }

    /// Run one tick over every registered topic.
    pub async fn dispatch_all(&self) -> Vec<DispatchReport> {
        let topics = self.topics.topics();
        let mut reports = Vec::with_capacity(topics.len());
        for topic in topics {
            reports.push(self.dispatch_topic(&topic).await);
        }
        reports
    }

    /// Notify every current subscriber of `topic`.
    pub async fn dispatch_topic(&self, topic: &str) -> DispatchReport {
        let mut report = DispatchReport {
            topic: topic.to_string(),
            ..DispatchReport::default()
        };

        let subscribers = self.store.list(topic);
        if subscribers.is_empty() {
            debug!(topic, "No subscribers to notify");
            return report;
        }

        let body = match serde_json::to_vec(&NotificationPayload::for_topic(topic)) {
            Ok(body) => body,
            Err(e) => {
                error!(topic, error = %e, "Failed to encode notification payload");
                return report;
            }
        };

        info!(topic, subscribers = subscribers.len(), "Sending notification to subscribers");

        let results = join_all(
            subscribers
                .iter()
                .map(|subscription| self.deliver(subscription, &body)),
        )
        .await;

        report.attempted = results.len();
        for result in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(failure) => report.failures.push(failure),
            }
        }
        report
    }

    async fn deliver(&self, subscription: &Subscription, body: &[u8]) -> Result<(), DeliveryFailure> {
        let notification = SignedNotification {
            body: body.to_vec(),
            signature: signature_header_value(subscription.secret.as_bytes(), body),
        };

        let failure = match self.client.deliver(&subscription.callback, &notification).await {
            Ok(status) if (200..300).contains(&status) => {
                debug!(callback = %subscription.callback, status, "Notification delivered");
                return Ok(());
            }
            Ok(status) => DeliveryFailure {
                callback: subscription.callback.clone(),
                message: format!("subscriber returned status {status}"),
                status: Some(status),
            },
            Err(e) => DeliveryFailure {
                callback: subscription.callback.clone(),
                message: e.message,
                status: None,
            },
        };

        let err = HubError::from(failure.clone());
        warn!(
            topic = %subscription.topic,
            callback = %failure.callback,
            kind = %err.kind(),
            status = ?err.status(),
            error = %err,
            "Error sending notification"
        );
        Err(failure)
    }

    /// One scheduled tick: [`dispatch_all`](Self::dispatch_all) plus a
    /// per-topic summary in the log.
    pub async fn tick(&self) -> Vec<DispatchReport> {
        let reports = self.dispatch_all().await;
        for report in &reports {
            info!(
                topic = %report.topic,
                attempted = report.attempted,
                delivered = report.delivered,
                failed = report.failures.len(),
                "Dispatch tick finished"
            );
        }
        reports
    }

    /// Run [`tick`](Self::tick) every `period` until stopped.
    pub fn spawn(self: Arc<Self>, period: Duration) -> TaskHandle {
        spawn_periodic("notification-dispatch", period, move || {
            let dispatcher = Arc::clone(&self);
            async move {
                dispatcher.tick().await;
            }
        })
    }
}
