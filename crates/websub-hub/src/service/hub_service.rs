//! # Hub Service
//!
//! Implements [`SubscriptionApi`]: synchronous validation, then intent
//! verification and the store mutation on a spawned task.
//!
//! ## Flow
//!
//! 1. Parse the form and check the topic against the registry
//! 2. Acknowledge the caller
//! 3. Verify intent against the callback
//! 4. On success, add or remove the subscription; the lease starts here
//! 5. On failure of a subscribe attempt, send the best-effort denial

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::config::HubConfig;
use crate::domain::entities::{Mode, SubscribeRequest, Subscription, SubscriptionForm};
use crate::domain::store::SubscriptionStore;
use crate::error::{HubError, ValidationError, VerificationFailure};
use crate::ports::inbound::{Ack, SubscriptionApi};
use crate::ports::outbound::{SubscriberClient, TopicRegistry};
use crate::service::verifier::IntentVerifier;

/// Result of a verified request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Subscribed(Subscription),
    Unsubscribed { removed: bool },
}

/// Verification plus store mutation. Cheap to clone into spawned tasks.
#[derive(Clone)]
struct RequestProcessor {
    store: Arc<SubscriptionStore>,
    verifier: IntentVerifier,
}

impl RequestProcessor {
    async fn process(
        &self,
        request_id: Uuid,
        request: SubscribeRequest,
    ) -> Result<RequestOutcome, VerificationFailure> {
        if let Err(failure) = self.verifier.verify(&request).await {
            let err = HubError::from(failure.clone());
            warn!(
                %request_id,
                callback = %request.callback,
                topic = %request.topic,
                mode = %request.mode,
                kind = %err.kind(),
                status = ?err.status(),
                error = %err,
                "Verification of intent failed"
            );
            if request.mode == Mode::Subscribe {
                self.verifier.deny(&request, &failure).await;
            }
            return Err(failure);
        }

        let outcome = match request.mode {
            Mode::Subscribe => RequestOutcome::Subscribed(self.store.add(
                &request.topic,
                &request.callback,
                &request.secret,
                request.lease_seconds,
            )),
            Mode::Unsubscribe => RequestOutcome::Unsubscribed {
                removed: self.store.remove(&request.topic, &request.callback),
            },
        };

        info!(
            %request_id,
            callback = %request.callback,
            topic = %request.topic,
            mode = %request.mode,
            "Subscription request applied"
        );
        Ok(outcome)
    }
}

/// Entry point for subscription requests.
pub struct HubService {
    processor: RequestProcessor,
    topics: Arc<dyn TopicRegistry>,
    default_lease_seconds: u64,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl HubService {
    pub fn new(
        store: Arc<SubscriptionStore>,
        topics: Arc<dyn TopicRegistry>,
        client: Arc<dyn SubscriberClient>,
        config: &HubConfig,
    ) -> Self {
        Self {
            processor: RequestProcessor {
                store,
                verifier: IntentVerifier::new(client, config.challenge_length),
            },
            topics,
            default_lease_seconds: config.default_lease_seconds,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> Arc<SubscriptionStore> {
        Arc::clone(&self.processor.store)
    }

    /// Parse the form and check the topic exists. No network access.
    pub fn validate(&self, form: SubscriptionForm) -> Result<SubscribeRequest, ValidationError> {
        let request = SubscribeRequest::parse(form, self.default_lease_seconds)?;
        if !self.topics.topic_exists(&request.topic) {
            return Err(ValidationError::UnknownTopic(request.topic));
        }
        Ok(request)
    }

    /// Verify and apply a validated request, awaiting the outcome.
    pub async fn process(
        &self,
        request: SubscribeRequest,
    ) -> Result<RequestOutcome, VerificationFailure> {
        self.processor.process(Uuid::new_v4(), request).await
    }

    /// Number of verification tasks not yet finished.
    pub fn in_flight(&self) -> usize {
        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|handle| !handle.is_finished());
        in_flight.len()
    }

    /// Wait for every spawned verification to finish or hit its timeout.
    pub async fn drain(&self) {
        loop {
            let handles = std::mem::take(&mut *self.in_flight.lock());
            if handles.is_empty() {
                return;
            }
            info!(count = handles.len(), "Waiting for in-flight verifications");
            for handle in handles {
                if let Err(e) = handle.await {
                    error!(error = %e, "Verification task failed");
                }
            }
        }
    }
}

impl SubscriptionApi for HubService {
    fn handle_subscription_request(&self, form: SubscriptionForm) -> Result<Ack, ValidationError> {
        let request = self
            .validate(form)
            .inspect_err(|e| warn!(error = %e, "Rejected subscription request"))?;

        let request_id = Uuid::new_v4();
        let ack = Ack {
            request_id,
            mode: request.mode,
            topic: request.topic.clone(),
        };

        let processor = self.processor.clone();
        let handle = tokio::spawn(async move {
            let _ = processor.process(request_id, request).await;
        });

        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);

        Ok(ack)
    }
}
