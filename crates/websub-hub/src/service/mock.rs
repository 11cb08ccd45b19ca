//! Recording subscriber client for service tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::error::TransportError;
use crate::ports::outbound::{CallbackResponse, ChallengeParams, SignedNotification, SubscriberClient};

/// How the fake callback answers a challenge.
#[derive(Debug, Clone)]
pub enum ChallengeBehavior {
    Echo,
    Status(u16),
    WrongBody,
    Transport,
    Timeout,
}

#[derive(Default)]
pub struct MockSubscriberClient {
    challenge_behavior: Mutex<HashMap<String, ChallengeBehavior>>,
    delivery_status: Mutex<HashMap<String, Result<u16, TransportError>>>,
    fail_denials: Mutex<bool>,
    pub challenges: Mutex<Vec<(String, ChallengeParams)>>,
    pub denials: Mutex<Vec<(String, String, String)>>,
    pub deliveries: Mutex<Vec<(String, SignedNotification)>>,
}

impl MockSubscriberClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_challenge(&self, callback: &str, behavior: ChallengeBehavior) {
        self.challenge_behavior
            .lock()
            .insert(callback.to_string(), behavior);
    }

    pub fn on_deliver(&self, callback: &str, result: Result<u16, TransportError>) {
        self.delivery_status
            .lock()
            .insert(callback.to_string(), result);
    }

    pub fn fail_denials(&self) {
        *self.fail_denials.lock() = true;
    }
}

#[async_trait]
impl SubscriberClient for MockSubscriberClient {
    async fn send_challenge(
        &self,
        callback: &str,
        params: &ChallengeParams,
    ) -> Result<CallbackResponse, TransportError> {
        self.challenges
            .lock()
            .push((callback.to_string(), params.clone()));

        let behavior = self
            .challenge_behavior
            .lock()
            .get(callback)
            .cloned()
            .unwrap_or(ChallengeBehavior::Echo);

        match behavior {
            ChallengeBehavior::Echo => Ok(CallbackResponse {
                status: 200,
                body: params.challenge.clone().into_bytes(),
            }),
            ChallengeBehavior::Status(status) => Ok(CallbackResponse {
                status,
                body: params.challenge.clone().into_bytes(),
            }),
            ChallengeBehavior::WrongBody => Ok(CallbackResponse {
                status: 200,
                body: format!("{}\n", params.challenge).into_bytes(),
            }),
            ChallengeBehavior::Transport => Err(TransportError::new("connection refused")),
            ChallengeBehavior::Timeout => Err(TransportError::timeout("operation timed out")),
        }
    }

    async fn send_denial(
        &self,
        callback: &str,
        topic: &str,
        reason: &str,
    ) -> Result<u16, TransportError> {
        self.denials
            .lock()
            .push((callback.to_string(), topic.to_string(), reason.to_string()));
        if *self.fail_denials.lock() {
            return Err(TransportError::new("connection refused"));
        }
        Ok(200)
    }

    async fn deliver(
        &self,
        callback: &str,
        notification: &SignedNotification,
    ) -> Result<u16, TransportError> {
        self.deliveries
            .lock()
            .push((callback.to_string(), notification.clone()));
        self.delivery_status
            .lock()
            .get(callback)
            .cloned()
            .unwrap_or(Ok(200))
    }
}
