//! # Intent Verification
//!
//! Challenge/response handshake proving the requester controls the callback.
//!
//! ```text
//! Received ──challenge GET──→ ChallengeSent ──2xx + echo──→ Verified
//!                                   │
//!                                   └──anything else──→ Rejected
//! ```
//!
//! Both outcomes are terminal. There are no retries.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::challenge::generate_challenge;
use crate::domain::config::MIN_CHALLENGE_LENGTH;
use crate::domain::entities::SubscribeRequest;
use crate::error::{VerificationFailure, VerificationFailureKind};
use crate::ports::outbound::{ChallengeParams, SubscriberClient};

/// Verifies callback ownership before a subscription change takes effect.
#[derive(Clone)]
pub struct IntentVerifier {
    client: Arc<dyn SubscriberClient>,
    challenge_length: usize,
}

impl IntentVerifier {
    pub fn new(client: Arc<dyn SubscriberClient>, challenge_length: usize) -> Self {
        Self {
            client,
            challenge_length: challenge_length.max(MIN_CHALLENGE_LENGTH),
        }
    }

    /// Run the handshake for `request`.
    ///
    /// # Errors
    ///
    /// A [`VerificationFailure`] on transport error, timeout, non-2xx status,
    /// or a body that is not byte-for-byte the challenge.
    pub async fn verify(&self, request: &SubscribeRequest) -> Result<(), VerificationFailure> {
        let challenge = generate_challenge(self.challenge_length).map_err(|e| {
            VerificationFailure::new(VerificationFailureKind::Challenge, e.to_string())
        })?;

        let params = ChallengeParams {
            mode: request.mode,
            topic: request.topic.clone(),
            challenge,
        };

        debug!(
            callback = %request.callback,
            topic = %request.topic,
            mode = %request.mode,
            "Challenge sent"
        );

        let response = self
            .client
            .send_challenge(&request.callback, &params)
            .await
            .map_err(|e| {
                let kind = if e.timed_out {
                    VerificationFailureKind::Timeout
                } else {
                    VerificationFailureKind::Transport
                };
                VerificationFailure::new(kind, e.message)
            })?;

        if !response.is_success() {
            return Err(VerificationFailure::new(
                VerificationFailureKind::Status,
                "subscriber returned a non-2xx status",
            )
            .with_status(response.status));
        }

        if response.body != params.challenge.as_bytes() {
            return Err(VerificationFailure::new(
                VerificationFailureKind::ChallengeMismatch,
                "subscriber did not echo the challenge",
            )
            .with_status(response.status));
        }

        info!(
            callback = %request.callback,
            topic = %request.topic,
            mode = %request.mode,
            "Intent verified"
        );
        Ok(())
    }

    /// Best-effort denial notice to the callback. Failures are logged only.
    pub async fn deny(&self, request: &SubscribeRequest, failure: &VerificationFailure) {
        let reason = failure.to_string();
        match self
            .client
            .send_denial(&request.callback, &request.topic, &reason)
            .await
        {
            Ok(status) => debug!(
                callback = %request.callback,
                topic = %request.topic,
                status,
                "Denial sent"
            ),
            Err(e) => warn!(
                callback = %request.callback,
                topic = %request.topic,
                error = %e,
                "Failed to send denial"
            ),
        }
    }
}
