//! Outbound Ports (Driven Ports)
//!
//! Dependencies the hub needs from the outside world: a clock, the topic
//! registry, and an HTTP client that talks to subscriber callbacks.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::{Mode, Timestamp};
use crate::error::TransportError;

// =============================================================================
// TIME
// =============================================================================

/// Time source trait for testability.
pub trait TimeSource: Send + Sync {
    /// Current Unix timestamp in seconds.
    fn now(&self) -> Timestamp;
}

/// System clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually advanced clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now: AtomicU64,
}

impl ManualTimeSource {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

// =============================================================================
// TOPICS
// =============================================================================

/// Registry of topics that may be subscribed to.
pub trait TopicRegistry: Send + Sync {
    fn topic_exists(&self, topic: &str) -> bool;

    /// Every known topic. The dispatcher notifies each one per tick.
    fn topics(&self) -> Vec<String>;
}

// =============================================================================
// SUBSCRIBER HTTP
// =============================================================================

/// Query parameters of a verification GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeParams {
    pub mode: Mode,
    pub topic: String,
    pub challenge: String,
}

/// Status and body of a callback response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl CallbackResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A payload ready for delivery to one subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedNotification {
    pub body: Vec<u8>,
    /// Value of the `X-Hub-Signature` header, `sha256=<hex>`.
    pub signature: String,
}

/// HTTP client used to reach subscriber callbacks.
///
/// Implementations bound every call with a timeout.
#[async_trait]
pub trait SubscriberClient: Send + Sync {
    /// GET `callback?hub.mode=..&hub.topic=..&hub.challenge=..`.
    async fn send_challenge(
        &self,
        callback: &str,
        params: &ChallengeParams,
    ) -> Result<CallbackResponse, TransportError>;

    /// GET `callback?hub.mode=denied&topic=..&reason=..`. Returns the status.
    async fn send_denial(
        &self,
        callback: &str,
        topic: &str,
        reason: &str,
    ) -> Result<u16, TransportError>;

    /// POST the signed notification. Returns the status.
    async fn deliver(
        &self,
        callback: &str,
        notification: &SignedNotification,
    ) -> Result<u16, TransportError>;
}
