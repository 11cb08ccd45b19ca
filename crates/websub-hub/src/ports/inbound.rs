//! Inbound Ports (Driving Ports)
//!
//! The API the routing layer uses to hand subscription requests to the hub.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Mode, SubscriptionForm};
use crate::error::ValidationError;

/// Immediate acknowledgement of an accepted request.
///
/// Verification and the store mutation happen after this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub request_id: Uuid,
    pub mode: Mode,
    pub topic: String,
}

/// Primary hub API (Driving Port).
pub trait SubscriptionApi: Send + Sync {
    /// Validate the request synchronously and schedule intent verification.
    ///
    /// # Errors
    ///
    /// Any [`ValidationError`]. No network call is made in that case.
    fn handle_subscription_request(&self, form: SubscriptionForm) -> Result<Ack, ValidationError>;
}
