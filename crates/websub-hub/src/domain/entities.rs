//! Core domain entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Default lease when the subscriber does not ask for one: 10 days.
pub const DEFAULT_LEASE_SECONDS: u64 = 60 * 60 * 24 * 10;

/// Requested operation on a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Subscribe,
    Unsubscribe,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Subscribe => "subscribe",
            Mode::Unsubscribe => "unsubscribe",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscribe" => Ok(Mode::Subscribe),
            "unsubscribe" => Ok(Mode::Unsubscribe),
            other => Err(ValidationError::InvalidMode(other.to_string())),
        }
    }
}

/// Raw subscription request fields as received from the transport.
///
/// Every field is optional and untyped; [`SubscribeRequest::parse`] turns this
/// into a validated request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionForm {
    #[serde(rename = "hub.callback")]
    pub callback: Option<String>,
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.topic")]
    pub topic: Option<String>,
    #[serde(rename = "hub.secret")]
    pub secret: Option<String>,
    #[serde(rename = "hub.lease_seconds")]
    pub lease_seconds: Option<String>,
}

/// A validated subscribe/unsubscribe request. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeRequest {
    pub callback: String,
    pub mode: Mode,
    pub topic: String,
    pub secret: String,
    pub lease_seconds: u64,
}

impl SubscribeRequest {
    /// Validate the raw form. Topic existence is checked separately by the
    /// service against the topic registry.
    pub fn parse(form: SubscriptionForm, default_lease: u64) -> Result<Self, ValidationError> {
        let callback = non_empty(form.callback, "hub.callback")?;
        validate_callback(&callback)?;

        let mode: Mode = non_empty(form.mode, "hub.mode")?.parse()?;
        let topic = non_empty(form.topic, "hub.topic")?;

        let lease_seconds = match form.lease_seconds.as_deref() {
            None | Some("") => default_lease,
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| ValidationError::InvalidLeaseSeconds(format!("{raw}: {e}")))?,
        };

        Ok(Self {
            callback,
            mode,
            topic,
            secret: form.secret.unwrap_or_default(),
            lease_seconds,
        })
    }
}

fn non_empty(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn validate_callback(callback: &str) -> Result<(), ValidationError> {
    let url = reqwest::Url::parse(callback).map_err(|e| ValidationError::InvalidCallback {
        callback: callback.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ValidationError::InvalidCallback {
            callback: callback.to_string(),
            reason: format!("unsupported scheme {scheme}"),
        }),
    }
}

/// An active subscription. Identity is `(topic, callback)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub topic: String,
    pub callback: String,
    pub secret: String,
    pub expires_at: Timestamp,
}

impl Subscription {
    /// A subscription is expired once `now` is strictly past `expires_at`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at < now
    }
}

/// Body pushed to subscribers on every dispatch tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub data: String,
}

impl NotificationPayload {
    pub fn for_topic(topic: &str) -> Self {
        Self {
            data: format!("This is the topic that you're subscribed to: {topic}"),
        }
    }
}
