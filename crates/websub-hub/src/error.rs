//! Error types for the hub.
//!
//! Three failure families, each with its own handling policy:
//!
//! - [`ValidationError`]: the request is malformed. Rejected before any network
//!   call and reported synchronously to the caller.
//! - [`VerificationFailure`]: the callback did not prove ownership. Reported via
//!   the denial callback for subscribe attempts, logged otherwise.
//! - [`DeliveryFailure`]: a single notification push failed. Logged and
//!   isolated to that subscriber.

use std::fmt;
use thiserror::Error;

/// Classification of a [`HubError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Verification,
    Delivery,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Verification => "verification",
            ErrorKind::Delivery => "delivery",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed or unacceptable subscription request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid callback URL {callback}: {reason}")]
    InvalidCallback { callback: String, reason: String },

    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("invalid lease_seconds: {0}")]
    InvalidLeaseSeconds(String),

    #[error("topic does not exist: {0}")]
    UnknownTopic(String),
}

/// Why an intent verification was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationFailureKind {
    /// The challenge token could not be generated.
    Challenge,
    /// Connection refused, DNS failure, unreadable body.
    Transport,
    /// The callback did not answer within the timeout.
    Timeout,
    /// The callback answered with a non-2xx status.
    Status,
    /// The callback answered 2xx but did not echo the challenge.
    ChallengeMismatch,
}

/// The callback failed the challenge/response handshake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Verification failed: {message} (Code: {})", .status.unwrap_or(0))]
pub struct VerificationFailure {
    pub kind: VerificationFailureKind,
    pub message: String,
    /// HTTP status observed, when the callback answered at all.
    pub status: Option<u16>,
}

impl VerificationFailure {
    pub fn new(kind: VerificationFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// A single notification push did not succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("delivery to {callback} failed: {message}")]
pub struct DeliveryFailure {
    pub callback: String,
    pub message: String,
    pub status: Option<u16>,
}

/// Outbound HTTP call failed before a response status was available.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub timed_out: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }
}

/// Invalid hub configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("challenge_length must be at least {min}, got {actual}")]
    ChallengeTooShort { min: usize, actual: usize },
}

/// Umbrella error carrying one of the three failure families.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Verification(#[from] VerificationFailure),

    #[error(transparent)]
    Delivery(#[from] DeliveryFailure),
}

impl HubError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HubError::Validation(_) => ErrorKind::Validation,
            HubError::Verification(_) => ErrorKind::Verification,
            HubError::Delivery(_) => ErrorKind::Delivery,
        }
    }

    /// HTTP status observed from the remote side, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            HubError::Validation(_) => None,
            HubError::Verification(e) => e.status,
            HubError::Delivery(e) => e.status,
        }
    }
}
