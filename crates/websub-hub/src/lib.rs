#![allow(missing_docs)]

//! WebSub Hub - subscription lifecycle and signed notification fan-out.
//!
//! Subscribers register a callback URL for a topic. The hub proves the
//! subscriber controls that URL with a challenge/response handshake, stores
//! the subscription with a lease, and periodically pushes a JSON payload
//! signed with the subscriber's own secret.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                             WEBSUB HUB                                │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │   form POST ──→ SubscriptionApi (HubService)                          │
//! │                      │ validate (no network)                          │
//! │                      ▼                                                │
//! │                 spawned task ──→ IntentVerifier ──challenge GET──→    │
//! │                      │                                                │
//! │                      ▼                                                │
//! │               SubscriptionStore ◄── ExpirationSweeper (every 10 min)  │
//! │                      │                                                │
//! │                      ▼                                                │
//! │         NotificationDispatcher (every 10 s) ──signed POST──→          │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use websub_hub::{HubConfig, HubService, InMemoryTopicRegistry, ReqwestSubscriberClient};
//!
//! let config = HubConfig::default();
//! let store = SubscriptionStore::new_shared();
//! let topics = Arc::new(InMemoryTopicRegistry::with_topics(["oil-price"]));
//! let client = Arc::new(ReqwestSubscriberClient::new(config.http_timeout())?);
//! let service = HubService::new(store, topics, client, &config);
//! ```
//!
//! # Security
//!
//! - Challenges are drawn from the OS RNG and at least 16 characters long
//! - Notifications carry `X-Hub-Signature: sha256=<hex HMAC>` per subscriber
//! - Nothing is stored until the callback echoes the challenge

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryTopicRegistry, ReqwestSubscriberClient, NOTIFICATION_CONTENT_TYPE};
pub use domain::{
    HubConfig, Mode, NotificationPayload, SubscribeRequest, Subscription, SubscriptionForm,
    SubscriptionStore, Timestamp, DEFAULT_LEASE_SECONDS, SIGNATURE_HEADER,
};
pub use error::{
    ConfigError, DeliveryFailure, ErrorKind, HubError, TransportError, ValidationError,
    VerificationFailure, VerificationFailureKind,
};
pub use ports::{
    Ack, ManualTimeSource, SubscriberClient, SubscriptionApi, SystemTimeSource, TimeSource,
    TopicRegistry,
};
pub use service::{
    DispatchReport, ExpirationSweeper, HubService, IntentVerifier, NotificationDispatcher,
    RequestOutcome, TaskHandle,
};
