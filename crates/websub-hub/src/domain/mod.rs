//! Domain Layer
//!
//! Pure hub logic: entities, configuration, the subscription store, payload
//! signing, and challenge generation. The only I/O-adjacent dependency is the
//! `TimeSource` port used by the store.

pub mod challenge;
pub mod config;
pub mod entities;
pub mod signature;
pub mod store;

pub use challenge::generate_challenge;
pub use config::{HubConfig, MIN_CHALLENGE_LENGTH};
pub use entities::{
    Mode, NotificationPayload, SubscribeRequest, Subscription, SubscriptionForm, Timestamp,
    DEFAULT_LEASE_SECONDS,
};
pub use signature::{sign, signature_header_value, SIGNATURE_HEADER};
pub use store::SubscriptionStore;
