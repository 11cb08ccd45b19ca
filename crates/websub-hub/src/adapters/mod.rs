//! Adapters Layer
//!
//! Concrete implementations of the outbound ports.

pub mod http_client;
pub mod topics;

pub use http_client::{ReqwestSubscriberClient, NOTIFICATION_CONTENT_TYPE};
pub use topics::InMemoryTopicRegistry;
