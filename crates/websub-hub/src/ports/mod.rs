//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for the routing layer
//! - Driven Ports (outbound) - clock, topic registry, subscriber HTTP

pub mod inbound;
pub mod outbound;

pub use inbound::{Ack, SubscriptionApi};
pub use outbound::{
    CallbackResponse, ChallengeParams, ManualTimeSource, SignedNotification, SubscriberClient,
    SystemTimeSource, TimeSource, TopicRegistry,
};
