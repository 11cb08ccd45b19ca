//! Service Layer
//!
//! Orchestration over the domain and ports:
//! - `HubService`: request validation, verification, store mutation
//! - `IntentVerifier`: challenge/response handshake
//! - `NotificationDispatcher`: periodic signed pushes
//! - `ExpirationSweeper`: periodic lease expiry
//! - `scheduler`: periodic task plumbing shared by the two timers

pub mod dispatcher;
pub mod hub_service;
pub mod scheduler;
pub mod sweeper;
pub mod verifier;

#[cfg(test)]
pub(crate) mod mock;

pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use hub_service::{HubService, RequestOutcome};
pub use scheduler::{spawn_periodic, TaskHandle};
pub use sweeper::ExpirationSweeper;
pub use verifier::IntentVerifier;
