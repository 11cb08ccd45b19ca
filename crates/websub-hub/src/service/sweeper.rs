//! Expiration sweep: garbage-collects subscriptions whose lease has elapsed.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::store::SubscriptionStore;
use crate::service::scheduler::{spawn_periodic, TaskHandle};

pub struct ExpirationSweeper {
    store: Arc<SubscriptionStore>,
}

impl ExpirationSweeper {
    pub fn new(store: Arc<SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Purge expired subscriptions as of the store's clock. Returns the count.
    pub fn sweep(&self) -> usize {
        let removed = self.store.sweep_expired();
        if removed > 0 {
            info!(removed, remaining = self.store.len(), "Removed outdated subscriptions");
        } else {
            debug!("No outdated subscriptions");
        }
        removed
    }

    /// Run [`sweep`](Self::sweep) every `period` until stopped.
    pub fn spawn(self: Arc<Self>, period: Duration) -> TaskHandle {
        spawn_periodic("expiration-sweep", period, move || {
            let sweeper = Arc::clone(&self);
            async move {
                sweeper.sweep();
            }
        })
    }
}
