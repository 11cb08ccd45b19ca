//! # Subscription Store
//!
//! In-memory registry `topic -> callback -> Subscription`.
//!
//! ## Consistency
//!
//! Every operation takes the single internal lock for its whole duration, so
//! readers never observe a half-updated bucket and `list` always returns a
//! complete copy. The lock is never handed out to callers.
//!
//! ## Invariants
//!
//! - At most one record per `(topic, callback)`; a later `add` replaces the
//!   earlier one, lease included.
//! - A topic with no callbacks has no bucket.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{Subscription, Timestamp};
use crate::ports::outbound::{SystemTimeSource, TimeSource};

type Buckets = HashMap<String, HashMap<String, Subscription>>;

/// Concurrency-safe subscription registry.
pub struct SubscriptionStore {
    subscriptions: Mutex<Buckets>,
    time_source: Arc<dyn TimeSource>,
}

impl SubscriptionStore {
    pub fn new(time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            subscriptions: Mutex::new(HashMap::new()),
            time_source,
        }
    }

    /// Store backed by the system clock, wrapped for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert or replace the `(topic, callback)` record.
    ///
    /// The lease starts now: `expires_at = now + lease_seconds`.
    pub fn add(&self, topic: &str, callback: &str, secret: &str, lease_seconds: u64) -> Subscription {
        let expires_at = self.time_source.now().saturating_add(lease_seconds);
        let subscription = Subscription {
            topic: topic.to_string(),
            callback: callback.to_string(),
            secret: secret.to_string(),
            expires_at,
        };

        let mut subs = self.subscriptions.lock();
        subs.entry(topic.to_string())
            .or_default()
            .insert(callback.to_string(), subscription.clone());

        debug!(topic, callback, expires_at, "Subscription stored");
        subscription
    }

    /// Delete the `(topic, callback)` record if present.
    ///
    /// Returns whether a record was removed. Removing an unknown key is not an
    /// error.
    pub fn remove(&self, topic: &str, callback: &str) -> bool {
        let mut subs = self.subscriptions.lock();
        let Some(callbacks) = subs.get_mut(topic) else {
            return false;
        };

        let removed = callbacks.remove(callback).is_some();
        if callbacks.is_empty() {
            subs.remove(topic);
        }

        if removed {
            debug!(topic, callback, "Subscription removed");
        }
        removed
    }

    /// Snapshot of every subscription for `topic`. Order is unspecified.
    pub fn list(&self, topic: &str) -> Vec<Subscription> {
        let subs = self.subscriptions.lock();
        subs.get(topic)
            .map(|callbacks| callbacks.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Look up a single record.
    pub fn get(&self, topic: &str, callback: &str) -> Option<Subscription> {
        let subs = self.subscriptions.lock();
        subs.get(topic).and_then(|callbacks| callbacks.get(callback).cloned())
    }

    /// Remove every record with `expires_at < now`, pruning empty topics.
    ///
    /// Returns the number of records removed.
    pub fn sweep(&self, now: Timestamp) -> usize {
        let mut subs = self.subscriptions.lock();
        let mut removed = 0;

        subs.retain(|_, callbacks| {
            let before = callbacks.len();
            callbacks.retain(|_, sub| !sub.is_expired(now));
            removed += before - callbacks.len();
            !callbacks.is_empty()
        });

        removed
    }

    /// [`sweep`](Self::sweep) using the store's own clock.
    pub fn sweep_expired(&self) -> usize {
        let now = self.time_source.now();
        self.sweep(now)
    }

    /// Number of topics with at least one subscription.
    pub fn topic_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Total number of subscriptions across all topics.
    pub fn len(&self) -> usize {
        self.subscriptions.lock().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.lock().is_empty()
    }
}

impl Default for SubscriptionStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemTimeSource))
    }
}
