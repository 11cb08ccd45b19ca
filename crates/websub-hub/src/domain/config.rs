//! Hub configuration with validation.
//!
//! All timeouts and intervals have defaults matching the reference hub and
//! can be overridden by the runtime.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::entities::DEFAULT_LEASE_SECONDS;
use crate::error::ConfigError;

/// Minimum challenge token length accepted by [`HubConfig::validate`].
pub const MIN_CHALLENGE_LENGTH: usize = 16;

/// Core hub configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Seconds between notification dispatch ticks.
    pub notify_interval_secs: u64,
    /// Seconds between expiration sweeps.
    pub sweep_interval_secs: u64,
    /// Timeout for every outbound HTTP call to a subscriber.
    pub http_timeout_secs: u64,
    /// Lease applied when a request omits `hub.lease_seconds`.
    pub default_lease_seconds: u64,
    /// Length of the verification challenge token.
    pub challenge_length: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            notify_interval_secs: 10,
            sweep_interval_secs: 10 * 60,
            http_timeout_secs: 10,
            default_lease_seconds: DEFAULT_LEASE_SECONDS,
            challenge_length: MIN_CHALLENGE_LENGTH,
        }
    }
}

impl HubConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notify_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "notify_interval_secs",
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "sweep_interval_secs",
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "http_timeout_secs",
            });
        }
        if self.challenge_length < MIN_CHALLENGE_LENGTH {
            return Err(ConfigError::ChallengeTooShort {
                min: MIN_CHALLENGE_LENGTH,
                actual: self.challenge_length,
            });
        }
        Ok(())
    }

    pub fn notify_interval(&self) -> Duration {
        Duration::from_secs(self.notify_interval_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
