use std::time::Duration;

use lib::{
    api::server::ServiceHosts,
    constants::{CREDENTIAL_WINDOW_DAYS, DEFAULT_REQUEST_TIMEOUT, GROUP_CACHE_FRESHNESS},
};
use serde::{Deserialize, Serialize};

/// Tunables of a [`GroupManager`](super::GroupManager). Every field has a
/// default, so a partial (or empty) document deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupsConfig {
    #[serde(flatten)]
    pub hosts: ServiceHosts,
    /// How long a fetched group is served from cache, in seconds.
    pub cache_freshness_secs: u64,
    /// Number of days requested per credential bundle.
    pub credential_window_days: u64,
    pub request_timeout_secs: u64,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            hosts: ServiceHosts::default(),
            cache_freshness_secs: GROUP_CACHE_FRESHNESS.as_secs(),
            credential_window_days: CREDENTIAL_WINDOW_DAYS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl GroupsConfig {
    pub fn cache_freshness(&self) -> Duration {
        Duration::from_secs(self.cache_freshness_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
