use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::peer::PeerCandidate;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionSettings {
    /// Upper bound for one key download from one peer.
    pub fetch_timeout_secs: u64,
}

impl AcquisitionSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

/// What happens when signing or sending the key fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Reach the complete page regardless; failures are only logged.
    #[default]
    BestEffort,
    /// Stay on the confirm page until delivery succeeded.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardSettings {
    pub delivery_policy: DeliveryPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NetworkSettings {
    /// Peers known without discovery, e.g. on networks that block mDNS.
    #[serde(default)]
    pub static_peers: Vec<PeerCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub acquisition: AcquisitionSettings,

    #[serde(default)]
    pub wizard: WizardSettings,

    #[serde(default)]
    pub network: NetworkSettings,
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}
