//! Peers offering their key on the local network.

use serde::{Deserialize, Serialize};

/// A participant advertised by the discovery service.
///
/// Snapshot taken when an acquisition starts; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerCandidate {
    pub name: String,
    pub address: String,
    pub port: u16,
    pub advertised_fingerprint: String,
}

impl PeerCandidate {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        port: u16,
        advertised_fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            port,
            advertised_fingerprint: advertised_fingerprint.into(),
        }
    }

    /// Whether the peer claims to offer the given fingerprint.
    ///
    /// This is only a hint for ordering; the downloaded key is verified anyway.
    pub fn advertises(&self, fingerprint: &str) -> bool {
        self.advertised_fingerprint == fingerprint
    }
}

impl std::fmt::Display for PeerCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.address, self.port)
    }
}
