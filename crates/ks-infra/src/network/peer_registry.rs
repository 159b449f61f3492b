use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use ks_core::ports::PeerRegistryPort;
use ks_core::PeerCandidate;

/// Peers fed in by a discovery service (or static configuration), keyed by
/// service name and kept in the order they first appeared.
pub struct InMemoryPeerRegistry {
    peers: RwLock<Vec<PeerCandidate>>,
}

impl InMemoryPeerRegistry {
    pub fn new() -> Self {
        Self::with_peers(Vec::new())
    }

    pub fn with_peers(peers: Vec<PeerCandidate>) -> Self {
        Self {
            peers: RwLock::new(peers),
        }
    }

    /// Adds a peer, or replaces the one with the same name in place.
    pub async fn upsert(&self, peer: PeerCandidate) {
        let mut peers = self.peers.write().await;
        match peers.iter_mut().find(|known| known.name == peer.name) {
            Some(known) => {
                debug!(peer = %peer, "peer updated");
                *known = peer;
            }
            None => {
                debug!(peer = %peer, "peer added");
                peers.push(peer);
            }
        }
    }

    /// Returns `false` if no peer had that name.
    pub async fn remove(&self, name: &str) -> bool {
        let mut peers = self.peers.write().await;
        let before = peers.len();
        peers.retain(|peer| peer.name != name);
        let removed = peers.len() != before;
        if removed {
            debug!(name, "peer removed");
        }
        removed
    }
}

impl Default for InMemoryPeerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PeerRegistryPort for InMemoryPeerRegistry {
    async fn list_peers(&self) -> anyhow::Result<Vec<PeerCandidate>> {
        Ok(self.peers.read().await.clone())
    }
}
