use anyhow::Result;
use async_trait::async_trait;

use crate::peer::PeerCandidate;

/// Read access to the peers currently advertised on the local network.
#[async_trait]
pub trait PeerRegistryPort: Send + Sync {
    /// Snapshot of the peers known right now.
    async fn list_peers(&self) -> Result<Vec<PeerCandidate>>;
}
