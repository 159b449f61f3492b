use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::peer::PeerCandidate;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyRetrievalError {
    #[error("connection to peer failed: {0}")]
    ConnectionFailure(String),

    #[error("peer did not answer in time")]
    Timeout,
}

/// Downloads the key a peer offers.
#[async_trait]
pub trait KeyRetrievalPort: Send + Sync {
    async fn fetch_key(
        &self,
        peer: &PeerCandidate,
        timeout: Duration,
    ) -> Result<Vec<u8>, KeyRetrievalError>;
}
