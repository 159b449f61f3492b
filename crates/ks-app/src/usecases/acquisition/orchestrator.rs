//! Key acquisition orchestrator
//!
//! Turns a fingerprint (and optionally an auth code) into a verified key by
//! walking the peers currently on the network.
//!
//! # Architecture
//!
//! ```text
//! PeerRegistryPort::list_peers()
//!   ↓
//! KeyFetcher (advertising peers first, one at a time, lazily)
//!   ↓
//! KeyVerifier (MAC or recomputed fingerprint)
//!   ↓
//! first verified candidate  → on_success(fingerprint, key_data)
//! sequence exhausted        → on_failure()
//! ```

use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};

use ks_core::ports::PeerRegistryPort;
use ks_core::AcquiredKey;

use super::fetcher::KeyFetcher;
use super::verifier::KeyVerifier;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    /// No peer was reachable, or none delivered a key that verified.
    ///
    /// `peers_contacted` counts every fetch attempt, `candidates_checked` only
    /// the downloads that reached verification.
    #[error(
        "could not find fingerprint {fingerprint} with the available peers \
         ({peers_contacted} contacted, {candidates_checked} keys checked)"
    )]
    NoVerifiedKeyFound {
        fingerprint: String,
        peers_contacted: usize,
        candidates_checked: usize,
    },
}

pub struct AcquisitionOrchestrator {
    registry: Arc<dyn PeerRegistryPort>,
    fetcher: KeyFetcher,
    verifier: KeyVerifier,
}

impl AcquisitionOrchestrator {
    pub fn new(
        registry: Arc<dyn PeerRegistryPort>,
        fetcher: KeyFetcher,
        verifier: KeyVerifier,
    ) -> Self {
        Self {
            registry,
            fetcher,
            verifier,
        }
    }

    /// Starts an acquisition in the background.
    ///
    /// Exactly one of the callbacks runs, once, on the background task.
    /// Callers that own UI state should only forward the result to their own
    /// event loop from inside the callbacks.
    pub fn acquire<S, F>(
        self: &Arc<Self>,
        fingerprint: String,
        auth_code: Option<String>,
        on_success: S,
        on_failure: F,
    ) -> JoinHandle<()>
    where
        S: FnOnce(String, Vec<u8>) + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            match this.acquire_key(&fingerprint, auth_code.as_deref()).await {
                Ok(acquired) => {
                    debug!(fingerprint = %acquired.fingerprint, "calling success callback");
                    on_success(acquired.fingerprint, acquired.key_data);
                }
                Err(err) => {
                    debug!(error = %err, "calling error callback");
                    on_failure();
                }
            }
        })
    }

    /// Awaitable form of [`acquire`](Self::acquire).
    ///
    /// Every call reads the registry afresh; nothing is cached between calls.
    pub async fn acquire_key(
        &self,
        fingerprint: &str,
        auth_code: Option<&str>,
    ) -> Result<AcquiredKey, AcquisitionError> {
        let span = info_span!("usecase.acquisition.acquire_key", fingerprint = %fingerprint);
        async {
            info!(mac = ?auth_code, "obtaining key");

            let peers = match self.registry.list_peers().await {
                Ok(peers) => peers,
                Err(err) => {
                    warn!(error = %err, "reading the peer registry failed, assuming no peers");
                    Vec::new()
                }
            };
            debug!(count = peers.len(), "peers found on the network");

            let peers_contacted = peers.len();
            let mut candidates = self.fetcher.fetch_candidates(fingerprint, peers);
            let mut candidates_checked = 0usize;
            while let Some((peer, key_data)) = candidates.next().await {
                candidates_checked += 1;
                let verification = self.verifier.verify(&key_data, fingerprint, auth_code);
                if verification.is_valid {
                    info!(peer = %peer, method = ?verification.method, "verified key obtained");
                    return Ok(AcquiredKey {
                        fingerprint: fingerprint.to_string(),
                        peer,
                        key_data,
                        verification,
                    });
                }
                warn!(peer = %peer, "downloaded key failed verification");
            }

            error!(
                peers_contacted,
                candidates_checked, "could not find fingerprint with the available peers"
            );
            Err(AcquisitionError::NoVerifiedKeyFound {
                fingerprint: fingerprint.to_string(),
                peers_contacted,
                candidates_checked,
            })
        }
        .instrument(span)
        .await
    }
}
