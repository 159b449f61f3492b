//! Candidate key download from peers on the local network.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, info, warn};

use ks_core::ports::{KeyRetrievalError, KeyRetrievalPort};
use ks_core::{FetchAttempt, FetchOutcome, PeerCandidate};

/// Orders peers so that those advertising `fingerprint` come first.
///
/// The sort is stable; relative order inside both groups is kept.
pub fn sort_peers(mut peers: Vec<PeerCandidate>, fingerprint: &str) -> Vec<PeerCandidate> {
    peers.sort_by_key(|peer| !peer.advertises(fingerprint));
    peers
}

/// Downloads key material from peers one at a time.
#[derive(Clone)]
pub struct KeyFetcher {
    retrieval: Arc<dyn KeyRetrievalPort>,
    timeout: Duration,
}

impl KeyFetcher {
    pub fn new(retrieval: Arc<dyn KeyRetrievalPort>, timeout: Duration) -> Self {
        Self { retrieval, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Every peer tried, in order, with its outcome.
    ///
    /// Lazy: a peer is only contacted when the stream is polled for it.
    pub fn attempts(
        &self,
        fingerprint: &str,
        peers: Vec<PeerCandidate>,
    ) -> BoxStream<'static, FetchAttempt> {
        let ordered = sort_peers(peers, fingerprint);
        info!(
            fingerprint,
            peers = ?ordered.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "fetch order"
        );

        let fetcher = self.clone();
        stream::iter(ordered)
            .then(move |peer| {
                let fetcher = fetcher.clone();
                async move { fetcher.attempt(peer).await }
            })
            .boxed()
    }

    /// Key material downloaded from each reachable peer, in order.
    ///
    /// Peers that fail or time out are logged and skipped. An empty stream
    /// means no peer could be reached.
    pub fn fetch_candidates(
        &self,
        fingerprint: &str,
        peers: Vec<PeerCandidate>,
    ) -> BoxStream<'static, (PeerCandidate, Vec<u8>)> {
        self.attempts(fingerprint, peers)
            .filter_map(|attempt| futures::future::ready(attempt.into_key_data()))
            .boxed()
    }

    async fn attempt(&self, peer: PeerCandidate) -> FetchAttempt {
        debug!(peer = %peer, "getting key from peer");
        let result =
            match tokio::time::timeout(self.timeout, self.retrieval.fetch_key(&peer, self.timeout))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(KeyRetrievalError::Timeout),
            };

        let outcome = match result {
            Ok(key_data) => {
                debug!(peer = %peer, bytes = key_data.len(), "finished downloading");
                FetchOutcome::Success(key_data)
            }
            Err(KeyRetrievalError::Timeout) => {
                warn!(peer = %peer, timeout = ?self.timeout, "peer timed out");
                FetchOutcome::Timeout
            }
            Err(KeyRetrievalError::ConnectionFailure(reason)) => {
                warn!(peer = %peer, %reason, "while downloading key");
                FetchOutcome::ConnectionFailure(reason)
            }
        };

        FetchAttempt { peer, outcome }
    }
}
