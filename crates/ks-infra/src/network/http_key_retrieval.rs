//! Key download over plain HTTP from a peer's key server.

use std::net::Ipv6Addr;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use ks_core::ports::{KeyRetrievalError, KeyRetrievalPort};
use ks_core::PeerCandidate;

pub struct HttpKeyRetrieval {
    client: reqwest::Client,
}

impl HttpKeyRetrieval {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("keysign/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client failed")?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// URL of the key a peer serves, e.g. `http://[fe80::1]:9001/`.
    pub fn key_url(peer: &PeerCandidate) -> String {
        if peer.address.parse::<Ipv6Addr>().is_ok() {
            format!("http://[{}]:{}/", peer.address, peer.port)
        } else {
            format!("http://{}:{}/", peer.address, peer.port)
        }
    }
}

#[async_trait]
impl KeyRetrievalPort for HttpKeyRetrieval {
    async fn fetch_key(
        &self,
        peer: &PeerCandidate,
        timeout: Duration,
    ) -> Result<Vec<u8>, KeyRetrievalError> {
        let url = Self::key_url(peer);
        debug!(%url, "starting HTTP request");

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyRetrievalError::ConnectionFailure(format!(
                "{url} answered with status {status}"
            )));
        }

        let body = response.bytes().await.map_err(classify)?;
        debug!(%url, bytes = body.len(), "HTTP request finished");
        Ok(body.to_vec())
    }
}

fn classify(err: reqwest::Error) -> KeyRetrievalError {
    if err.is_timeout() {
        KeyRetrievalError::Timeout
    } else {
        KeyRetrievalError::ConnectionFailure(err.to_string())
    }
}
