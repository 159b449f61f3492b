//! Downloaded key material and the outcome of checking it.

use serde::{Deserialize, Serialize};

use crate::peer::PeerCandidate;

/// Outcome of one retrieval from one peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(Vec<u8>),
    ConnectionFailure(String),
    Timeout,
}

/// One peer tried during a fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    pub peer: PeerCandidate,
    pub outcome: FetchOutcome,
}

impl FetchAttempt {
    pub fn into_key_data(self) -> Option<(PeerCandidate, Vec<u8>)> {
        match self.outcome {
            FetchOutcome::Success(key_data) => Some((self.peer, key_data)),
            FetchOutcome::ConnectionFailure(_) | FetchOutcome::Timeout => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    /// Authentication code transferred out of band with the fingerprint.
    MacCheck,
    /// Fingerprint computed from the key material itself.
    FingerprintRecompute,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub is_valid: bool,
    pub method: VerificationMethod,
    pub recomputed_fingerprint: Option<String>,
}

impl VerificationResult {
    pub fn mac(is_valid: bool) -> Self {
        Self {
            is_valid,
            method: VerificationMethod::MacCheck,
            recomputed_fingerprint: None,
        }
    }

    pub fn recomputed(is_valid: bool, recomputed_fingerprint: Option<String>) -> Self {
        Self {
            is_valid,
            method: VerificationMethod::FingerprintRecompute,
            recomputed_fingerprint,
        }
    }
}

/// A key that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredKey {
    pub fingerprint: String,
    pub peer: PeerCandidate,
    pub key_data: Vec<u8>,
    pub verification: VerificationResult,
}
