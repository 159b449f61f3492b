//! Key acquisition: fetch candidates from peers, verify them, report the
//! first one that checks out.

pub mod fetcher;
pub mod orchestrator;
pub mod verifier;

pub use fetcher::{sort_peers, KeyFetcher};
pub use orchestrator::{AcquisitionError, AcquisitionOrchestrator};
pub use verifier::KeyVerifier;
