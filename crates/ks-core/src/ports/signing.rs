use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// A temporary artefact produced while signing, e.g. the signed key
/// attached to a draft mail. Kept alive until the wizard restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempResourceHandle {
    pub path: PathBuf,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("signing failed: {0}")]
    Signing(String),

    #[error("sending failed: {0}")]
    Sending(String),
}

/// Signs a verified key and hands the signature over for delivery.
#[async_trait]
pub trait KeySigningPort: Send + Sync {
    async fn sign_and_send(
        &self,
        fingerprint: &str,
        key_data: &[u8],
    ) -> Result<Vec<TempResourceHandle>, DeliveryError>;
}
