use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyMaterialError {
    #[error("unparseable key material: {0}")]
    Unparseable(String),
}

/// OpenPGP toolkit access needed to check downloaded keys.
pub trait KeyMaterialPort: Send + Sync {
    /// Fingerprint the key material declares for itself.
    fn fingerprint_from_keydata(&self, key_data: &[u8]) -> Result<String, KeyMaterialError>;

    /// Whether the bytes can be imported as a public key at all.
    fn is_well_formed(&self, key_data: &[u8]) -> bool;
}
