/// Authentication code check for a downloaded key.
pub trait MacPort: Send + Sync {
    /// Whether `tag` authenticates `data` for `fingerprint`.
    fn verify(&self, fingerprint: &str, data: &[u8], tag: &str) -> bool;
}
