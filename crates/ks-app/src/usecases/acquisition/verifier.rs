use std::sync::Arc;

use tracing::{debug, info, warn};

use ks_core::ports::{KeyMaterialPort, MacPort};
use ks_core::VerificationResult;

/// Checks downloaded key material against the requested fingerprint.
///
/// Stateless apart from the ports it holds, so one verifier can serve
/// concurrent acquisitions.
#[derive(Clone)]
pub struct KeyVerifier {
    mac: Arc<dyn MacPort>,
    key_material: Arc<dyn KeyMaterialPort>,
}

impl KeyVerifier {
    pub fn new(mac: Arc<dyn MacPort>, key_material: Arc<dyn KeyMaterialPort>) -> Self {
        Self { mac, key_material }
    }

    /// With an auth code the MAC decides alone; without one the fingerprint
    /// declared by the key material must equal `fingerprint` exactly.
    pub fn verify(
        &self,
        key_data: &[u8],
        fingerprint: &str,
        auth_code: Option<&str>,
    ) -> VerificationResult {
        info!(fingerprint, mac = ?auth_code, "verifying key");

        let result = match auth_code {
            Some(tag) => self.verify_mac(key_data, fingerprint, tag),
            None => self.verify_fingerprint(key_data, fingerprint),
        };

        debug!(
            fingerprint,
            bytes = key_data.len(),
            valid = result.is_valid,
            method = ?result.method,
            "verification finished"
        );
        result
    }

    fn verify_mac(&self, key_data: &[u8], fingerprint: &str, tag: &str) -> VerificationResult {
        let is_valid = self.mac.verify(fingerprint, key_data, tag);
        if is_valid && !self.key_material.is_well_formed(key_data) {
            warn!(fingerprint, "MAC matches but the key material is not well-formed");
        }
        VerificationResult::mac(is_valid)
    }

    fn verify_fingerprint(&self, key_data: &[u8], fingerprint: &str) -> VerificationResult {
        match self.key_material.fingerprint_from_keydata(key_data) {
            Ok(imported) => {
                let is_valid = imported == fingerprint;
                if !is_valid {
                    info!(
                        imported = %imported,
                        requested = fingerprint,
                        "key does not have equal fingerprint"
                    );
                }
                VerificationResult::recomputed(is_valid, Some(imported))
            }
            Err(err) => {
                warn!(error = %err, "failed to import downloaded data");
                VerificationResult::recomputed(false, None)
            }
        }
    }
}
