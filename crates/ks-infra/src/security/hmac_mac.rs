use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};

use ks_core::ports::MacPort;

type HmacSha256 = Hmac<Sha256>;

/// Authentication codes for transferred keys.
///
/// The fingerprint is the HMAC key and the key material the message; tags
/// are rendered as uppercase hex.
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacSha256Mac;

impl HmacSha256Mac {
    pub fn new() -> Self {
        Self
    }

    /// Tag the offering side puts into the barcode.
    pub fn generate(&self, fingerprint: &str, data: &[u8]) -> anyhow::Result<String> {
        let mac = Self::mac(fingerprint, data)?;
        Ok(hex::encode_upper(mac.finalize().into_bytes()))
    }

    fn mac(fingerprint: &str, data: &[u8]) -> anyhow::Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(fingerprint.as_bytes())?;
        mac.update(data);
        Ok(mac)
    }
}

impl MacPort for HmacSha256Mac {
    fn verify(&self, fingerprint: &str, data: &[u8], tag: &str) -> bool {
        let Ok(expected) = hex::decode(tag.trim()) else {
            debug!(fingerprint, "authentication code is not hex");
            return false;
        };
        match Self::mac(fingerprint, data) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(err) => {
                warn!(error = %err, "cannot key HMAC with fingerprint");
                false
            }
        }
    }
}
