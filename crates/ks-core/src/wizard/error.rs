use serde::{Deserialize, Serialize};

/// Inline errors shown by the wizard.
///
/// 向导页内显示的错误。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WizardError {
    #[error("the fingerprint typed was wrong, please re-check: {input:?}")]
    MalformedFingerprint { input: String },
    #[error("error downloading key with fpr {fingerprint}")]
    NoVerifiedKeyFound { fingerprint: String },
    #[error("signing or sending the key failed: {reason}")]
    DeliveryFailed { reason: String },
}
