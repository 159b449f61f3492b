use serde::{Deserialize, Serialize};

use super::error::WizardError;

const SCAN_LABEL: &str =
    "Step 1: Scan QR Code or type fingerprint and click on 'Download' button";
const CONFIRM_LABEL: &str =
    "Step 2: Compare the received fpr with the owner's fpr and click 'Sign'";
const COMPLETE_LABEL: &str =
    "Step 3: Key was succesfully signed and an email was sent to the owner.";

/// Wizard stage.
///
/// 向导阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStage {
    /// Scan a barcode or type a fingerprint.
    ///
    /// 扫描二维码或输入指纹。
    Scan,
    /// Compare the downloaded key and sign it.
    ///
    /// 核对下载的密钥并签名。
    Confirm,
    /// Signature produced and handed over.
    ///
    /// 签名完成。
    Complete,
}

impl WizardStage {
    pub const COUNT: usize = 3;

    /// 1-based position of the stage.
    pub fn index(self) -> usize {
        match self {
            WizardStage::Scan => 1,
            WizardStage::Confirm => 2,
            WizardStage::Complete => 3,
        }
    }

    pub fn progress(self) -> Progress {
        let label = match self {
            WizardStage::Scan => SCAN_LABEL,
            WizardStage::Confirm => CONFIRM_LABEL,
            WizardStage::Complete => COMPLETE_LABEL,
        };
        Progress {
            label,
            fraction: self.index() as f64 / Self::COUNT as f64,
        }
    }

    pub fn controls(self) -> Controls {
        match self {
            WizardStage::Scan => Controls {
                next_enabled: true,
                back_enabled: false,
            },
            WizardStage::Confirm => Controls {
                next_enabled: true,
                back_enabled: true,
            },
            WizardStage::Complete => Controls {
                next_enabled: false,
                back_enabled: false,
            },
        }
    }
}

/// Progress indication for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub label: &'static str,
    pub fraction: f64,
}

/// Which navigation buttons are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub next_enabled: bool,
    pub back_enabled: bool,
}

/// Stamp given to every acquisition the wizard starts.
///
/// Results carrying a ticket other than the pending one are stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcquisitionTicket {
    pub generation: u64,
    pub fingerprint: String,
}

/// Stamp given to every sign-and-send the wizard starts.
///
/// Shares the generation counter with [`AcquisitionTicket`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryTicket {
    pub generation: u64,
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AcquisitionStatus {
    Idle,
    Pending { ticket: AcquisitionTicket },
    Verified,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    NotStarted,
    InProgress { ticket: DeliveryTicket },
    Sent,
    Failed { reason: String },
}

/// State owned by the wizard.
///
/// `verified_key` is only ever set in the confirm and complete stages, after
/// a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSession {
    pub stage: WizardStage,
    pub requested_fingerprint: Option<String>,
    pub auth_code: Option<String>,
    pub verified_key: Option<Vec<u8>>,
    pub captured_image: Option<Vec<u8>>,
    pub acquisition: AcquisitionStatus,
    pub delivery: DeliveryStatus,
    pub error: Option<WizardError>,
    pub(crate) generation: u64,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self::with_generation(0)
    }

    fn with_generation(generation: u64) -> Self {
        Self {
            stage: WizardStage::Scan,
            requested_fingerprint: None,
            auth_code: None,
            verified_key: None,
            captured_image: None,
            acquisition: AcquisitionStatus::Idle,
            delivery: DeliveryStatus::NotStarted,
            error: None,
            generation,
        }
    }

    /// Fresh session for re-entering the wizard from the start.
    ///
    /// The generation counter survives so tickets handed out before the
    /// restart can never match again.
    pub fn restart(&self) -> Self {
        Self::with_generation(self.generation)
    }

    /// Number of acquisitions and deliveries started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn issue_ticket(&mut self, fingerprint: &str) -> AcquisitionTicket {
        self.generation += 1;
        AcquisitionTicket {
            generation: self.generation,
            fingerprint: fingerprint.to_string(),
        }
    }

    pub(crate) fn issue_delivery_ticket(&mut self, fingerprint: &str) -> DeliveryTicket {
        self.generation += 1;
        DeliveryTicket {
            generation: self.generation,
            fingerprint: fingerprint.to_string(),
        }
    }

    pub fn is_delivering(&self) -> bool {
        matches!(self.delivery, DeliveryStatus::InProgress { .. })
    }

    /// Whether a delivery result stamped with `ticket` belongs to the
    /// delivery in progress.
    pub fn is_current_delivery(&self, ticket: &DeliveryTicket) -> bool {
        match &self.delivery {
            DeliveryStatus::InProgress { ticket: pending } => {
                pending == ticket
                    && self.requested_fingerprint.as_deref() == Some(ticket.fingerprint.as_str())
            }
            _ => false,
        }
    }

    /// Whether a result stamped with `ticket` belongs to the pending acquisition.
    pub fn is_current(&self, ticket: &AcquisitionTicket) -> bool {
        let pending = match &self.acquisition {
            AcquisitionStatus::Pending { ticket } => ticket,
            _ => return false,
        };
        self.stage == WizardStage::Confirm
            && pending == ticket
            && self.requested_fingerprint.as_deref() == Some(ticket.fingerprint.as_str())
    }

    pub fn progress(&self) -> Progress {
        self.stage.progress()
    }

    pub fn controls(&self) -> Controls {
        self.stage.controls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_follows_stage_index() {
        assert_eq!(WizardStage::Scan.progress().fraction, 1.0 / 3.0);
        assert_eq!(WizardStage::Confirm.progress().fraction, 2.0 / 3.0);
        assert_eq!(WizardStage::Complete.progress().fraction, 1.0);
        assert!(WizardStage::Confirm.progress().label.starts_with("Step 2"));
    }

    #[test]
    fn controls_disable_back_on_scan_and_everything_on_complete() {
        assert_eq!(
            WizardStage::Scan.controls(),
            Controls {
                next_enabled: true,
                back_enabled: false
            }
        );
        assert_eq!(
            WizardStage::Complete.controls(),
            Controls {
                next_enabled: false,
                back_enabled: false
            }
        );
    }

    #[test]
    fn restart_keeps_generation() {
        let mut session = WizardSession::new();
        session.issue_ticket("ABCD");
        session.issue_ticket("ABCD");
        session.stage = WizardStage::Confirm;

        let restarted = session.restart();
        assert_eq!(restarted.stage, WizardStage::Scan);
        assert_eq!(restarted.generation(), 2);
    }

    #[test]
    fn is_current_requires_pending_ticket_and_matching_fingerprint() {
        let mut session = WizardSession::new();
        let ticket = session.issue_ticket("ABCD");
        session.stage = WizardStage::Confirm;
        session.requested_fingerprint = Some("ABCD".into());
        session.acquisition = AcquisitionStatus::Pending {
            ticket: ticket.clone(),
        };
        assert!(session.is_current(&ticket));

        let other = AcquisitionTicket {
            generation: ticket.generation,
            fingerprint: "EF01".into(),
        };
        assert!(!session.is_current(&other));

        session.requested_fingerprint = Some("EF01".into());
        assert!(!session.is_current(&ticket));
    }

    #[test]
    fn delivery_tickets_share_the_generation_counter() {
        let mut session = WizardSession::new();
        let acquisition = session.issue_ticket("ABCD");
        let delivery = session.issue_delivery_ticket("ABCD");
        assert_eq!(delivery.generation, acquisition.generation + 1);

        session.requested_fingerprint = Some("ABCD".into());
        session.delivery = DeliveryStatus::InProgress {
            ticket: delivery.clone(),
        };
        assert!(session.is_delivering());
        assert!(session.is_current_delivery(&delivery));

        let older = DeliveryTicket {
            generation: acquisition.generation,
            fingerprint: "ABCD".into(),
        };
        assert!(!session.is_current_delivery(&older));
    }
}
