use crate::barcode::BarcodeEvent;

use super::state::{AcquisitionTicket, DeliveryTicket};

/// Events that drive the wizard.
///
/// 驱动向导的事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// "Next" pressed. In the scan stage the typed text names the key.
    Next { typed_text: Option<String> },
    /// A code was decoded from the camera feed.
    BarcodeDecoded(BarcodeEvent),
    /// "Back" pressed.
    Back,
    /// Try downloading the same key again after a failure.
    Retry,
    /// An acquisition found a verified key.
    AcquisitionSucceeded {
        ticket: AcquisitionTicket,
        fingerprint: String,
        key_data: Vec<u8>,
    },
    /// An acquisition ran out of candidates.
    AcquisitionFailed { ticket: AcquisitionTicket },
    /// The signed key was handed over for delivery.
    DeliverySucceeded { ticket: DeliveryTicket },
    /// Signing or handing over the key failed.
    DeliveryFailed {
        ticket: DeliveryTicket,
        reason: String,
    },
}
