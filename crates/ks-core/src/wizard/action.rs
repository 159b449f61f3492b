use super::state::{AcquisitionTicket, DeliveryTicket};

/// Side-effects produced by wizard transitions.
///
/// 向导状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Download and verify the key named by the ticket.
    AcquireKey {
        ticket: AcquisitionTicket,
        auth_code: Option<String>,
    },
    /// Sign the verified key and hand it over for delivery.
    ///
    /// The key belongs to `ticket.fingerprint`; the result is reported back
    /// with the same ticket.
    SignAndSend {
        ticket: DeliveryTicket,
        key_data: Vec<u8>,
    },
}
