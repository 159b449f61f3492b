//! Wizard state machine.
//!
//! Defines a pure state transition function for the sign-a-key flow.
//!
//! ```text
//!   Scan ──next/barcode──▶ Confirm ──next (verified key)──▶ Complete
//!    ▲                        │
//!    └─────────back───────────┘
//! ```
//!
//! Acquisition and delivery results arrive as events as well; the machine
//! drops results that do not belong to the pending acquisition or delivery.

use tracing::{debug, warn};

use crate::fingerprint::{normalize_typed, parse_barcode};
use crate::settings::model::DeliveryPolicy;

use super::action::WizardAction;
use super::error::WizardError;
use super::event::WizardEvent;
use super::state::{AcquisitionStatus, DeliveryStatus, WizardSession, WizardStage};

/// Pure wizard state machine.
///
/// 纯状态机：不包含副作用。
#[derive(Debug, Clone, Copy, Default)]
pub struct WizardStateMachine {
    delivery_policy: DeliveryPolicy,
}

impl WizardStateMachine {
    pub fn new(delivery_policy: DeliveryPolicy) -> Self {
        Self { delivery_policy }
    }

    pub fn delivery_policy(&self) -> DeliveryPolicy {
        self.delivery_policy
    }

    pub fn transition(
        &self,
        session: WizardSession,
        event: WizardEvent,
    ) -> (WizardSession, Vec<WizardAction>) {
        match (session.stage, event) {
            (WizardStage::Scan, WizardEvent::Next { typed_text }) => {
                let raw_text = typed_text.unwrap_or_default();
                match normalize_typed(&raw_text) {
                    Ok(fingerprint) => Self::start_acquisition(session, fingerprint, None, None),
                    Err(err) => {
                        warn!(error = %err, "typed fingerprint rejected");
                        (
                            WizardSession {
                                error: Some(WizardError::MalformedFingerprint { input: raw_text }),
                                ..session
                            },
                            Vec::new(),
                        )
                    }
                }
            }
            (WizardStage::Scan, WizardEvent::BarcodeDecoded(barcode)) => {
                match parse_barcode(&barcode.text) {
                    Ok(parsed) => {
                        let auth_code = parsed.mac().map(str::to_string);
                        Self::start_acquisition(
                            session,
                            parsed.fingerprint,
                            auth_code,
                            barcode.aux_frame,
                        )
                    }
                    Err(err) => {
                        warn!(error = %err, "barcode without fingerprint ignored");
                        (session, Vec::new())
                    }
                }
            }
            (WizardStage::Confirm, WizardEvent::Back) => (session.restart(), Vec::new()),
            (WizardStage::Confirm, WizardEvent::Retry)
                if session.acquisition == AcquisitionStatus::Failed =>
            {
                let Some(fingerprint) = session.requested_fingerprint.clone() else {
                    return (session, Vec::new());
                };
                let mut next = WizardSession {
                    error: None,
                    ..session
                };
                let ticket = next.issue_ticket(&fingerprint);
                next.acquisition = AcquisitionStatus::Pending {
                    ticket: ticket.clone(),
                };
                let auth_code = next.auth_code.clone();
                (next, vec![WizardAction::AcquireKey { ticket, auth_code }])
            }
            (
                WizardStage::Confirm,
                WizardEvent::AcquisitionSucceeded {
                    ticket,
                    fingerprint,
                    key_data,
                },
            ) if session.is_current(&ticket) && ticket.fingerprint == fingerprint => (
                WizardSession {
                    verified_key: Some(key_data),
                    acquisition: AcquisitionStatus::Verified,
                    error: None,
                    ..session
                },
                Vec::new(),
            ),
            (WizardStage::Confirm, WizardEvent::AcquisitionFailed { ticket })
                if session.is_current(&ticket) =>
            {
                (
                    WizardSession {
                        acquisition: AcquisitionStatus::Failed,
                        error: Some(WizardError::NoVerifiedKeyFound {
                            fingerprint: ticket.fingerprint,
                        }),
                        ..session
                    },
                    Vec::new(),
                )
            }
            (WizardStage::Confirm, WizardEvent::Next { .. }) => self.confirm(session),
            (WizardStage::Confirm, WizardEvent::DeliverySucceeded { ticket })
                if self.delivery_policy == DeliveryPolicy::Strict
                    && session.is_current_delivery(&ticket) =>
            {
                (
                    WizardSession {
                        stage: WizardStage::Complete,
                        delivery: DeliveryStatus::Sent,
                        ..session
                    },
                    Vec::new(),
                )
            }
            (WizardStage::Confirm, WizardEvent::DeliveryFailed { ticket, reason })
                if self.delivery_policy == DeliveryPolicy::Strict
                    && session.is_current_delivery(&ticket) =>
            {
                (
                    WizardSession {
                        delivery: DeliveryStatus::Failed {
                            reason: reason.clone(),
                        },
                        error: Some(WizardError::DeliveryFailed { reason }),
                        ..session
                    },
                    Vec::new(),
                )
            }
            (WizardStage::Complete, WizardEvent::DeliverySucceeded { ticket })
                if session.is_current_delivery(&ticket) =>
            {
                (
                    WizardSession {
                        delivery: DeliveryStatus::Sent,
                        ..session
                    },
                    Vec::new(),
                )
            }
            (WizardStage::Complete, WizardEvent::DeliveryFailed { ticket, reason })
                if session.is_current_delivery(&ticket) =>
            {
                warn!(%reason, "delivery failed, staying on the complete page");
                (
                    WizardSession {
                        delivery: DeliveryStatus::Failed { reason },
                        ..session
                    },
                    Vec::new(),
                )
            }
            (stage, event) => {
                debug!(?stage, ?event, "wizard event ignored");
                (session, Vec::new())
            }
        }
    }

    fn start_acquisition(
        session: WizardSession,
        fingerprint: String,
        auth_code: Option<String>,
        captured_image: Option<Vec<u8>>,
    ) -> (WizardSession, Vec<WizardAction>) {
        let mut next = session.restart();
        let ticket = next.issue_ticket(&fingerprint);
        next.stage = WizardStage::Confirm;
        next.requested_fingerprint = Some(fingerprint);
        next.auth_code = auth_code.clone();
        next.captured_image = captured_image;
        next.acquisition = AcquisitionStatus::Pending {
            ticket: ticket.clone(),
        };
        (next, vec![WizardAction::AcquireKey { ticket, auth_code }])
    }

    fn confirm(&self, session: WizardSession) -> (WizardSession, Vec<WizardAction>) {
        if session.is_delivering() {
            return (session, Vec::new());
        }
        let (Some(fingerprint), Some(key_data)) = (
            session.requested_fingerprint.clone(),
            session.verified_key.clone(),
        ) else {
            debug!("next pressed before a verified key arrived");
            return (session, Vec::new());
        };

        let mut next = session;
        let ticket = next.issue_delivery_ticket(&fingerprint);
        next.stage = match self.delivery_policy {
            DeliveryPolicy::BestEffort => WizardStage::Complete,
            DeliveryPolicy::Strict => WizardStage::Confirm,
        };
        next.delivery = DeliveryStatus::InProgress {
            ticket: ticket.clone(),
        };
        next.error = None;
        (next, vec![WizardAction::SignAndSend { ticket, key_data }])
    }
}
