//! Sign-a-key wizard domain module.
//!
//! This module defines the wizard session and its pure state machine.

pub mod action;
pub mod error;
pub mod event;
pub mod state;
pub mod state_machine;

pub use action::WizardAction;
pub use error::WizardError;
pub use event::WizardEvent;
pub use state::{
    AcquisitionStatus, AcquisitionTicket, Controls, DeliveryStatus, DeliveryTicket, Progress,
    WizardSession, WizardStage,
};
pub use state_machine::WizardStateMachine;
