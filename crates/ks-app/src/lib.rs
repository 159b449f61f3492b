//! # ks-app
//!
//! Application layer for Keysign: key acquisition use cases and the wizard
//! controller that drives the sign-a-key flow.

pub mod usecases;

pub use usecases::{
    AcquisitionError, AcquisitionOrchestrator, KeyFetcher, KeyVerifier, WizardClosed,
    WizardController, WizardHandle,
};
