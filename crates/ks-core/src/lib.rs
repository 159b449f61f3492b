//! # ks-core
//!
//! Core domain models and business logic for Keysign.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod barcode;
pub mod fingerprint;
pub mod key;
pub mod peer;
pub mod ports;
pub mod settings;
pub mod wizard;

// Re-export commonly used types at the crate root
pub use barcode::BarcodeEvent;
pub use fingerprint::{normalize_typed, parse_barcode, FingerprintError, ParsedBarcode};
pub use key::{AcquiredKey, FetchAttempt, FetchOutcome, VerificationMethod, VerificationResult};
pub use peer::PeerCandidate;
pub use settings::Settings;
pub use wizard::{WizardAction, WizardEvent, WizardSession, WizardStage, WizardStateMachine};
