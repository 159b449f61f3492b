//! # keysign
//!
//! Obtains the OpenPGP key a peer on the local network offers, verifies it
//! against a scanned or typed fingerprint, and walks the user through
//! signing it.
//!
//! The workspace is split the hexagonal way:
//!
//! - `ks-core`: domain types, the wizard state machine, port traits
//! - `ks-app`: key fetcher, verifier, acquisition orchestrator, wizard controller
//! - `ks-infra`: HTTP retrieval, HMAC, peer registry, barcode hub, settings file
//! - this crate: tracing setup and wiring

pub mod bootstrap;

pub use bootstrap::{build_wizard, HostCollaborators, KeysignRuntime};

pub use {ks_app, ks_core, ks_infra};
