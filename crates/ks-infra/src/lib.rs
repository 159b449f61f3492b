//! # ks-infra
//!
//! Concrete adapters for the ports declared in `ks-core`.

pub mod barcode;
pub mod network;
pub mod security;
pub mod settings;

pub use barcode::BarcodeEventHub;
pub use network::{HttpKeyRetrieval, InMemoryPeerRegistry};
pub use security::HmacSha256Mac;
pub use settings::FileSettingsRepository;
