//! Port interfaces for the application layer
//!
//! Ports define the contract between the key acquisition use cases and the
//! collaborators around them: discovery, the HTTP client, the OpenPGP
//! toolkit, the camera pipeline, the signer and the presentation layer.
//! The core stays independent of all of them.

pub mod barcode;
pub mod key_material;
pub mod key_retrieval;
pub mod mac;
pub mod peer_registry;
pub mod settings;
pub mod signing;
mod wizard_event_port;

pub use barcode::{BarcodeListener, BarcodeSourcePort, ListenerId};
pub use key_material::{KeyMaterialError, KeyMaterialPort};
pub use key_retrieval::{KeyRetrievalError, KeyRetrievalPort};
pub use mac::MacPort;
pub use peer_registry::PeerRegistryPort;
pub use settings::SettingsPort;
pub use signing::{DeliveryError, KeySigningPort, TempResourceHandle};
pub use wizard_event_port::WizardEventPort;
