pub mod acquisition;
pub mod wizard;

pub use acquisition::{
    sort_peers, AcquisitionError, AcquisitionOrchestrator, KeyFetcher, KeyVerifier,
};
pub use wizard::{WizardClosed, WizardController, WizardHandle};
