mod controller;
mod handle;

pub use controller::WizardController;
pub use handle::{WizardClosed, WizardHandle};

