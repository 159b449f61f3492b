pub mod defaults;
pub mod model;

pub use model::{
    AcquisitionSettings, DeliveryPolicy, NetworkSettings, Settings, WizardSettings,
    CURRENT_SCHEMA_VERSION,
};
