pub mod config;
pub mod tracing;
pub mod wiring;

use std::path::Path;

pub use config::{default_settings_path, load_settings};
pub use wiring::{build_wizard, HostCollaborators, KeysignRuntime, WiringError, WiringResult};

/// Loads settings from `settings_path`, assembles the wizard and starts its
/// controller loop.
pub async fn start(
    settings_path: &Path,
    collaborators: HostCollaborators,
) -> anyhow::Result<KeysignRuntime> {
    let settings = load_settings(settings_path).await?;
    let mut runtime = build_wizard(&settings, collaborators)?;
    runtime.start();
    Ok(runtime)
}
