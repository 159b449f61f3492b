//! Settings location and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use ks_core::ports::SettingsPort;
use ks_core::Settings;
use ks_infra::FileSettingsRepository;

const APP_DIR: &str = "keysign";
const SETTINGS_FILE: &str = "settings.json";

/// `<config dir>/keysign/settings.json`, e.g. `~/.config/keysign/settings.json`.
pub fn default_settings_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("no config directory for this platform")?;
    Ok(config_dir.join(APP_DIR).join(SETTINGS_FILE))
}

/// Loads settings from `path`; a missing file yields defaults.
pub async fn load_settings(path: &Path) -> Result<Settings> {
    let settings = FileSettingsRepository::new(path)
        .load()
        .await
        .with_context(|| format!("load settings failed: {}", path.display()))?;
    info!(
        path = %path.display(),
        fetch_timeout_secs = settings.acquisition.fetch_timeout_secs,
        delivery_policy = ?settings.wizard.delivery_policy,
        static_peers = settings.network.static_peers.len(),
        "settings loaded"
    );
    Ok(settings)
}
