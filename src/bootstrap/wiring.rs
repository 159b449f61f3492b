//! # Dependency Injection
//!
//! Creates the infra adapters, injects them together with the host's
//! collaborators into the use cases, and hands back a runtime that owns the
//! wizard controller.
//!
//! This is the only place that depends on `ks-infra` and `ks-app` at the
//! same time. It assembles; it does not decide.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use ks_app::{AcquisitionOrchestrator, KeyFetcher, KeyVerifier, WizardController, WizardHandle};
use ks_core::ports::{
    BarcodeSourcePort, KeyMaterialPort, KeySigningPort, ListenerId, WizardEventPort,
};
use ks_core::{Settings, WizardStateMachine};
use ks_infra::{BarcodeEventHub, HmacSha256Mac, HttpKeyRetrieval, InMemoryPeerRegistry};

pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection.
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(String),
}

/// Collaborators the host application provides: the OpenPGP toolkit, the
/// signer/mailer and the presentation layer.
pub struct HostCollaborators {
    pub key_material: Arc<dyn KeyMaterialPort>,
    pub signer: Arc<dyn KeySigningPort>,
    pub event_port: Arc<dyn WizardEventPort>,
}

/// An assembled wizard.
///
/// Feed discovered peers into `registry` and decoded codes into
/// `barcode_hub`; drive the wizard through `handle`.
pub struct KeysignRuntime {
    pub handle: WizardHandle,
    pub registry: Arc<InMemoryPeerRegistry>,
    pub barcode_hub: Arc<BarcodeEventHub>,
    listener_id: ListenerId,
    controller: Option<WizardController>,
    task: Option<JoinHandle<()>>,
}

impl KeysignRuntime {
    /// Spawns the controller loop. Must be called inside a tokio runtime.
    ///
    /// Returns `false` if it was already started.
    pub fn start(&mut self) -> bool {
        let Some(controller) = self.controller.take() else {
            return false;
        };
        self.task = Some(tokio::spawn(controller.run()));
        info!("keysign wizard started");
        true
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops listening for barcodes, stops the controller and waits for it
    /// to release its temporary resources.
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        self.barcode_hub.unregister_listener(self.listener_id);
        if self.handle.shutdown().is_err() {
            warn!("wizard controller already stopped");
        }
        if let Some(task) = self.task.take() {
            task.await?;
        }
        info!("keysign wizard stopped");
        Ok(())
    }
}

/// Builds the wizard from settings and host collaborators.
///
/// The registry is seeded with `network.static_peers`; the controller is not
/// running until [`KeysignRuntime::start`] is called.
pub fn build_wizard(
    settings: &Settings,
    collaborators: HostCollaborators,
) -> WiringResult<KeysignRuntime> {
    let registry = Arc::new(InMemoryPeerRegistry::with_peers(
        settings.network.static_peers.clone(),
    ));
    let retrieval =
        HttpKeyRetrieval::new().map_err(|e| WiringError::HttpClientInit(e.to_string()))?;

    let fetcher = KeyFetcher::new(Arc::new(retrieval), settings.acquisition.fetch_timeout());
    let verifier = KeyVerifier::new(Arc::new(HmacSha256Mac::new()), collaborators.key_material);
    let acquisition = Arc::new(AcquisitionOrchestrator::new(
        registry.clone(),
        fetcher,
        verifier,
    ));

    let controller = WizardController::new(
        WizardStateMachine::new(settings.wizard.delivery_policy),
        acquisition,
        collaborators.signer,
        collaborators.event_port,
    );
    let handle = controller.handle();

    let barcode_hub = Arc::new(BarcodeEventHub::new());
    let listener_id = barcode_hub.register_listener(handle.barcode_listener());

    info!(
        static_peers = settings.network.static_peers.len(),
        fetch_timeout = ?settings.acquisition.fetch_timeout(),
        delivery_policy = ?settings.wizard.delivery_policy,
        "keysign wizard assembled"
    );

    Ok(KeysignRuntime {
        handle,
        registry,
        barcode_hub,
        listener_id,
        controller: Some(controller),
        task: None,
    })
}
