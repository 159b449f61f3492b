use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use ks_core::ports::BarcodeListener;
use ks_core::{BarcodeEvent, WizardEvent, WizardSession};

use super::controller::WizardCommand;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("wizard controller has stopped")]
pub struct WizardClosed;

/// Cloneable entry point into a running [`WizardController`](super::WizardController).
///
/// The awaiting methods resolve with the session as it is after the command
/// was applied.
#[derive(Clone)]
pub struct WizardHandle {
    tx: mpsc::UnboundedSender<WizardCommand>,
}

impl WizardHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<WizardCommand>) -> Self {
        Self { tx }
    }

    /// "Next" pressed. `typed_text` is only read in the scan stage.
    pub async fn next(&self, typed_text: Option<String>) -> Result<WizardSession, WizardClosed> {
        self.request_event(WizardEvent::Next { typed_text }).await
    }

    pub async fn back(&self) -> Result<WizardSession, WizardClosed> {
        self.request_event(WizardEvent::Back).await
    }

    pub async fn retry(&self) -> Result<WizardSession, WizardClosed> {
        self.request_event(WizardEvent::Retry).await
    }

    pub async fn barcode(&self, barcode: BarcodeEvent) -> Result<WizardSession, WizardClosed> {
        self.request_event(WizardEvent::BarcodeDecoded(barcode))
            .await
    }

    /// Re-enters the wizard from the scan stage and releases temporary
    /// resources held from the previous run.
    pub async fn restart(&self) -> Result<WizardSession, WizardClosed> {
        self.request(|reply| WizardCommand::Restart(Some(reply)))
            .await
    }

    pub async fn snapshot(&self) -> Result<WizardSession, WizardClosed> {
        self.request(WizardCommand::Snapshot).await
    }

    /// Enqueues an event without waiting for it to be applied.
    pub fn send(&self, event: WizardEvent) -> Result<(), WizardClosed> {
        self.tx
            .send(WizardCommand::Event { event, reply: None })
            .map_err(|_| WizardClosed)
    }

    /// Listener that forwards decoded barcodes into the wizard queue.
    ///
    /// Safe to call from the capture worker.
    pub fn barcode_listener(&self) -> BarcodeListener {
        let handle = self.clone();
        std::sync::Arc::new(move |barcode: BarcodeEvent| {
            if handle.send(WizardEvent::BarcodeDecoded(barcode)).is_err() {
                tracing::debug!("wizard controller gone, dropping barcode");
            }
        })
    }

    pub fn shutdown(&self) -> Result<(), WizardClosed> {
        self.tx
            .send(WizardCommand::Shutdown)
            .map_err(|_| WizardClosed)
    }

    async fn request_event(&self, event: WizardEvent) -> Result<WizardSession, WizardClosed> {
        self.request(|reply| WizardCommand::Event {
            event,
            reply: Some(reply),
        })
        .await
    }

    async fn request<F>(&self, build: F) -> Result<WizardSession, WizardClosed>
    where
        F: FnOnce(oneshot::Sender<WizardSession>) -> WizardCommand,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(build(reply_tx)).map_err(|_| WizardClosed)?;
        reply_rx.await.map_err(|_| WizardClosed)
    }
}
