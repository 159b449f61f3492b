//! Wizard controller.
//!
//! Owns the wizard session and runs the state machine on a single task.
//! Everything else (UI, barcode capture, acquisitions, the signer) talks to
//! it by enqueuing commands; results of background work come back the same
//! way and are applied in FIFO order.

use std::io::ErrorKind;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, info_span, warn, Instrument};

use ks_core::ports::{DeliveryError, KeySigningPort, TempResourceHandle, WizardEventPort};
use ks_core::wizard::DeliveryTicket;
use ks_core::{WizardAction, WizardEvent, WizardSession, WizardStateMachine};

use super::handle::WizardHandle;
use crate::usecases::acquisition::AcquisitionOrchestrator;

pub(crate) enum WizardCommand {
    Event {
        event: WizardEvent,
        reply: Option<oneshot::Sender<WizardSession>>,
    },
    DeliveryFinished {
        ticket: DeliveryTicket,
        result: Result<Vec<TempResourceHandle>, DeliveryError>,
    },
    Snapshot(oneshot::Sender<WizardSession>),
    Restart(Option<oneshot::Sender<WizardSession>>),
    Shutdown,
}

pub struct WizardController {
    session: WizardSession,
    machine: WizardStateMachine,
    acquisition: Arc<AcquisitionOrchestrator>,
    signer: Arc<dyn KeySigningPort>,
    event_port: Arc<dyn WizardEventPort>,
    temp_resources: Vec<TempResourceHandle>,
    tx: mpsc::UnboundedSender<WizardCommand>,
    rx: mpsc::UnboundedReceiver<WizardCommand>,
}

impl WizardController {
    pub fn new(
        machine: WizardStateMachine,
        acquisition: Arc<AcquisitionOrchestrator>,
        signer: Arc<dyn KeySigningPort>,
        event_port: Arc<dyn WizardEventPort>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: WizardSession::new(),
            machine,
            acquisition,
            signer,
            event_port,
            temp_resources: Vec::new(),
            tx,
            rx,
        }
    }

    pub fn handle(&self) -> WizardHandle {
        WizardHandle::new(self.tx.clone())
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn temp_resources(&self) -> &[TempResourceHandle] {
        &self.temp_resources
    }

    /// Drains the command queue until shut down.
    pub async fn run(mut self) {
        info!("wizard controller started");
        while self.process_next().await {}
        self.release_temp_resources().await;
        info!("wizard controller stopped");
    }

    /// Waits for one command and applies it.
    ///
    /// Returns `false` once the controller has been asked to shut down.
    pub async fn process_next(&mut self) -> bool {
        // The controller keeps a sender itself, so `recv` only yields `None`
        // if that invariant is ever broken.
        let Some(command) = self.rx.recv().await else {
            return false;
        };

        match command {
            WizardCommand::Event { event, reply } => {
                self.dispatch(event).await;
                if let Some(reply) = reply {
                    let _ = reply.send(self.session.clone());
                }
            }
            WizardCommand::DeliveryFinished { ticket, result } => {
                // Files of a stale delivery are kept too, so restart still removes them.
                let event = match result {
                    Ok(handles) => {
                        debug!(count = handles.len(), "keeping temporary resources");
                        self.temp_resources.extend(handles);
                        WizardEvent::DeliverySucceeded { ticket }
                    }
                    Err(err) => WizardEvent::DeliveryFailed {
                        ticket,
                        reason: err.to_string(),
                    },
                };
                self.dispatch(event).await;
            }
            WizardCommand::Snapshot(reply) => {
                let _ = reply.send(self.session.clone());
            }
            WizardCommand::Restart(reply) => {
                self.restart().await;
                if let Some(reply) = reply {
                    let _ = reply.send(self.session.clone());
                }
            }
            WizardCommand::Shutdown => return false,
        }
        true
    }

    async fn dispatch(&mut self, event: WizardEvent) {
        let kind = event_kind(&event);
        let span = info_span!("usecase.wizard_controller.dispatch", event = kind);
        async {
            let from = self.session.stage;
            let (next, actions) = self.machine.transition(self.session.clone(), event);
            let changed = next != self.session;
            info!(from = ?from, to = ?next.stage, event = kind, changed, "wizard transition");
            self.session = next;

            for action in actions {
                self.execute(action);
            }
            if changed {
                self.emit().await;
            }
        }
        .instrument(span)
        .await
    }

    fn execute(&self, action: WizardAction) {
        match action {
            WizardAction::AcquireKey { ticket, auth_code } => {
                debug!(generation = ticket.generation, fingerprint = %ticket.fingerprint, "starting acquisition");
                let success_tx = self.tx.clone();
                let success_ticket = ticket.clone();
                let failure_tx = self.tx.clone();
                let failure_ticket = ticket.clone();
                let task = self.acquisition.acquire(
                    ticket.fingerprint.clone(),
                    auth_code,
                    move |fingerprint, key_data| {
                        enqueue(
                            &success_tx,
                            WizardEvent::AcquisitionSucceeded {
                                ticket: success_ticket,
                                fingerprint,
                                key_data,
                            },
                        );
                    },
                    move || {
                        enqueue(
                            &failure_tx,
                            WizardEvent::AcquisitionFailed {
                                ticket: failure_ticket,
                            },
                        );
                    },
                );

                // A task that dies before calling back still ends as a failure;
                // a duplicate is filtered by its ticket.
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    if let Err(err) = task.await {
                        warn!(error = %err, generation = ticket.generation, "acquisition task aborted");
                        enqueue(&tx, WizardEvent::AcquisitionFailed { ticket });
                    }
                });
            }
            WizardAction::SignAndSend { ticket, key_data } => {
                let signer = Arc::clone(&self.signer);
                let tx = self.tx.clone();
                tokio::spawn(
                    async move {
                        let result = signer.sign_and_send(&ticket.fingerprint, &key_data).await;
                        if let Err(err) = &result {
                            warn!(error = %err, "signing or sending the key failed");
                        }
                        if tx
                            .send(WizardCommand::DeliveryFinished { ticket, result })
                            .is_err()
                        {
                            debug!("wizard controller gone, dropping delivery result");
                        }
                    }
                    .instrument(info_span!("usecase.wizard_controller.sign_and_send")),
                );
            }
        }
    }

    async fn restart(&mut self) {
        info!("restarting wizard");
        self.release_temp_resources().await;
        self.session = self.session.restart();
        self.emit().await;
    }

    async fn release_temp_resources(&mut self) {
        for handle in self.temp_resources.drain(..) {
            match tokio::fs::remove_file(&handle.path).await {
                Ok(()) => debug!(path = %handle.path.display(), "removed temporary resource"),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(path = %handle.path.display(), error = %err, "failed to remove temporary resource")
                }
            }
        }
    }

    async fn emit(&self) {
        self.event_port
            .emit_wizard_changed(self.session.clone())
            .await;
    }
}

fn enqueue(tx: &mpsc::UnboundedSender<WizardCommand>, event: WizardEvent) {
    if tx
        .send(WizardCommand::Event { event, reply: None })
        .is_err()
    {
        debug!("wizard controller gone, dropping acquisition result");
    }
}

fn event_kind(event: &WizardEvent) -> &'static str {
    match event {
        WizardEvent::Next { .. } => "next",
        WizardEvent::BarcodeDecoded(_) => "barcode_decoded",
        WizardEvent::Back => "back",
        WizardEvent::Retry => "retry",
        WizardEvent::AcquisitionSucceeded { .. } => "acquisition_succeeded",
        WizardEvent::AcquisitionFailed { .. } => "acquisition_failed",
        WizardEvent::DeliverySucceeded { .. } => "delivery_succeeded",
        WizardEvent::DeliveryFailed { .. } => "delivery_failed",
    }
}
