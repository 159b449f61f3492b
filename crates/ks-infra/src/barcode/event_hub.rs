//! Fan-out of decoded barcodes to registered listeners.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, trace};

use ks_core::ports::{BarcodeListener, BarcodeSourcePort, ListenerId};
use ks_core::BarcodeEvent;

/// The camera pipeline calls [`publish`](Self::publish) from its own worker;
/// listeners run on that worker, in registration order.
#[derive(Default)]
pub struct BarcodeEventHub {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<ListenerId, BarcodeListener>>,
}

impl BarcodeEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, event: BarcodeEvent) {
        let listeners: Vec<BarcodeListener> = self.listeners().values().cloned().collect();
        trace!(text = %event.text, listeners = listeners.len(), "publishing barcode");
        for listener in listeners {
            listener(event.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    // Poisoning is ignored; the map is never left half-updated.
    fn listeners(&self) -> MutexGuard<'_, BTreeMap<ListenerId, BarcodeListener>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BarcodeSourcePort for BarcodeEventHub {
    fn register_listener(&self, listener: BarcodeListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().insert(id, listener);
        debug!(id = id.0, "barcode listener registered");
        id
    }

    fn unregister_listener(&self, id: ListenerId) -> bool {
        let removed = self.listeners().remove(&id).is_some();
        debug!(id = id.0, removed, "barcode listener unregistered");
        removed
    }
}
