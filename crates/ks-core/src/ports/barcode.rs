use std::sync::Arc;

use crate::barcode::BarcodeEvent;

/// Callback invoked for every decoded barcode.
///
/// Runs on the capture worker; implementations should only hand the event
/// over to their own context.
pub type BarcodeListener = Arc<dyn Fn(BarcodeEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Source of decoded barcodes with explicit listener registration.
pub trait BarcodeSourcePort: Send + Sync {
    fn register_listener(&self, listener: BarcodeListener) -> ListenerId;

    /// Returns `false` if the id was not registered.
    fn unregister_listener(&self, id: ListenerId) -> bool;
}
