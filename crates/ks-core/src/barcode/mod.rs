//! Events emitted by the barcode decoding pipeline.

/// A code decoded from the camera feed.
///
/// `aux_frame` holds the video frame the code was found in, when the
/// pipeline could provide one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeEvent {
    pub text: String,
    pub aux_frame: Option<Vec<u8>>,
}

impl BarcodeEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            aux_frame: None,
        }
    }

    pub fn with_frame(mut self, frame: Vec<u8>) -> Self {
        self.aux_frame = Some(frame);
        self
    }
}
