use std::path::PathBuf;

use crate::models::error::ExportError;
use crate::processing::wav_encoder::WavBytes;
use crate::traits::export_sink::ExportSink;

/// A clip handed to a [`MemoryExportSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredClip {
    pub file_name: String,
    pub mime_type: String,
    pub wav: WavBytes,
}

/// Keeps delivered clips in memory, e.g. for an embedder that streams them
/// to a download or upload itself.
#[derive(Debug, Default)]
pub struct MemoryExportSink {
    deliveries: Vec<DeliveredClip>,
}

impl MemoryExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> &[DeliveredClip] {
        &self.deliveries
    }

    pub fn last(&self) -> Option<&DeliveredClip> {
        self.deliveries.last()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    /// Remove and return everything delivered so far.
    pub fn take(&mut self) -> Vec<DeliveredClip> {
        std::mem::take(&mut self.deliveries)
    }
}

impl ExportSink for MemoryExportSink {
    fn deliver(&mut self, file_name: &str, mime_type: &str, wav: &WavBytes) -> Result<Option<PathBuf>, ExportError> {
        self.deliveries.push(DeliveredClip {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            wav: wav.clone(),
        });
        Ok(None)
    }
}
