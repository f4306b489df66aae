use std::path::PathBuf;

use crate::models::error::ExportError;
use crate::processing::wav_encoder::WavBytes;

/// Destination for encoded clips (file system, download trigger, upload, ...).
///
/// Implemented by:
/// - `FileExportSink` (writes into a directory)
/// - `MemoryExportSink` (keeps clips in memory)
///
/// A sink only ever receives complete WAV images. It must not keep a
/// partially written file around when `deliver` fails.
pub trait ExportSink: Send {
    /// Persist or hand off one clip.
    ///
    /// Returns the file location when the sink is file-backed.
    fn deliver(&mut self, file_name: &str, mime_type: &str, wav: &WavBytes) -> Result<Option<PathBuf>, ExportError>;
}
