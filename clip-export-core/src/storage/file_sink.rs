use std::fs;
use std::path::{Path, PathBuf};

use crate::models::config::ExportConfiguration;
use crate::models::error::ExportError;
use crate::processing::wav_encoder::WavBytes;
use crate::traits::export_sink::ExportSink;

/// Writes clips into a directory.
///
/// The bytes go to `{name}.partial` first and are renamed into place, so a
/// failed write never leaves a truncated clip under the final name.
#[derive(Debug, Clone)]
pub struct FileExportSink {
    output_directory: PathBuf,
}

impl FileExportSink {
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: output_directory.into(),
        }
    }

    pub fn from_config(config: &ExportConfiguration) -> Self {
        Self::new(config.output_directory.clone())
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }
}

impl ExportSink for FileExportSink {
    fn deliver(&mut self, file_name: &str, _mime_type: &str, wav: &WavBytes) -> Result<Option<PathBuf>, ExportError> {
        fs::create_dir_all(&self.output_directory)
            .map_err(|e| ExportError::StorageError(format!("failed to create directory: {}", e)))?;

        let path = self.output_directory.join(file_name);
        let partial = self.output_directory.join(format!("{}.partial", file_name));

        if let Err(e) = fs::write(&partial, wav.as_bytes()) {
            fs::remove_file(&partial).ok();
            return Err(ExportError::StorageError(format!("write failed: {}", e)));
        }
        if let Err(e) = fs::rename(&partial, &path) {
            fs::remove_file(&partial).ok();
            return Err(ExportError::StorageError(format!("failed to finalize file: {}", e)));
        }

        log::info!("wrote {} bytes to {}", wav.len(), path.display());
        Ok(Some(path))
    }
}
