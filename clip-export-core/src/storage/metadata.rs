use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::ExportError;
use crate::models::export_result::ExportMetadata;

/// Sidecar path for an exported clip: `{clip}.metadata.json`.
pub fn metadata_path(clip_path: &Path) -> PathBuf {
    clip_path.with_extension("metadata.json")
}

/// Write export metadata as a JSON sidecar file next to the clip.
pub fn write_metadata(metadata: &ExportMetadata, clip_path: &Path) -> Result<PathBuf, ExportError> {
    let path = metadata_path(clip_path);
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| ExportError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&path, json).map_err(|e| ExportError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(path)
}

/// Read export metadata from the JSON sidecar of a clip.
pub fn read_metadata(clip_path: &Path) -> Result<ExportMetadata, ExportError> {
    let json = fs::read_to_string(metadata_path(clip_path))
        .map_err(|e| ExportError::StorageError(format!("failed to read metadata: {}", e)))?;
    let metadata: ExportMetadata = serde_json::from_str(&json)
        .map_err(|e| ExportError::StorageError(format!("failed to parse metadata: {}", e)))?;
    Ok(metadata)
}
