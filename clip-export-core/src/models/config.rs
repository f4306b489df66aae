use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::ExportError;

/// Channel layout written to the exported WAV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// Keep every source channel, frame-interleaved.
    #[default]
    Preserve,
    /// Average all channels into one.
    Mono,
}

/// Configuration for an export session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfiguration {
    /// Name of the exported file (default: `clipped_audio.wav`).
    pub file_name: String,

    /// Channel layout of the encoded output (default: preserve).
    pub channel_layout: ChannelLayout,

    /// Directory used by file-backed sinks.
    pub output_directory: PathBuf,

    /// Write a `.metadata.json` sidecar next to file-backed exports (default: true).
    pub write_metadata: bool,
}

impl ExportConfiguration {
    pub const DEFAULT_FILE_NAME: &'static str = "clipped_audio.wav";
    pub const MIME_TYPE: &'static str = "audio/wav";

    pub fn validate(&self) -> Result<(), String> {
        if self.file_name.trim().is_empty() {
            return Err("file name must not be empty".into());
        }
        if self.file_name.contains(['/', '\\']) {
            return Err(format!("file name must not contain path separators: {}", self.file_name));
        }
        if !self.file_name.to_ascii_lowercase().ends_with(".wav") {
            return Err(format!("file name must end with .wav: {}", self.file_name));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ExportError::ConfigurationFailed(format!("failed to parse configuration: {}", e)))?;
        config.validate().map_err(ExportError::ConfigurationFailed)?;
        Ok(config)
    }
}

impl Default for ExportConfiguration {
    fn default() -> Self {
        Self {
            file_name: Self::DEFAULT_FILE_NAME.to_string(),
            channel_layout: ChannelLayout::Preserve,
            output_directory: PathBuf::from("."),
            write_metadata: true,
        }
    }
}
