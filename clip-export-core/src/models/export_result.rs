use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::ChannelLayout;
use super::region::Region;

/// Result returned when an export action reaches `Delivered`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    pub file_name: String,
    pub mime_type: String,
    /// Where the sink stored the clip, if it is file-backed.
    pub location: Option<PathBuf>,
    pub byte_len: usize,
    pub checksum: String,
    pub metadata: ExportMetadata,
}

/// Descriptive record of one exported clip.
///
/// Serializable for the JSON sidecar written next to file exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub id: String,
    pub created_at: String,
    pub file_name: String,
    pub region: Region,
    pub sample_rate: u32,
    pub channels: u16,
    pub channel_layout: ChannelLayout,
    pub frames: usize,
    pub duration_secs: f64,
    pub checksum: String,
}

impl ExportMetadata {
    pub fn new(
        file_name: &str,
        region: Region,
        sample_rate: u32,
        channels: u16,
        channel_layout: ChannelLayout,
        frames: usize,
        checksum: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            file_name: file_name.to_string(),
            region,
            sample_rate,
            channels,
            channel_layout,
            frames,
            duration_secs: frames as f64 / sample_rate as f64,
            checksum: checksum.to_string(),
        }
    }
}
