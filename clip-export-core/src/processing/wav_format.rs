//! WAV container layout.
//!
//! Builds and parses the canonical 44-byte RIFF header that precedes the
//! 16-bit PCM payload of an exported clip.

use crate::models::error::ExportError;

/// Size of the canonical WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Bits per sample written by the encoder.
pub const PCM_BIT_DEPTH: u16 = 16;

/// Largest data chunk whose RIFF size (`36 + data_size`) still fits a u32.
pub const MAX_DATA_SIZE: u64 = u32::MAX as u64 - 36;

const PCM_FORMAT_CODE: u16 = 1;

/// Generate a 44-byte WAV RIFF header.
///
/// Layout (little-endian):
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    36 + data_size
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bit_depth / 8
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
///
/// Fails with `EncodeOverflow` when any size field would not fit its width.
pub fn generate_wav_header(
    sample_rate: u32,
    bit_depth: u16,
    channels: u16,
    data_size: u64,
) -> Result<[u8; WAV_HEADER_SIZE], ExportError> {
    if data_size > MAX_DATA_SIZE {
        return Err(ExportError::EncodeOverflow { data_bytes: data_size });
    }
    let bytes_per_sample = u64::from(bit_depth / 8);
    let byte_rate = u32::try_from(u64::from(sample_rate) * u64::from(channels) * bytes_per_sample)
        .map_err(|_| ExportError::EncodeOverflow { data_bytes: data_size })?;
    let block_align = u16::try_from(u64::from(channels) * bytes_per_sample)
        .map_err(|_| ExportError::EncodeOverflow { data_bytes: data_size })?;
    let data_size = data_size as u32;
    let chunk_size = 36 + data_size;

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&PCM_FORMAT_CODE.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    Ok(header)
}

/// Fields decoded from a canonical 44-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_size: u32,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Number of PCM samples across all channels.
    pub fn sample_count(&self) -> usize {
        let bytes_per_sample = (self.bits_per_sample / 8).max(1) as usize;
        self.data_size as usize / bytes_per_sample
    }

    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.sample_count() / self.channels.max(1) as usize
    }
}

/// Parse the canonical header produced by [`generate_wav_header`].
///
/// Only the fixed 44-byte PCM layout is accepted; extensible or chunked
/// headers from other writers are rejected.
pub fn parse_wav_header(data: &[u8]) -> Result<WavHeader, ExportError> {
    if data.len() < WAV_HEADER_SIZE {
        return Err(ExportError::StorageError(format!(
            "WAV data too short: {} bytes (minimum {})",
            data.len(),
            WAV_HEADER_SIZE
        )));
    }
    for (offset, tag) in [(0usize, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
        if &data[offset..offset + 4] != tag {
            return Err(ExportError::StorageError(format!(
                "expected {:?} at offset {}",
                String::from_utf8_lossy(tag),
                offset
            )));
        }
    }

    let u16_at = |offset: usize| u16::from_le_bytes([data[offset], data[offset + 1]]);
    let u32_at = |offset: usize| u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]);

    let fmt_size = u32_at(16);
    if fmt_size != 16 {
        return Err(ExportError::StorageError(format!("unexpected fmt chunk size: {}", fmt_size)));
    }
    let format_code = u16_at(20);
    if format_code != PCM_FORMAT_CODE {
        return Err(ExportError::StorageError(format!("unsupported format code: {}", format_code)));
    }

    Ok(WavHeader {
        riff_size: u32_at(4),
        channels: u16_at(22),
        sample_rate: u32_at(24),
        byte_rate: u32_at(28),
        block_align: u16_at(32),
        bits_per_sample: u16_at(34),
        data_size: u32_at(40),
    })
}
