use sha2::{Digest, Sha256};

use crate::models::audio_buffer::AudioBuffer;
use crate::models::config::ChannelLayout;
use crate::models::error::ExportError;
use crate::processing::wav_format::{self, WavHeader, PCM_BIT_DEPTH, WAV_HEADER_SIZE};

/// A complete, immutable WAV file image: 44-byte header followed by
/// frame-interleaved 16-bit little-endian PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavBytes {
    bytes: Vec<u8>,
}

impl WavBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The PCM payload after the header.
    pub fn pcm_data(&self) -> &[u8] {
        &self.bytes[WAV_HEADER_SIZE..]
    }

    pub fn header(&self) -> Result<WavHeader, ExportError> {
        wav_format::parse_wav_header(&self.bytes)
    }

    /// SHA-256 hex digest of the full file image.
    pub fn checksum(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        hex_encode(&digest)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for WavBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Serializes clipped audio into a 16-bit PCM WAV image.
///
/// Header channel, byte-rate and block-align fields always describe the
/// channels actually written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PcmWavEncoder {
    layout: ChannelLayout,
}

impl PcmWavEncoder {
    pub fn new(layout: ChannelLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Number of channels the container will declare for `buffer`.
    pub fn output_channels(&self, buffer: &AudioBuffer) -> u16 {
        match self.layout {
            ChannelLayout::Mono => 1,
            ChannelLayout::Preserve => buffer.channel_count() as u16,
        }
    }

    /// Encode `buffer` to a WAV image of exactly `44 + samples * 2` bytes.
    ///
    /// Either returns a complete, self-consistent file or an error; the size
    /// fields are checked before any sample is written.
    pub fn encode(&self, buffer: &AudioBuffer) -> Result<WavBytes, ExportError> {
        let samples = match self.layout {
            ChannelLayout::Mono => downmix_to_mono(buffer),
            ChannelLayout::Preserve => interleave_frames(buffer),
        };
        let channels = self.output_channels(buffer);

        let data_size = samples.len() as u64 * u64::from(PCM_BIT_DEPTH / 8);
        let header = wav_format::generate_wav_header(buffer.sample_rate(), PCM_BIT_DEPTH, channels, data_size)?;

        let mut bytes = Vec::with_capacity(WAV_HEADER_SIZE + data_size as usize);
        bytes.extend_from_slice(&header);
        bytes.extend_from_slice(&convert_to_int16_pcm(&samples));

        log::debug!(
            "encoded {} samples ({} ch @ {} Hz) into {} bytes",
            samples.len(),
            channels,
            buffer.sample_rate(),
            bytes.len()
        );
        Ok(WavBytes { bytes })
    }
}

/// Convert one f32 sample to signed 16-bit PCM.
///
/// Clamps to `[-1.0, 1.0]` (NaN becomes silence), scales negatives by 32768
/// and non-negatives by 32767, then truncates toward zero.
pub fn quantize_sample(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    let clamped = sample.clamp(-1.0, 1.0);
    let scaled = if clamped < 0.0 {
        clamped * 32768.0
    } else {
        clamped * 32767.0
    };
    scaled.trunc() as i16
}

/// Convert f32 samples to little-endian 16-bit PCM bytes (`samples.len() * 2`).
pub fn convert_to_int16_pcm(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        data.extend_from_slice(&quantize_sample(sample).to_le_bytes());
    }
    data
}

/// Flatten planar channels into per-frame order `[L0, R0, L1, R1, ...]`.
pub fn interleave_frames(buffer: &AudioBuffer) -> Vec<f32> {
    let channel_count = buffer.channel_count();
    let mut interleaved = vec![0.0f32; buffer.total_samples()];
    for (ch, channel) in buffer.channels().enumerate() {
        for (frame, &sample) in channel.iter().enumerate() {
            interleaved[frame * channel_count + ch] = sample;
        }
    }
    interleaved
}

/// Average all channels per frame into a single mono channel.
pub fn downmix_to_mono(buffer: &AudioBuffer) -> Vec<f32> {
    let channel_count = buffer.channel_count();
    if channel_count <= 1 {
        return buffer.channel(0).map(<[f32]>::to_vec).unwrap_or_default();
    }
    let scale = 1.0 / channel_count as f32;
    let mut mono = vec![0.0f32; buffer.length()];
    for channel in buffer.channels() {
        for (out, &sample) in mono.iter_mut().zip(channel) {
            *out += sample;
        }
    }
    for sample in &mut mono {
        *sample *= scale;
    }
    mono
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
