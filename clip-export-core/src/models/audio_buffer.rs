use crate::models::error::ExportError;

/// Decoded, planar multichannel audio.
///
/// Each channel holds `length` f32 samples at `sample_rate` Hz. The buffer is
/// immutable once built; every stage of the export pipeline produces a new
/// one instead of editing in place.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Build a buffer from per-channel sample arrays.
    ///
    /// Requires at least one channel, a positive sample rate, and equal
    /// channel lengths.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self, ExportError> {
        validate_shape(&channels, sample_rate)?;
        Ok(Self { sample_rate, channels })
    }

    /// Single-channel convenience constructor.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self, ExportError> {
        Self::from_channels(vec![samples], sample_rate)
    }

    /// A buffer of `channel_count` channels filled with silence.
    pub fn silent(channel_count: usize, length: usize, sample_rate: u32) -> Result<Self, ExportError> {
        Self::from_channels(vec![vec![0.0; length]; channel_count], sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel (frames).
    pub fn length(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Duration in seconds (`length / sample_rate`).
    pub fn duration_secs(&self) -> f64 {
        self.length() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// Total samples across all channels (`channel_count * length`).
    pub fn total_samples(&self) -> usize {
        self.channel_count() * self.length()
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}

pub(crate) fn validate_shape(channels: &[Vec<f32>], sample_rate: u32) -> Result<(), ExportError> {
    if sample_rate == 0 {
        return Err(ExportError::InvalidBuffer("sample rate must be positive".into()));
    }
    let Some(first) = channels.first() else {
        return Err(ExportError::InvalidBuffer("buffer has no channels".into()));
    };
    if channels.len() > u16::MAX as usize {
        return Err(ExportError::InvalidBuffer(format!(
            "unsupported channel count: {}",
            channels.len()
        )));
    }
    let length = first.len();
    if let Some((index, channel)) = channels.iter().enumerate().find(|(_, c)| c.len() != length) {
        return Err(ExportError::InvalidBuffer(format!(
            "channel {} has {} samples, expected {}",
            index,
            channel.len(),
            length
        )));
    }
    Ok(())
}
