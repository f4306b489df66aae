use crate::models::audio_buffer::AudioBuffer;
use crate::models::error::ExportError;
use crate::models::region::Region;

/// Extracts the exact sample subrange of a region from every channel.
///
/// Offsets are `floor(seconds * sample_rate)` clamped to `[0, length]`, so the
/// clip holds `floor(end * rate) - floor(start * rate)` frames per channel.
/// The source buffer is never modified.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleClipper;

impl SampleClipper {
    pub fn new() -> Self {
        Self
    }

    /// Frame range `[start, end)` the region maps to in `buffer`.
    pub fn frame_range(&self, buffer: &AudioBuffer, region: &Region) -> (usize, usize) {
        region.sample_offsets(buffer.sample_rate(), buffer.length())
    }

    /// Copy the region out of `buffer` into a new buffer of the same
    /// channel count and sample rate.
    ///
    /// Fails with `EmptyRegion` if the clamped range holds no frames.
    pub fn clip(&self, buffer: &AudioBuffer, region: &Region) -> Result<AudioBuffer, ExportError> {
        let (start, end) = self.frame_range(buffer, region);
        if end <= start {
            log::warn!(
                "region {:.6}s..{:.6}s resolves to no frames (offsets {}..{})",
                region.start(),
                region.end(),
                start,
                end
            );
            return Err(ExportError::EmptyRegion);
        }

        let channels: Vec<Vec<f32>> = buffer.channels().map(|channel| channel[start..end].to_vec()).collect();

        log::debug!(
            "clipped frames {}..{} ({} frames x {} channels)",
            start,
            end,
            end - start,
            channels.len()
        );
        AudioBuffer::from_channels(channels, buffer.sample_rate())
    }
}
