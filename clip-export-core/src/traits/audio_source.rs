use parking_lot::Mutex;

use crate::models::audio_buffer::AudioBuffer;
use crate::models::error::ExportError;
use crate::models::region::Region;

/// Provider of decoded audio (file decoder, capture buffer, test fixture).
pub trait AudioSource: Send + Sync {
    /// Decode the whole input into planar f32 samples.
    fn decode(&self) -> Result<AudioBuffer, ExportError>;
}

/// Provider of the user's current selection.
pub trait RegionSelector: Send + Sync {
    /// Snapshot of the selection. Read once per export action.
    fn current_region(&self) -> Result<Region, ExportError>;
}

impl AudioSource for AudioBuffer {
    fn decode(&self) -> Result<AudioBuffer, ExportError> {
        Ok(self.clone())
    }
}

impl RegionSelector for Region {
    fn current_region(&self) -> Result<Region, ExportError> {
        Ok(*self)
    }
}

/// Selection shared with an interactive editor that keeps updating it.
impl RegionSelector for Mutex<Region> {
    fn current_region(&self) -> Result<Region, ExportError> {
        Ok(*self.lock())
    }
}

/// Selection that may not exist yet.
impl RegionSelector for Mutex<Option<Region>> {
    fn current_region(&self) -> Result<Region, ExportError> {
        (*self.lock()).ok_or_else(|| ExportError::InvalidRegion("no region selected".into()))
    }
}
