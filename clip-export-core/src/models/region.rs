use serde::{Deserialize, Serialize};

use super::error::ExportError;

const OFFSET_EPSILON: f64 = 1e-6;

/// A selected time interval `[start, end)` in seconds.
///
/// Constructed through [`Region::new`], which guarantees finite bounds,
/// `start >= 0` and `start <= end`. A zero-width region is representable and
/// resolves to `EmptyRegion` when clipped. Upper-bound checks against a
/// concrete source happen in [`Region::validate_within`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    start: f64,
    end: f64,
}

impl Region {
    pub fn new(start: f64, end: f64) -> Result<Self, ExportError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ExportError::InvalidRegion(format!(
                "bounds must be finite (start={}, end={})",
                start, end
            )));
        }
        if start < 0.0 {
            return Err(ExportError::InvalidRegion(format!("start {} is negative", start)));
        }
        if end < start {
            return Err(ExportError::InvalidRegion(format!(
                "end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }

    /// Check that the region lies inside `[0, duration_secs]`.
    pub fn validate_within(&self, duration_secs: f64) -> Result<(), ExportError> {
        if self.end > duration_secs {
            return Err(ExportError::InvalidRegion(format!(
                "end {:.6}s exceeds source duration {:.6}s",
                self.end, duration_secs
            )));
        }
        if self.start > duration_secs {
            return Err(ExportError::InvalidRegion(format!(
                "start {:.6}s is not inside source duration {:.6}s",
                self.start, duration_secs
            )));
        }
        Ok(())
    }

    /// Sample offsets `(floor(start * rate), floor(end * rate))` clamped to `[0, length]`.
    ///
    /// The one exception: an `end` whose product lies within `OFFSET_EPSILON`
    /// of `length` maps to `length`, so a region ending at `length / rate`
    /// covers the last sample.
    pub fn sample_offsets(&self, sample_rate: u32, length: usize) -> (usize, usize) {
        let rate = sample_rate as f64;
        let end_scaled = self.end * rate;
        let end = if (end_scaled - length as f64).abs() < OFFSET_EPSILON {
            length
        } else {
            floor_offset(end_scaled, length)
        };
        (floor_offset(self.start * rate, length), end)
    }
}

fn floor_offset(scaled: f64, length: usize) -> usize {
    let offset = scaled.floor();
    if offset <= 0.0 {
        0
    } else {
        (offset as usize).min(length)
    }
}
