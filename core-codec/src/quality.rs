//! # Quality Mapping
//!
//! Translates the pipeline's abstract [`QualityIndex`] into an engine's native
//! compression parameter by clamped linear interpolation.

use crate::traits::QualityIndex;

const QUALITY_LOWEST: f32 = 1.0;
const QUALITY_HIGHEST: f32 = 40.0;

/// Linear mapping from the quality range onto an engine parameter range.
///
/// `worst` is the parameter used for [`QualityIndex::MIN`] and `best` the one
/// used for [`QualityIndex::MAX`]. Either direction is allowed; engines where
/// lower numbers mean better output simply have `best < worst`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityMapper {
    lowest: f32,
    highest: f32,
    worst: f32,
    best: f32,
}

impl QualityMapper {
    /// Bink compression level: quality 1 maps to level 4, quality 40 to level 0.
    pub const BINK: QualityMapper = QualityMapper::new(4.0, 0.0);

    /// Mapping over the full `[1, 40]` quality range.
    pub const fn new(worst: f32, best: f32) -> Self {
        Self::with_input_range(QUALITY_LOWEST, QUALITY_HIGHEST, worst, best)
    }

    /// Mapping over an arbitrary input range.
    ///
    /// A degenerate range (`lowest == highest`) maps every input to `worst`.
    pub const fn with_input_range(lowest: f32, highest: f32, worst: f32, best: f32) -> Self {
        Self {
            lowest,
            highest,
            worst,
            best,
        }
    }

    /// Map a quality index onto the parameter range.
    pub fn map(&self, quality: QualityIndex) -> f32 {
        self.map_value(quality.get() as f32)
    }

    /// Map a raw input value, clamping it into the input range first.
    pub fn map_value(&self, value: f32) -> f32 {
        let span = self.highest - self.lowest;
        if span == 0.0 {
            return self.worst;
        }

        let alpha = ((value - self.lowest) / span).clamp(0.0, 1.0);
        self.worst + alpha * (self.best - self.worst)
    }

    /// Map and narrow to an integer engine level, truncating toward zero.
    pub fn compression_level(&self, quality: QualityIndex) -> u8 {
        self.map(quality) as u8
    }
}
