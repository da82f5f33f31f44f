//! Watch face configuration

use chrono::FixedOffset;

use crate::{ui::background::ScaleFilter, Error};

/// Repaint cadence while interactive.
pub const INTERACTIVE_UPDATE_RATE_MS: u32 = 1_000;

/// Distance between the notch ring and the edge of the face.
pub const NOTCH_INSET: f32 = 20.0;

/// Configuration of a face instance.
///
/// Appearance is fixed; these are the knobs the host integration needs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceConfig {
    /// Repaint period while visible and interactive, in milliseconds.
    pub update_rate_ms: u32,
    /// Inset of the notch ring and hour indicator from the face edge, in pixels.
    pub notch_inset: f32,
    /// Filter used when resizing the background to the surface.
    pub scale_filter: ScaleFilter,
    /// UTC offset used until the host reports the local time zone.
    pub default_utc_offset_secs: i32,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            update_rate_ms: INTERACTIVE_UPDATE_RATE_MS,
            notch_inset: NOTCH_INSET,
            scale_filter: ScaleFilter::Bilinear,
            default_utc_offset_secs: 0,
        }
    }
}

impl FaceConfig {
    /// Create new configuration with a fallback UTC offset
    pub fn with_utc_offset(secs: i32) -> Self {
        Self {
            default_utc_offset_secs: secs,
            ..Self::default()
        }
    }

    /// Fallback offset as a chrono time zone.
    pub fn default_offset(&self) -> Result<FixedOffset, Error> {
        FixedOffset::east_opt(self.default_utc_offset_secs)
            .ok_or(Error::InvalidOffset(self.default_utc_offset_secs))
    }
}
