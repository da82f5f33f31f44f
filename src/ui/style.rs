//! Stroke styles of the face

use embedded_graphics::pixelcolor::Rgb888;

/// Shape at the ends of a line or of a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cap {
    Butt,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stroke<C> {
    pub color: C,
    pub width: f32,
    pub anti_alias: bool,
    pub cap: Cap,
}

/// Light grey used for every stroke on the face.
const FACE_GREY: Rgb888 = Rgb888::new(200, 200, 200);

const NOTCH_WIDTH: f32 = 2.0;
const HOUR_POINT_WIDTH: f32 = 12.0;

/// Strokes for the notches and the hour indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaceStyle<C> {
    pub notch: Stroke<C>,
    pub hour: Stroke<C>,
}

impl<C: From<Rgb888>> Default for FaceStyle<C> {
    fn default() -> Self {
        Self {
            notch: Stroke {
                color: FACE_GREY.into(),
                width: NOTCH_WIDTH,
                anti_alias: true,
                cap: Cap::Round,
            },
            hour: Stroke {
                color: FACE_GREY.into(),
                width: HOUR_POINT_WIDTH,
                anti_alias: true,
                cap: Cap::Round,
            },
        }
    }
}

impl<C> FaceStyle<C> {
    /// Low-bit ambient screens dither anti-aliased edges, so smoothing is
    /// switched off there while ambient and back on otherwise.
    pub fn apply_ambient(&mut self, ambient: bool, low_bit_ambient: bool) {
        let anti_alias = !(ambient && low_bit_ambient);
        self.notch.anti_alias = anti_alias;
        self.hour.anti_alias = anti_alias;
    }
}
