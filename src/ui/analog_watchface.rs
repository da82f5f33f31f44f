//! Analog watchface
//!
//! Background, twelve notches around the rim and a single point marking the
//! hour. Minute and second angles are computed alongside the hour but not
//! drawn.

use core::f64::consts::TAU;

use chrono::FixedOffset;
use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::{PixelColor, Rgb888},
};

use super::{
    background::{BackgroundScaler, Bitmap},
    point_on_face,
    style::FaceStyle,
    Canvas, ClockAngles, PointF,
};
use crate::{system::config::FaceConfig, Error, RenderError};

/// Number of notches around the rim.
pub const NOTCH_COUNT: usize = 12;

/// Angle between two neighbouring notches.
pub const NOTCH_INCREMENT_RAD: f64 = TAU / NOTCH_COUNT as f64;

/// Layout of one frame, before anything is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLayout {
    pub center: PointF,
    /// Radius the notches start at and the hour point sits on.
    pub notch_radius: f32,
}

impl FaceLayout {
    /// Center on the full surface so faces with a flat tire still look round.
    pub fn new(size: Size, notch_inset: f32) -> Self {
        let center = PointF::new(size.width as f32 / 2.0, size.height as f32 / 2.0);
        Self {
            center,
            notch_radius: center.x - notch_inset,
        }
    }

    /// Notch at `angle`, from the notch ring out to the rim.
    pub fn notch(&self, angle: f64) -> (PointF, PointF) {
        let start = point_on_face(self.center, angle, self.notch_radius);
        let end = PointF::new(
            self.center.x + (libm::sin(angle) * self.center.x as f64) as f32,
            self.center.y - (libm::cos(angle) * self.center.y as f64) as f32,
        );
        (start, end)
    }

    pub fn hour_point(&self, angles: &ClockAngles) -> PointF {
        point_on_face(self.center, angles.hour, self.notch_radius)
    }
}

/// Angles of all notches, starting at 12 o'clock.
pub fn notch_angles() -> impl Iterator<Item = f64> {
    (0..NOTCH_COUNT).map(|i| i as f64 * NOTCH_INCREMENT_RAD)
}

/// Analog face renderer
pub struct AnalogWatchface<C> {
    background: BackgroundScaler<C>,
    style: FaceStyle<C>,
    notch_inset: f32,
}

impl<C> AnalogWatchface<C>
where
    C: PixelColor + From<Rgb888> + Into<Rgb888>,
{
    /// Create new watchface
    pub fn new(background: Bitmap<C>, config: &FaceConfig) -> Result<Self, Error> {
        Ok(Self {
            background: BackgroundScaler::new(background, config.scale_filter)?,
            style: FaceStyle::default(),
            notch_inset: config.notch_inset,
        })
    }

    pub fn style(&self) -> &FaceStyle<C> {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut FaceStyle<C> {
        &mut self.style
    }

    pub fn background(&self) -> &BackgroundScaler<C> {
        &self.background
    }

    /// Resize the background for a new surface.
    pub fn on_surface_changed(&mut self, size: Size) {
        self.background.ensure_scaled(size);
    }

    /// Draw one frame for the time `now_ms` in the zone `offset`.
    ///
    /// Notches are left out in ambient mode; the hour point is always drawn.
    pub fn render<K>(
        &mut self,
        canvas: &mut K,
        now_ms: i64,
        offset: &FixedOffset,
        ambient: bool,
    ) -> Result<ClockAngles, RenderError<K::Error>>
    where
        K: Canvas<C>,
    {
        let angles = ClockAngles::at(now_ms, offset)?;
        let size = canvas.size();
        let layout = FaceLayout::new(size, self.notch_inset);

        let background = self.background.ensure_scaled(size);
        canvas
            .draw_bitmap(background, Point::zero())
            .map_err(RenderError::Canvas)?;

        if !ambient {
            for angle in notch_angles() {
                let (start, end) = layout.notch(angle);
                canvas
                    .draw_line(start, end, &self.style.notch)
                    .map_err(RenderError::Canvas)?;
            }
        }

        canvas
            .draw_point(layout.hour_point(&angles), &self.style.hour)
            .map_err(RenderError::Canvas)?;

        trace!("Rendered frame at {}ms, ambient: {}", now_ms, ambient);
        Ok(angles)
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_PI_6;

    use super::*;

    #[test]
    fn notches_step_by_thirty_degrees() {
        let angles: alloc::vec::Vec<f64> = notch_angles().collect();
        assert_eq!(angles.len(), 12);
        assert_eq!(angles[0], 0.0);
        for pair in angles.windows(2) {
            assert!((pair[1] - pair[0] - FRAC_PI_6).abs() < 1e-12);
        }
    }

    #[test]
    fn layout_on_square_surface() {
        let layout = FaceLayout::new(Size::new(400, 400), 20.0);
        assert_eq!(layout.center, PointF::new(200.0, 200.0));
        assert_eq!(layout.notch_radius, 180.0);

        let (start, end) = layout.notch(0.0);
        assert_eq!(start, PointF::new(200.0, 20.0));
        assert_eq!(end, PointF::new(200.0, 0.0));
    }

    #[test]
    fn notch_reaches_rim_on_each_axis() {
        // Surface with a flat tire: the vertical notch spans the full height
        let layout = FaceLayout::new(Size::new(320, 290), 20.0);
        let (_, top) = layout.notch(0.0);
        assert_eq!(top, PointF::new(160.0, 0.0));

        let (start, right) = layout.notch(core::f64::consts::FRAC_PI_2);
        assert_eq!(start, PointF::new(300.0, 145.0));
        assert_eq!(right, PointF::new(320.0, 145.0));
    }
}
