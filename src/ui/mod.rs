//! UI definitions module
//!
//! Clock reading, hand geometry and the drawing surface the face renders onto.

use core::f64::consts::TAU;

use chrono::{DateTime, FixedOffset, Timelike, Utc};

use crate::Error;

pub mod analog_watchface;
pub mod background;
pub mod canvas;
pub mod style;

use background::Bitmap;
use style::Stroke;

/// Point in surface coordinates with sub-pixel precision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Drawing primitives the host surface provides.
pub trait Canvas<C> {
    type Error;

    /// Full bounds of the surface, insets included.
    fn size(&self) -> embedded_graphics::geometry::Size;

    /// Blit `bitmap` with its top-left corner at `origin`.
    fn draw_bitmap(
        &mut self,
        bitmap: &Bitmap<C>,
        origin: embedded_graphics::geometry::Point,
    ) -> Result<(), Self::Error>;

    fn draw_line(
        &mut self,
        from: PointF,
        to: PointF,
        stroke: &Stroke<C>,
    ) -> Result<(), Self::Error>;

    /// Single point, as wide as the stroke and shaped by its cap.
    fn draw_point(&mut self, at: PointF, stroke: &Stroke<C>) -> Result<(), Self::Error>;
}

/// Local time of day as shown on the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockReading {
    /// 12-hour clock, 0..=11
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub millis: u32,
}

impl ClockReading {
    /// Decompose milliseconds since the epoch into local time at `offset`.
    pub fn from_millis(now_ms: i64, offset: &FixedOffset) -> Result<Self, Error> {
        let local = DateTime::<Utc>::from_timestamp_millis(now_ms)
            .ok_or(Error::TimestampOutOfRange(now_ms))?
            .with_timezone(offset);

        Ok(Self {
            hours: local.hour() % 12,
            minutes: local.minute(),
            seconds: local.second(),
            // Leap seconds are folded into the last millisecond
            millis: local.timestamp_subsec_millis().min(999),
        })
    }
}

/// Rotation of each hand in radians, 0 at 12 o'clock, clockwise.
///
/// Each hand carries the fraction of the smaller units so the hands sweep
/// instead of jumping.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl ClockAngles {
    pub fn from_reading(reading: &ClockReading) -> Self {
        let seconds = reading.seconds as f64 + reading.millis as f64 / 1000.0;
        let minutes = reading.minutes as f64 + seconds / 60.0;
        let hours = reading.hours as f64 + minutes / 60.0;

        Self {
            hour: hours / 12.0 * TAU,
            minute: minutes / 60.0 * TAU,
            second: seconds / 60.0 * TAU,
        }
    }

    pub fn at(now_ms: i64, offset: &FixedOffset) -> Result<Self, Error> {
        ClockReading::from_millis(now_ms, offset).map(|reading| Self::from_reading(&reading))
    }
}

/// Point at `radius` from `center` along `angle`.
pub fn point_on_face(center: PointF, angle: f64, radius: f32) -> PointF {
    PointF::new(
        center.x + (libm::sin(angle) * radius as f64) as f32,
        center.y - (libm::cos(angle) * radius as f64) as f32,
    )
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    const HOUR_MS: i64 = 3_600_000;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn reading_uses_twelve_hour_clock() {
        let now = 15 * HOUR_MS + 42 * 60_000 + 7_250;
        let reading = ClockReading::from_millis(now, &utc()).unwrap();
        assert_eq!(
            reading,
            ClockReading {
                hours: 3,
                minutes: 42,
                seconds: 7,
                millis: 250
            }
        );
    }

    #[test]
    fn reading_applies_offset() {
        let cet = FixedOffset::east_opt(3_600).unwrap();
        let reading = ClockReading::from_millis(23 * HOUR_MS, &cet).unwrap();
        assert_eq!(reading.hours, 0);

        let west = FixedOffset::west_opt(5 * 3_600).unwrap();
        let reading = ClockReading::from_millis(2 * HOUR_MS, &west).unwrap();
        assert_eq!(reading.hours, 9);
    }

    #[test]
    fn reading_before_epoch() {
        let reading = ClockReading::from_millis(-1, &utc()).unwrap();
        assert_eq!(
            (reading.hours, reading.minutes, reading.seconds, reading.millis),
            (11, 59, 59, 999)
        );
    }

    #[test]
    fn unrepresentable_timestamp() {
        assert_eq!(
            ClockReading::from_millis(i64::MAX, &utc()),
            Err(Error::TimestampOutOfRange(i64::MAX))
        );
    }

    #[test]
    fn three_oclock_is_quarter_turn() {
        let angles = ClockAngles::at(3 * HOUR_MS, &utc()).unwrap();
        assert_eq!(angles.hour, FRAC_PI_2);
        assert_eq!(angles.minute, 0.0);
        assert_eq!(angles.second, 0.0);
    }

    #[test]
    fn noon_and_midnight_are_zero() {
        assert_eq!(ClockAngles::at(0, &utc()).unwrap().hour, 0.0);
        assert_eq!(ClockAngles::at(12 * HOUR_MS, &utc()).unwrap().hour, 0.0);
    }

    #[test]
    fn hands_carry_fractions() {
        // 6:30:30
        let angles = ClockAngles::at(6 * HOUR_MS + 30 * 60_000 + 30_000, &utc()).unwrap();
        assert!((angles.second - PI).abs() < 1e-12);
        assert!((angles.minute - (30.5 / 60.0) * TAU).abs() < 1e-12);
        assert!((angles.hour - (6.0 + 30.5 / 60.0) / 12.0 * TAU).abs() < 1e-12);
    }

    #[test]
    fn point_mapping_is_clockwise_from_top() {
        let center = PointF::new(200.0, 200.0);
        assert_eq!(point_on_face(center, 0.0, 180.0), PointF::new(200.0, 20.0));
        assert_eq!(point_on_face(center, FRAC_PI_2, 180.0), PointF::new(380.0, 200.0));
        assert_eq!(point_on_face(center, PI, 180.0), PointF::new(200.0, 380.0));
    }
}
