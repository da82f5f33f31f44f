//! `Canvas` on top of any embedded-graphics draw target

use embedded_graphics::{
    image::Image,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
};

use super::{background::Bitmap, style::Cap, style::Stroke, Canvas, PointF};

/// Draws the face onto a display or framebuffer.
///
/// Coordinates are rounded to whole pixels. embedded-graphics has no
/// anti-aliasing, so the stroke flag is ignored here.
pub struct GraphicsCanvas<D> {
    target: D,
}

impl<D: DrawTarget> GraphicsCanvas<D> {
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

fn to_point(p: PointF) -> Point {
    Point::new(libm::roundf(p.x) as i32, libm::roundf(p.y) as i32)
}

fn stroke_width<C>(stroke: &Stroke<C>) -> u32 {
    (libm::roundf(stroke.width) as u32).max(1)
}

impl<D: DrawTarget> Canvas<D::Color> for GraphicsCanvas<D> {
    type Error = D::Error;

    fn size(&self) -> Size {
        self.target.bounding_box().size
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap<D::Color>, origin: Point) -> Result<(), D::Error> {
        Image::new(bitmap, origin).draw(&mut self.target)
    }

    fn draw_line(
        &mut self,
        from: PointF,
        to: PointF,
        stroke: &Stroke<D::Color>,
    ) -> Result<(), D::Error> {
        let width = stroke_width(stroke);
        Line::new(to_point(from), to_point(to))
            .into_styled(PrimitiveStyle::with_stroke(stroke.color, width))
            .draw(&mut self.target)?;

        if stroke.cap == Cap::Round && width > 1 {
            self.draw_point(from, stroke)?;
            self.draw_point(to, stroke)?;
        }
        Ok(())
    }

    fn draw_point(&mut self, at: PointF, stroke: &Stroke<D::Color>) -> Result<(), D::Error> {
        let width = stroke_width(stroke);
        let fill = PrimitiveStyle::with_fill(stroke.color);
        match stroke.cap {
            Cap::Round => Circle::with_center(to_point(at), width)
                .into_styled(fill)
                .draw(&mut self.target),
            Cap::Butt => Rectangle::with_center(to_point(at), Size::new(width, width))
                .into_styled(fill)
                .draw(&mut self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

    use super::*;

    fn stroke(width: f32, cap: Cap) -> Stroke<Rgb888> {
        Stroke {
            color: Rgb888::WHITE,
            width,
            anti_alias: true,
            cap,
        }
    }

    #[test]
    fn round_point_is_a_disc() {
        let mut canvas = GraphicsCanvas::new(Bitmap::new(Size::new(40, 40), Rgb888::BLACK));
        canvas.draw_point(PointF::new(20.0, 20.0), &stroke(12.0, Cap::Round)).unwrap();

        let frame = canvas.into_inner();
        assert_eq!(frame.pixel(Point::new(20, 20)), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(Point::new(24, 20)), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(Point::new(30, 20)), Some(Rgb888::BLACK));
        // Corners of the bounding square stay clear
        assert_eq!(frame.pixel(Point::new(14, 14)), Some(Rgb888::BLACK));
    }

    #[test]
    fn butt_point_is_a_square() {
        let mut canvas = GraphicsCanvas::new(Bitmap::new(Size::new(40, 40), Rgb888::BLACK));
        canvas.draw_point(PointF::new(20.0, 20.0), &stroke(6.0, Cap::Butt)).unwrap();

        let frame = canvas.into_inner();
        // Even sizes sit half a pixel down-right of the center
        assert_eq!(frame.pixel(Point::new(18, 18)), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(Point::new(23, 23)), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(Point::new(24, 20)), Some(Rgb888::BLACK));
        assert_eq!(frame.pixel(Point::new(17, 17)), Some(Rgb888::BLACK));
    }

    #[test]
    fn hairline_covers_both_ends() {
        let mut canvas = GraphicsCanvas::new(Bitmap::new(Size::new(20, 20), Rgb888::BLACK));
        let (top, bottom) = (PointF::new(10.0, 2.0), PointF::new(10.0, 17.6));
        canvas.draw_line(top, bottom, &stroke(1.0, Cap::Butt)).unwrap();

        let frame = canvas.target();
        assert_eq!(frame.pixel(Point::new(10, 2)), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(Point::new(10, 10)), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(Point::new(10, 18)), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(Point::new(3, 10)), Some(Rgb888::BLACK));
    }

    #[test]
    fn bitmap_is_blitted_at_origin() {
        let mut canvas = GraphicsCanvas::new(Bitmap::new(Size::new(4, 4), Rgb888::BLACK));
        assert_eq!(canvas.size(), Size::new(4, 4));

        let red = Bitmap::new(Size::new(2, 2), Rgb888::RED);
        canvas.draw_bitmap(&red, Point::zero()).unwrap();

        let frame = canvas.target();
        assert_eq!(frame.pixel(Point::new(1, 1)), Some(Rgb888::RED));
        assert_eq!(frame.pixel(Point::new(2, 2)), Some(Rgb888::BLACK));
    }
}
