//! Background image and its surface-sized copy

use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTargetExt,
    image::ImageDrawable,
    pixelcolor::{Rgb888, RgbColor},
    prelude::*,
    primitives::Rectangle,
};

use crate::Error;

/// How pixels are sampled when the background is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScaleFilter {
    Nearest,
    Bilinear,
}

/// Owned, heap allocated image in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap<C> {
    size: Size,
    pixels: Vec<C>,
}

impl<C: PixelColor> Bitmap<C> {
    /// Create new bitmap filled with a single color
    pub fn new(size: Size, fill: C) -> Self {
        Self {
            size,
            pixels: alloc::vec![fill; (size.width * size.height) as usize],
        }
    }

    /// Wrap existing pixel data. Empty or mismatched data counts as a missing image.
    pub fn from_pixels(size: Size, pixels: Vec<C>) -> Result<Self, Error> {
        if pixels.is_empty() || pixels.len() != (size.width * size.height) as usize {
            return Err(Error::MissingBackground);
        }
        Ok(Self { size, pixels })
    }

    /// Render any embedded-graphics image (e.g. `ImageRawBE`) into a new bitmap.
    pub fn from_image<I>(image: &I, fill: C) -> Result<Self, Error>
    where
        I: ImageDrawable<Color = C>,
    {
        let mut bitmap = Self::new(image.size(), fill);
        if bitmap.is_empty() {
            return Err(Error::MissingBackground);
        }
        image
            .draw(&mut bitmap)
            .unwrap_or_else(|never: Infallible| match never {});
        Ok(bitmap)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[C] {
        &self.pixels
    }

    pub fn pixel(&self, point: Point) -> Option<C> {
        self.index(point).map(|i| self.pixels[i])
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (u32::try_from(point.x).ok()?, u32::try_from(point.y).ok()?);
        (x < self.size.width && y < self.size.height).then(|| (y * self.size.width + x) as usize)
    }

    fn at(&self, x: u32, y: u32) -> C {
        self.pixels[(y * self.size.width + x) as usize]
    }
}

impl<C> Bitmap<C>
where
    C: PixelColor + From<Rgb888> + Into<Rgb888>,
{
    /// Resized copy of this bitmap.
    pub fn scaled(&self, size: Size, filter: ScaleFilter) -> Self {
        let mut pixels = Vec::with_capacity((size.width * size.height) as usize);
        if !self.is_empty() {
            for y in 0..size.height {
                for x in 0..size.width {
                    pixels.push(match filter {
                        ScaleFilter::Nearest => self.sample_nearest(x, y, size),
                        ScaleFilter::Bilinear => self.sample_bilinear(x, y, size),
                    });
                }
            }
        }
        Self { size, pixels }
    }

    fn sample_nearest(&self, x: u32, y: u32, target: Size) -> C {
        let sx = (x as u64 * self.size.width as u64 / target.width as u64) as u32;
        let sy = (y as u64 * self.size.height as u64 / target.height as u64) as u32;
        self.at(sx, sy)
    }

    fn sample_bilinear(&self, x: u32, y: u32, target: Size) -> C {
        let (x0, x1, tx) = source_span(x, target.width, self.size.width);
        let (y0, y1, ty) = source_span(y, target.height, self.size.height);

        let top = lerp(self.at(x0, y0).into(), self.at(x1, y0).into(), tx);
        let bottom = lerp(self.at(x0, y1).into(), self.at(x1, y1).into(), tx);
        to_color(lerp_channels(top, bottom, ty))
    }
}

/// Neighbouring source columns (or rows) of a target pixel center and the
/// weight of the second one.
fn source_span(dst: u32, dst_len: u32, src_len: u32) -> (u32, u32, f32) {
    let max = (src_len - 1) as f32;
    let pos = ((dst as f32 + 0.5) * src_len as f32 / dst_len as f32 - 0.5).clamp(0.0, max);
    let first = libm::floorf(pos);
    let i0 = first as u32;
    (i0, (i0 + 1).min(src_len - 1), pos - first)
}

fn lerp(a: Rgb888, b: Rgb888, t: f32) -> [f32; 3] {
    lerp_channels(
        [a.r() as f32, a.g() as f32, a.b() as f32],
        [b.r() as f32, b.g() as f32, b.b() as f32],
        t,
    )
}

fn lerp_channels(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn to_color<C: From<Rgb888>>(c: [f32; 3]) -> C {
    Rgb888::new(
        libm::roundf(c[0]) as u8,
        libm::roundf(c[1]) as u8,
        libm::roundf(c[2]) as u8,
    )
    .into()
}

impl<C: PixelColor> OriginDimensions for Bitmap<C> {
    fn size(&self) -> Size {
        self.size
    }
}

impl<C: PixelColor> DrawTarget for Bitmap<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}

impl<C: PixelColor> ImageDrawable for Bitmap<C> {
    type Color = C;

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        target.fill_contiguous(&self.bounding_box(), self.pixels.iter().copied())
    }

    fn draw_sub_image<D>(&self, target: &mut D, area: &Rectangle) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        self.draw(&mut target.translated(-area.top_left).clipped(area))
    }
}

/// Raw background plus a copy scaled to the current surface.
///
/// The copy is only regenerated when the requested size differs from the
/// cached one.
#[derive(Debug, Clone)]
pub struct BackgroundScaler<C> {
    raw: Bitmap<C>,
    scaled: Option<Bitmap<C>>,
    filter: ScaleFilter,
    rescales: u32,
}

impl<C> BackgroundScaler<C>
where
    C: PixelColor + From<Rgb888> + Into<Rgb888>,
{
    pub fn new(raw: Bitmap<C>, filter: ScaleFilter) -> Result<Self, Error> {
        if raw.is_empty() {
            return Err(Error::MissingBackground);
        }
        Ok(Self {
            raw,
            scaled: None,
            filter,
            rescales: 0,
        })
    }

    /// Background sized to `size`, rescaled only if the cached copy differs.
    pub fn ensure_scaled(&mut self, size: Size) -> &Bitmap<C> {
        if !self.is_cached(size) {
            self.scaled = None;
        }

        let (raw, filter, rescales) = (&self.raw, self.filter, &mut self.rescales);
        self.scaled.get_or_insert_with(|| {
            debug!("Scaling background to {}x{}", size.width, size.height);
            *rescales += 1;
            raw.scaled(size, filter)
        })
    }

    pub fn is_cached(&self, size: Size) -> bool {
        self.scaled.as_ref().map(OriginDimensions::size) == Some(size)
    }

    pub fn cached(&self) -> Option<&Bitmap<C>> {
        self.scaled.as_ref()
    }

    /// Number of times the background has been resized.
    pub fn rescale_count(&self) -> u32 {
        self.rescales
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::{
        image::ImageRawBE,
        pixelcolor::{Rgb565, RgbColor},
    };

    use super::*;

    fn checker() -> Bitmap<Rgb888> {
        Bitmap::from_pixels(
            Size::new(2, 2),
            alloc::vec![Rgb888::BLACK, Rgb888::WHITE, Rgb888::WHITE, Rgb888::BLACK],
        )
        .unwrap()
    }

    #[test]
    fn empty_background_is_rejected() {
        assert_eq!(
            Bitmap::<Rgb888>::from_pixels(Size::zero(), Vec::new()),
            Err(Error::MissingBackground)
        );
        assert_eq!(
            Bitmap::from_pixels(Size::new(2, 2), alloc::vec![Rgb888::BLACK]),
            Err(Error::MissingBackground)
        );

        let empty = Bitmap::new(Size::zero(), Rgb888::BLACK);
        assert!(BackgroundScaler::new(empty, ScaleFilter::Nearest).is_err());
    }

    #[test]
    fn loads_raw_image() {
        // Two big endian Rgb565 pixels: red, blue
        let data = [0xF8, 0x00, 0x00, 0x1F];
        let raw = ImageRawBE::<Rgb565>::new(&data, 2);
        let bitmap = Bitmap::from_image(&raw, Rgb565::BLACK).unwrap();

        assert_eq!(bitmap.size(), Size::new(2, 1));
        assert_eq!(bitmap.pixel(Point::new(0, 0)), Some(Rgb565::RED));
        assert_eq!(bitmap.pixel(Point::new(1, 0)), Some(Rgb565::BLUE));
        assert_eq!(bitmap.pixel(Point::new(2, 0)), None);
        assert_eq!(bitmap.pixel(Point::new(-1, 0)), None);
    }

    #[test]
    fn nearest_upscale_repeats_pixels() {
        let scaled = checker().scaled(Size::new(4, 4), ScaleFilter::Nearest);
        assert_eq!(scaled.size(), Size::new(4, 4));
        assert_eq!(scaled.pixel(Point::new(1, 1)), Some(Rgb888::BLACK));
        assert_eq!(scaled.pixel(Point::new(2, 1)), Some(Rgb888::WHITE));
        assert_eq!(scaled.pixel(Point::new(3, 3)), Some(Rgb888::BLACK));
    }

    #[test]
    fn bilinear_blends_neighbours() {
        let pixels = alloc::vec![Rgb888::BLACK, Rgb888::WHITE];
        let raw = Bitmap::from_pixels(Size::new(2, 1), pixels).unwrap();
        let scaled = raw.scaled(Size::new(3, 1), ScaleFilter::Bilinear);

        assert_eq!(scaled.pixel(Point::new(0, 0)), Some(Rgb888::BLACK));
        assert_eq!(scaled.pixel(Point::new(1, 0)), Some(Rgb888::new(128, 128, 128)));
        assert_eq!(scaled.pixel(Point::new(2, 0)), Some(Rgb888::WHITE));
    }

    #[test]
    fn same_size_reuses_cached_copy() {
        let mut background = BackgroundScaler::new(checker(), ScaleFilter::Bilinear).unwrap();
        assert!(background.cached().is_none());

        let first = background.ensure_scaled(Size::new(8, 8)).pixels().as_ptr();
        let second = background.ensure_scaled(Size::new(8, 8)).pixels().as_ptr();
        assert_eq!(first, second);
        assert_eq!(background.rescale_count(), 1);
        assert!(background.is_cached(Size::new(8, 8)));
    }

    #[test]
    fn new_size_rescales() {
        let mut background = BackgroundScaler::new(checker(), ScaleFilter::Nearest).unwrap();
        background.ensure_scaled(Size::new(8, 8));

        let resized = background.ensure_scaled(Size::new(6, 4));
        assert_eq!(resized.size(), Size::new(6, 4));
        assert_eq!(resized.pixels().len(), 24);
        assert_eq!(background.rescale_count(), 2);
        assert!(!background.is_cached(Size::new(8, 8)));
    }

    #[test]
    fn blit_onto_larger_target() {
        let mut target = Bitmap::new(Size::new(3, 3), Rgb888::BLACK);
        checker().draw(&mut target).unwrap();

        assert_eq!(target.pixel(Point::new(1, 0)), Some(Rgb888::WHITE));
        assert_eq!(target.pixel(Point::new(2, 2)), Some(Rgb888::BLACK));
    }
}
