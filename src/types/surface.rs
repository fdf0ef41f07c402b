//! Owned RGBA pixel buffers.
//!
//! Every stage of the pipeline works on a [`PixelSurface`]: an exclusively
//! owned, row-major RGBA buffer. The [`ImageSurface`] trait is the narrow
//! read/write capability the per-pixel algorithms need, so they can run on
//! any buffer that provides it (an [`image::RgbaImage`] works directly).

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba as ImageRgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StickerError};

use super::colour::{Colour, Rgba};
use super::geometry::{BoundsAccumulator, CellRect, OpaqueBounds};

/// Pixel read/write access to a rectangular surface.
///
/// `read` and `write` expect in-bounds coordinates; callers iterate within
/// `width()` x `height()`.
pub trait ImageSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn read(&self, x: u32, y: u32) -> Rgba;
    fn write(&mut self, x: u32, y: u32, px: Rgba);

    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Alpha of the pixel at (x, y).
    fn alpha(&self, x: u32, y: u32) -> u8 {
        self.read(x, y)[3]
    }
}

impl ImageSurface for RgbaImage {
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn read(&self, x: u32, y: u32) -> Rgba {
        self.get_pixel(x, y).0
    }

    fn write(&mut self, x: u32, y: u32, px: Rgba) {
        self.put_pixel(x, y, ImageRgba(px));
    }
}

/// Find the opaque bounds of `region` within `surface`.
///
/// A pixel counts when its alpha is strictly greater than `threshold`.
/// Returned coordinates are relative to the region's origin.
pub fn opaque_bounds_in<S: ImageSurface + ?Sized>(
    surface: &S,
    region: CellRect,
    threshold: u8,
) -> Option<OpaqueBounds> {
    let region = region.clip_to(surface.width(), surface.height());
    let mut acc = BoundsAccumulator::default();
    for y in 0..region.height {
        for x in 0..region.width {
            if surface.alpha(region.x + x, region.y + y) > threshold {
                acc.include(x, y);
            }
        }
    }
    acc.finish()
}

/// Resampling kernel used whenever a surface is scaled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    /// Smooth linear filtering, the look of a browser canvas `drawImage`.
    #[default]
    Bilinear,
    CatmullRom,
    Lanczos,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Lanczos => FilterType::Lanczos3,
        }
    }
}

/// An owned RGBA pixel buffer with explicit width and height.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    image: RgbaImage,
}

impl PixelSurface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Create a surface filled with a single colour.
    pub fn filled(width: u32, height: u32, colour: Colour) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, ImageRgba(colour.to_rgba())),
        }
    }

    /// Wrap a raw row-major RGBA byte buffer.
    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        let actual = bytes.len();
        RgbaImage::from_raw(width, height, bytes)
            .map(Self::from_image)
            .ok_or_else(|| {
                StickerError::surface(format!(
                    "{}x{} surface needs {} bytes, buffer has {}",
                    width, height, expected, actual
                ))
            })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Row-major RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.image
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        self.image
            .get_pixel_checked(x, y)
            .map(|px| Colour::from_rgba(px.0))
    }

    /// Set a pixel; out-of-bounds writes are ignored.
    pub fn put(&mut self, x: u32, y: u32, colour: Colour) {
        if let Some(px) = self.image.get_pixel_mut_checked(x, y) {
            *px = ImageRgba(colour.to_rgba());
        }
    }

    /// Fill a rectangle (clipped to the surface) with a colour.
    pub fn fill_rect(&mut self, rect: CellRect, colour: Colour) {
        let rect = rect.clip_to(self.width(), self.height());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.image.put_pixel(x, y, ImageRgba(colour.to_rgba()));
            }
        }
    }

    /// Copy out a sub-rectangle.
    ///
    /// Fails when the rectangle reaches outside the surface.
    pub fn crop(&self, rect: CellRect) -> Result<PixelSurface> {
        if !rect.fits_within(self.width(), self.height()) {
            return Err(StickerError::surface(format!(
                "crop {} outside {}x{} surface",
                rect,
                self.width(),
                self.height()
            )));
        }
        let view = imageops::crop_imm(&self.image, rect.x, rect.y, rect.width, rect.height);
        Ok(Self::from_image(view.to_image()))
    }

    /// Scale to `width` x `height`.
    ///
    /// Colour is filtered premultiplied by alpha, so the RGB left behind in
    /// fully transparent pixels never bleeds into visible edges.
    pub fn resized(&self, width: u32, height: u32, filter: ResampleFilter) -> PixelSurface {
        if (width, height) == self.size() {
            return self.clone();
        }
        if width == 0 || height == 0 || self.width() == 0 || self.height() == 0 {
            return Self::new(width, height);
        }

        if self.image.pixels().all(|px| px[3] == 255) {
            return Self::from_image(imageops::resize(&self.image, width, height, filter.into()));
        }

        let mut premultiplied = self.image.clone();
        for px in premultiplied.pixels_mut() {
            let a = px[3] as u32;
            for c in 0..3 {
                px[c] = ((px[c] as u32 * a + 127) / 255) as u8;
            }
        }

        let mut scaled = imageops::resize(&premultiplied, width, height, filter.into());
        for px in scaled.pixels_mut() {
            let a = px[3] as u32;
            if a == 0 {
                *px = ImageRgba([0, 0, 0, 0]);
                continue;
            }
            for c in 0..3 {
                px[c] = ((px[c] as u32 * 255 + a / 2) / a).min(255) as u8;
            }
        }
        Self::from_image(scaled)
    }

    /// Copy `src` onto this surface with its top-left corner at (x, y).
    ///
    /// Pixels falling outside this surface are clipped.
    pub fn blit(&mut self, src: &PixelSurface, x: i64, y: i64) {
        imageops::replace(&mut self.image, &src.image, x, y);
    }

    /// Opaque bounds over the whole surface.
    pub fn opaque_bounds(&self, threshold: u8) -> Option<OpaqueBounds> {
        let mut acc = BoundsAccumulator::default();
        for (x, y, px) in self.image.enumerate_pixels() {
            if px[3] > threshold {
                acc.include(x, y);
            }
        }
        acc.finish()
    }

    /// True when every pixel has alpha 0.
    pub fn is_fully_transparent(&self) -> bool {
        self.image.pixels().all(|p| p[3] == 0)
    }

    /// Number of pixels with alpha 0.
    pub fn transparent_count(&self) -> usize {
        self.image.pixels().filter(|p| p[3] == 0).count()
    }
}

impl ImageSurface for PixelSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn read(&self, x: u32, y: u32) -> Rgba {
        self.image.get_pixel(x, y).0
    }

    fn write(&mut self, x: u32, y: u32, px: Rgba) {
        self.image.put_pixel(x, y, ImageRgba(px));
    }
}

impl AsRef<PixelSurface> for PixelSurface {
    fn as_ref(&self) -> &PixelSurface {
        self
    }
}

impl From<RgbaImage> for PixelSurface {
    fn from(image: RgbaImage) -> Self {
        Self::from_image(image)
    }
}
