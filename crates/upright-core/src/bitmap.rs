//! Raster bitmap types shared by the normalizer and the decoders.
//!
//! A [`Bitmap`] owns a row-major byte buffer. Rows may carry trailing padding
//! (`stride > width * bytes_per_pixel`), which is how strided buffers handed
//! over by a host toolkit are represented. Multi-byte samples (16-bit and
//! float formats) are stored in native byte order, matching the layout of the
//! `image` crate's buffers.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::orientation::OrientationError;

/// Channel layout and bit depth of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit luminance.
    Gray8,
    /// 8-bit luminance with alpha.
    GrayAlpha8,
    /// 8-bit RGB.
    Rgb8,
    /// 8-bit RGBA.
    Rgba8,
    /// 16-bit luminance.
    Gray16,
    /// 16-bit luminance with alpha.
    GrayAlpha16,
    /// 16-bit RGB.
    Rgb16,
    /// 16-bit RGBA.
    Rgba16,
    /// 32-bit float RGB.
    Rgb32F,
    /// 32-bit float RGBA.
    Rgba32F,
}

impl PixelFormat {
    /// Number of channels per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray8 | PixelFormat::Gray16 => 1,
            PixelFormat::GrayAlpha8 | PixelFormat::GrayAlpha16 => 2,
            PixelFormat::Rgb8 | PixelFormat::Rgb16 | PixelFormat::Rgb32F => 3,
            PixelFormat::Rgba8 | PixelFormat::Rgba16 | PixelFormat::Rgba32F => 4,
        }
    }

    /// Number of bytes in a single channel sample.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            PixelFormat::Gray8
            | PixelFormat::GrayAlpha8
            | PixelFormat::Rgb8
            | PixelFormat::Rgba8 => 1,
            PixelFormat::Gray16
            | PixelFormat::GrayAlpha16
            | PixelFormat::Rgb16
            | PixelFormat::Rgba16 => 2,
            PixelFormat::Rgb32F | PixelFormat::Rgba32F => 4,
        }
    }

    /// Number of bytes in one pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        self.channels() * self.bytes_per_sample()
    }

    /// Bits per channel sample.
    pub fn bit_depth(self) -> u8 {
        (self.bytes_per_sample() * 8) as u8
    }

    /// Returns true for luminance formats (with or without alpha).
    pub fn is_gray(self) -> bool {
        self.channels() <= 2
    }

    /// The color space a freshly decoded buffer of this format is assumed to be in.
    pub fn default_color_space(self) -> ColorSpace {
        if self.is_gray() {
            ColorSpace::Gray
        } else {
            ColorSpace::Srgb
        }
    }
}

/// Color space the pixel values are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    #[default]
    Srgb,
    LinearSrgb,
    DisplayP3,
    Gray,
}

impl ColorSpace {
    /// Whether a canvas in this color space can hold pixels of `format`.
    pub fn supports(self, format: PixelFormat) -> bool {
        match self {
            ColorSpace::Gray => format.is_gray(),
            ColorSpace::Srgb | ColorSpace::LinearSrgb | ColorSpace::DisplayP3 => !format.is_gray(),
        }
    }
}

/// A decoded raster image.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Channel layout and bit depth.
    pub format: PixelFormat,
    /// Color space of the pixel values.
    pub color_space: ColorSpace,
    /// Distance in bytes between the starts of consecutive rows.
    pub stride: usize,
    /// Pixel data in row-major order.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a tightly packed bitmap in the format's default color space.
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            color_space: format.default_color_space(),
            // Saturates on 32-bit targets; `validate` rejects the result
            stride: (width as usize).saturating_mul(format.bytes_per_pixel()),
            pixels,
        }
    }

    /// Create a bitmap whose rows are `stride` bytes apart.
    pub fn with_stride(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        pixels: Vec<u8>,
    ) -> Self {
        Self {
            stride,
            ..Self::new(width, height, format, pixels)
        }
    }

    /// Replace the color space tag without touching the pixels.
    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    /// Number of meaningful bytes in one row (excluding padding).
    ///
    /// Saturates at `usize::MAX` when the row doesn't fit in memory.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        (self.width as usize).saturating_mul(self.format.bytes_per_pixel())
    }

    /// Returns true if the rows carry no padding.
    pub fn is_packed(&self) -> bool {
        self.stride == self.row_bytes()
    }

    /// Check that the buffer is large enough for the declared geometry.
    ///
    /// # Errors
    ///
    /// Returns `OrientationError::InvalidBitmap` if either dimension is zero,
    /// the stride is shorter than a row, or the buffer is too short.
    pub fn validate(&self) -> Result<(), OrientationError> {
        if self.width == 0 || self.height == 0 {
            return Err(OrientationError::InvalidBitmap(format!(
                "dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        let row_bytes = (self.width as usize)
            .checked_mul(self.format.bytes_per_pixel())
            .ok_or_else(|| {
                OrientationError::InvalidBitmap(format!(
                    "a row of {} {:?} pixels overflows usize",
                    self.width, self.format
                ))
            })?;
        if self.stride < row_bytes {
            return Err(OrientationError::InvalidBitmap(format!(
                "stride {} is shorter than a row of {} bytes",
                self.stride, row_bytes
            )));
        }

        let required = self
            .stride
            .checked_mul(self.height as usize - 1)
            .and_then(|n| n.checked_add(row_bytes))
            .ok_or_else(|| {
                OrientationError::InvalidBitmap("buffer size overflows usize".to_string())
            })?;
        if self.pixels.len() < required {
            return Err(OrientationError::InvalidBitmap(format!(
                "expected at least {} bytes of pixel data, got {}",
                required,
                self.pixels.len()
            )));
        }

        Ok(())
    }

    /// Bytes of row `y`, excluding padding.
    ///
    /// Callers must have validated the bitmap and pass `y < height`.
    #[inline]
    pub(crate) fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.pixels[start..start + self.row_bytes()]
    }

    /// Bytes of the pixel at (`x`, `y`), or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let start = (y as usize)
            .checked_mul(self.stride)?
            .checked_add((x as usize).checked_mul(bpp)?)?;
        self.pixels.get(start..start.checked_add(bpp)?)
    }

    /// Pixel data with row padding removed.
    ///
    /// # Errors
    ///
    /// Returns `OrientationError::InvalidBitmap` if the buffer does not match
    /// the declared geometry.
    pub fn packed_pixels(&self) -> Result<Vec<u8>, OrientationError> {
        self.validate()?;
        let len = self.row_bytes() * self.height as usize;
        if self.is_packed() {
            return Ok(self.pixels[..len].to_vec());
        }
        let mut packed = Vec::with_capacity(len);
        for y in 0..self.height {
            packed.extend_from_slice(self.row(y));
        }
        Ok(packed)
    }

    /// Consume the bitmap and return it with rows packed and the buffer cut
    /// to exactly `row_bytes * height` bytes.
    ///
    /// A bitmap that is already in that shape is returned without copying.
    ///
    /// # Errors
    ///
    /// Returns `OrientationError::InvalidBitmap` if the buffer does not match
    /// the declared geometry.
    pub fn into_packed(mut self) -> Result<Bitmap, OrientationError> {
        self.validate()?;
        if self.is_packed() {
            self.pixels.truncate(self.row_bytes() * self.height as usize);
            return Ok(self);
        }
        let pixels = self.packed_pixels()?;
        Ok(Bitmap::new(self.width, self.height, self.format, pixels)
            .with_color_space(self.color_space))
    }

    /// Create a bitmap from an `image::DynamicImage`.
    ///
    /// # Errors
    ///
    /// Returns `OrientationError::UnsupportedPixelFormat` for color types
    /// without a matching [`PixelFormat`].
    pub fn from_dynamic_image(img: DynamicImage) -> Result<Self, OrientationError> {
        let (width, height) = (img.width(), img.height());
        let format = match &img {
            DynamicImage::ImageLuma8(_) => PixelFormat::Gray8,
            DynamicImage::ImageLumaA8(_) => PixelFormat::GrayAlpha8,
            DynamicImage::ImageRgb8(_) => PixelFormat::Rgb8,
            DynamicImage::ImageRgba8(_) => PixelFormat::Rgba8,
            DynamicImage::ImageLuma16(_) => PixelFormat::Gray16,
            DynamicImage::ImageLumaA16(_) => PixelFormat::GrayAlpha16,
            DynamicImage::ImageRgb16(_) => PixelFormat::Rgb16,
            DynamicImage::ImageRgba16(_) => PixelFormat::Rgba16,
            DynamicImage::ImageRgb32F(_) => PixelFormat::Rgb32F,
            DynamicImage::ImageRgba32F(_) => PixelFormat::Rgba32F,
            other => {
                return Err(OrientationError::UnsupportedPixelFormat(format!(
                    "{:?}",
                    other.color()
                )))
            }
        };
        // 8-bit buffers are taken over as-is; wider samples are copied out as bytes
        let pixels = match img {
            DynamicImage::ImageLuma8(buf) => buf.into_raw(),
            DynamicImage::ImageLumaA8(buf) => buf.into_raw(),
            DynamicImage::ImageRgb8(buf) => buf.into_raw(),
            DynamicImage::ImageRgba8(buf) => buf.into_raw(),
            other => other.as_bytes().to_vec(),
        };
        Ok(Self::new(width, height, format, pixels))
    }

    /// Convert to an `image::DynamicImage` for encoding or further processing.
    ///
    /// # Errors
    ///
    /// Returns `OrientationError::InvalidBitmap` if the buffer does not match
    /// the declared geometry.
    pub fn to_dynamic_image(&self) -> Result<DynamicImage, OrientationError> {
        let (w, h) = (self.width, self.height);
        let bytes = self.packed_pixels()?;

        let img = match self.format {
            PixelFormat::Gray8 => {
                image::GrayImage::from_raw(w, h, bytes).map(DynamicImage::ImageLuma8)
            }
            PixelFormat::GrayAlpha8 => {
                image::GrayAlphaImage::from_raw(w, h, bytes).map(DynamicImage::ImageLumaA8)
            }
            PixelFormat::Rgb8 => {
                image::RgbImage::from_raw(w, h, bytes).map(DynamicImage::ImageRgb8)
            }
            PixelFormat::Rgba8 => {
                image::RgbaImage::from_raw(w, h, bytes).map(DynamicImage::ImageRgba8)
            }
            PixelFormat::Gray16 => {
                image::ImageBuffer::<image::Luma<u16>, _>::from_raw(w, h, samples_u16(&bytes))
                    .map(DynamicImage::ImageLuma16)
            }
            PixelFormat::GrayAlpha16 => {
                image::ImageBuffer::<image::LumaA<u16>, _>::from_raw(w, h, samples_u16(&bytes))
                    .map(DynamicImage::ImageLumaA16)
            }
            PixelFormat::Rgb16 => {
                image::ImageBuffer::<image::Rgb<u16>, _>::from_raw(w, h, samples_u16(&bytes))
                    .map(DynamicImage::ImageRgb16)
            }
            PixelFormat::Rgba16 => {
                image::ImageBuffer::<image::Rgba<u16>, _>::from_raw(w, h, samples_u16(&bytes))
                    .map(DynamicImage::ImageRgba16)
            }
            PixelFormat::Rgb32F => image::Rgb32FImage::from_raw(w, h, samples_f32(&bytes))
                .map(DynamicImage::ImageRgb32F),
            PixelFormat::Rgba32F => image::Rgba32FImage::from_raw(w, h, samples_f32(&bytes))
                .map(DynamicImage::ImageRgba32F),
        };

        img.ok_or_else(|| {
            OrientationError::InvalidBitmap(format!(
                "pixel buffer does not match {}x{} {:?}",
                w, h, self.format
            ))
        })
    }

    /// Convert to the 8-bit format with the same channel layout.
    ///
    /// 8-bit bitmaps are returned packed; wider samples are scaled down.
    ///
    /// # Errors
    ///
    /// Returns `OrientationError::InvalidBitmap` if the buffer does not match
    /// the declared geometry.
    pub fn to_eight_bit(&self) -> Result<Bitmap, OrientationError> {
        let img = self.to_dynamic_image()?;
        let (format, pixels) = match self.format.channels() {
            1 => (PixelFormat::Gray8, img.into_luma8().into_raw()),
            2 => (PixelFormat::GrayAlpha8, img.into_luma_alpha8().into_raw()),
            3 => (PixelFormat::Rgb8, img.into_rgb8().into_raw()),
            _ => (PixelFormat::Rgba8, img.into_rgba8().into_raw()),
        };
        Ok(Bitmap::new(self.width, self.height, format, pixels).with_color_space(self.color_space))
    }
}

fn samples_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_ne_bytes([c[0], c[1]]))
        .collect()
}

fn samples_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
