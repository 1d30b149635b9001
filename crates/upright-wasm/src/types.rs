//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core bitmap
//! type, handling the conversion between Rust and JavaScript data
//! representations.

use upright_core::{Bitmap, PixelFormat};
use wasm_bindgen::prelude::*;

/// An 8-bit bitmap wrapper for JavaScript.
///
/// Pixels are row-major with `channels` bytes per pixel: 1 = gray,
/// 2 = gray + alpha, 3 = RGB, 4 = RGBA (the layout of canvas `ImageData`).
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsBitmap {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a new JsBitmap from dimensions, channel count and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `channels` - Bytes per pixel (1-4)
    /// * `pixels` - Pixel data (row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> JsBitmap {
        JsBitmap {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes per pixel
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl JsBitmap {
    /// Create a JsBitmap from a core Bitmap, converting to 8 bits per sample.
    ///
    /// The pixel buffer always holds exactly `width * height * channels`
    /// bytes; row padding and trailing bytes are dropped.
    pub(crate) fn from_bitmap(bitmap: Bitmap) -> Result<Self, String> {
        let bitmap = match bitmap.format {
            PixelFormat::Gray8
            | PixelFormat::GrayAlpha8
            | PixelFormat::Rgb8
            | PixelFormat::Rgba8 => bitmap.into_packed(),
            _ => bitmap.to_eight_bit(),
        }
        .map_err(|e| e.to_string())?;

        Ok(Self {
            width: bitmap.width,
            height: bitmap.height,
            channels: bitmap.format.channels() as u8,
            pixels: bitmap.pixels,
        })
    }

    /// Convert to a core Bitmap.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_bitmap(&self) -> Result<Bitmap, String> {
        let format = format_from_channels(self.channels)?;
        Ok(Bitmap::new(self.width, self.height, format, self.pixels.clone()))
    }
}

/// Map a channel count to the matching 8-bit pixel format.
pub(crate) fn format_from_channels(channels: u8) -> Result<PixelFormat, String> {
    match channels {
        1 => Ok(PixelFormat::Gray8),
        2 => Ok(PixelFormat::GrayAlpha8),
        3 => Ok(PixelFormat::Rgb8),
        4 => Ok(PixelFormat::Rgba8),
        other => Err(format!("Unsupported channel count: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_bitmap_creation() {
        let img = JsBitmap::new(100, 50, 4, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.channels(), 4);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_js_bitmap_pixels() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8]; // 2 RGB pixels
        let img = JsBitmap::new(2, 1, 3, pixels.clone());
        assert_eq!(img.pixels(), pixels);
    }

    #[test]
    fn test_to_bitmap() {
        let img = JsBitmap::new(2, 1, 2, vec![1, 2, 3, 4]);
        let bitmap = img.to_bitmap().unwrap();
        assert_eq!(bitmap.format, PixelFormat::GrayAlpha8);
        assert_eq!(bitmap.pixels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_to_bitmap_rejects_bad_channels() {
        let img = JsBitmap::new(1, 1, 5, vec![0u8; 5]);
        assert!(img.to_bitmap().is_err());
    }

    #[test]
    fn test_from_bitmap_converts_sixteen_bit() {
        let samples: Vec<u8> = [65535u16, 0, 0].iter().flat_map(|s| s.to_ne_bytes()).collect();
        let bitmap = Bitmap::new(1, 1, PixelFormat::Rgb16, samples);
        let js = JsBitmap::from_bitmap(bitmap).unwrap();
        assert_eq!(js.channels(), 3);
        assert_eq!(js.pixels(), vec![255, 0, 0]);
    }

    #[test]
    fn test_from_bitmap_repacks_strided_rows() {
        let bitmap = Bitmap::with_stride(1, 2, PixelFormat::Gray8, 2, vec![7, 0, 9, 0]);
        let js = JsBitmap::from_bitmap(bitmap).unwrap();
        assert_eq!(js.pixels(), vec![7, 9]);
    }

    #[test]
    fn test_from_bitmap_drops_trailing_bytes() {
        let bitmap = Bitmap::new(2, 1, PixelFormat::Gray8, vec![1, 2, 99, 99]);
        let js = JsBitmap::from_bitmap(bitmap).unwrap();
        assert_eq!(js.byte_length(), 2);
        assert_eq!(js.pixels(), vec![1, 2]);
    }

    #[test]
    fn test_from_bitmap_rejects_short_buffer() {
        let bitmap = Bitmap::new(2, 2, PixelFormat::Rgb8, vec![0u8; 6]);
        assert!(JsBitmap::from_bitmap(bitmap).is_err());
    }

    #[test]
    fn test_format_from_channels() {
        assert_eq!(format_from_channels(1), Ok(PixelFormat::Gray8));
        assert_eq!(format_from_channels(4), Ok(PixelFormat::Rgba8));
        assert!(format_from_channels(0).is_err());
    }
}
