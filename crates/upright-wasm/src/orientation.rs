//! WASM bindings for orientation normalization.
//!
//! # Functions
//!
//! - [`normalize_orientation`] - Rewrite a bitmap upright given its EXIF orientation
//! - [`decode_upright`] - Decode JPEG/PNG bytes straight to upright pixels
//! - [`get_orientation`] - Read the EXIF orientation value from image bytes
//! - [`describe_orientation`] - Summarize stored and upright dimensions
//!
//! # Example
//!
//! ```typescript
//! import { decode_upright, get_orientation } from '@upright/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! console.log(`EXIF orientation: ${get_orientation(bytes)}`);
//! const image = decode_upright(bytes);
//! console.log(`Upright ${image.width}x${image.height}`);
//! ```

use serde::Serialize;
use upright_core::decode;
use upright_core::{normalize, Orientation, OrientedImage};
use wasm_bindgen::prelude::*;

use crate::types::JsBitmap;

/// Rewrite an image so its pixels are stored upright.
///
/// # Arguments
///
/// * `image` - Source image in stored pixel order
/// * `exif_orientation` - EXIF orientation value (1-8)
///
/// # Returns
///
/// A new `JsBitmap` with upright pixels. Width and height are swapped for
/// orientations 5-8.
///
/// # Errors
///
/// Returns an error if the orientation value is outside 1-8, the channel
/// count is unsupported, or the pixel buffer doesn't match the dimensions.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const upright = normalize_orientation(image, 6);
/// ```
#[wasm_bindgen]
pub fn normalize_orientation(
    image: &JsBitmap,
    exif_orientation: u32,
) -> Result<JsBitmap, JsValue> {
    let orientation =
        Orientation::try_from(exif_orientation).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let bitmap = image.to_bitmap().map_err(|e| JsValue::from_str(&e))?;

    let upright = normalize(bitmap, orientation).map_err(|e| JsValue::from_str(&e.to_string()))?;
    JsBitmap::from_bitmap(upright).map_err(|e| JsValue::from_str(&e))
}

/// Decode JPEG or PNG bytes and apply their EXIF orientation.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or are corrupted.
#[wasm_bindgen]
pub fn decode_upright(bytes: &[u8]) -> Result<JsBitmap, JsValue> {
    let bitmap = decode::decode_upright(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    JsBitmap::from_bitmap(bitmap).map_err(|e| JsValue::from_str(&e))
}

/// Read the EXIF orientation value (1-8) from image bytes.
///
/// Returns 1 when the bytes carry no usable orientation.
#[wasm_bindgen]
pub fn get_orientation(bytes: &[u8]) -> u32 {
    decode::get_orientation(bytes).exif_value()
}

/// Summarize the orientation of encoded image bytes.
///
/// Returns a plain object:
/// `{ exifValue, orientation, width, height, uprightWidth, uprightHeight, swapsDimensions }`.
#[wasm_bindgen]
pub fn describe_orientation(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let image = decode::decode_oriented(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let summary = OrientationSummary::from_image(&image);
    serde_wasm_bindgen::to_value(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Orientation details returned to JavaScript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrientationSummary {
    exif_value: u32,
    orientation: Orientation,
    width: u32,
    height: u32,
    upright_width: u32,
    upright_height: u32,
    swaps_dimensions: bool,
}

impl OrientationSummary {
    fn from_image(image: &OrientedImage) -> Self {
        let (upright_width, upright_height) = image.size();
        Self {
            exif_value: image.orientation.exif_value(),
            orientation: image.orientation,
            width: image.bitmap.width,
            height: image.bitmap.height,
            upright_width,
            upright_height,
            swaps_dimensions: image.orientation.swaps_dimensions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upright_core::{Bitmap, PixelFormat};

    fn indexed_image(width: u32, height: u32) -> JsBitmap {
        let pixels: Vec<u8> = (0..width * height).map(|i| i as u8).collect();
        JsBitmap::new(width, height, 1, pixels)
    }

    #[test]
    fn test_normalize_up_keeps_pixels() {
        let img = indexed_image(3, 2);
        let result = normalize_orientation(&img, 1).unwrap();
        assert_eq!(result.width(), 3);
        assert_eq!(result.height(), 2);
        assert_eq!(result.pixels(), img.pixels());
    }

    #[test]
    fn test_normalize_rotate_90() {
        let img = indexed_image(3, 1);
        let result = normalize_orientation(&img, 6).unwrap();
        assert_eq!(result.width(), 1);
        assert_eq!(result.height(), 3);
        assert_eq!(result.pixels(), vec![0, 1, 2]);
    }

    #[test]
    fn test_normalize_rotate_180() {
        let img = indexed_image(2, 2);
        let result = normalize_orientation(&img, 3).unwrap();
        assert_eq!(result.pixels(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_normalize_output_length_is_independent_of_orientation() {
        // Two trailing bytes that don't belong to the 2x1 image
        let img = JsBitmap::new(2, 1, 1, vec![1, 2, 99, 99]);

        let up = normalize_orientation(&img, 1).unwrap();
        assert_eq!(up.byte_length(), 2);
        assert_eq!(up.pixels(), vec![1, 2]);

        let down = normalize_orientation(&img, 3).unwrap();
        assert_eq!(down.byte_length(), 2);
        assert_eq!(down.pixels(), vec![2, 1]);
    }

    #[test]
    fn test_normalize_keeps_channels() {
        let img = JsBitmap::new(2, 1, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let result = normalize_orientation(&img, 2).unwrap();
        assert_eq!(result.channels(), 4);
        assert_eq!(result.pixels(), vec![5, 6, 7, 8, 1, 2, 3, 4]);
    }

    #[test]
    fn test_get_orientation_without_exif() {
        assert_eq!(get_orientation(&[0x00, 0x01, 0x02]), 1);
    }

    #[test]
    fn test_orientation_summary() {
        let bitmap = Bitmap::new(6, 4, PixelFormat::Rgb8, vec![0u8; 72]);
        let image = OrientedImage::new(bitmap, Orientation::Left);
        let summary = OrientationSummary::from_image(&image);

        assert_eq!(summary.exif_value, 8);
        assert_eq!((summary.width, summary.height), (6, 4));
        assert_eq!((summary.upright_width, summary.upright_height), (4, 6));
        assert!(summary.swaps_dimensions);
    }
}
