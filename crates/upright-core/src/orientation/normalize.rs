//! The orientation normalizer.
//!
//! # Algorithm
//!
//! The composed transform maps user space (where the source is drawn into
//! the rectangle `(0, 0, raw_w, raw_h)`) onto the upright canvas. Drawing
//! uses inverse mapping: each destination pixel centre is mapped back into
//! user space and the source pixel covering that point is copied. Quarter
//! turns and flips send pixel centres to pixel centres, so every output
//! pixel is an exact copy of one input pixel.

use std::f64::consts::{FRAC_PI_2, PI};

use log::debug;

use super::{AffineTransform, Orientation, OrientationError};
use crate::bitmap::{Bitmap, ColorSpace, PixelFormat};

/// Rewrite `source` so that its pixels are stored upright.
///
/// The result has the visually upright dimensions: width and height are
/// swapped for `Left`, `Right`, `LeftMirrored` and `RightMirrored`. Its rows
/// are tightly packed, in the source's pixel format and color space.
///
/// `Up` returns `source` itself without copying.
///
/// # Errors
///
/// - `OrientationError::InvalidBitmap` if a dimension is zero or the buffer
///   doesn't match the declared geometry.
/// - `OrientationError::UnsupportedPixelFormat` if the canvas can't be
///   allocated in the source's color space.
/// - `OrientationError::ResampleFailure` if the destination buffer can't be
///   produced.
pub fn normalize(source: Bitmap, orientation: Orientation) -> Result<Bitmap, OrientationError> {
    source.validate()?;

    if orientation == Orientation::Up {
        return Ok(source);
    }

    let (width, height) = upright_dimensions(source.width, source.height, orientation);
    let transform = upright_transform(orientation, width as f64, height as f64);

    let mut canvas = allocate_canvas(width, height, source.format, source.color_space)?;

    // The source always fills the rectangle of its own buffer size, which for
    // the quarter turns is the upright canvas with its sides swapped.
    let (rect_w, rect_h) = if orientation.swaps_dimensions() {
        (height, width)
    } else {
        (width, height)
    };
    draw(&mut canvas, &source, transform, rect_w, rect_h)?;

    debug!(
        "normalized {:?} {}x{} {:?} to {}x{}",
        orientation, source.width, source.height, source.format, width, height
    );

    Ok(canvas)
}

/// Dimensions of the upright image for a buffer of `width` x `height`.
pub fn upright_dimensions(width: u32, height: u32, orientation: Orientation) -> (u32, u32) {
    if orientation.swaps_dimensions() {
        (height, width)
    } else {
        (width, height)
    }
}

/// Build the transform that places a buffer tagged `orientation` upright on
/// a `width` x `height` canvas (upright dimensions, y-up).
pub fn upright_transform(orientation: Orientation, width: f64, height: f64) -> AffineTransform {
    let mut transform = AffineTransform::IDENTITY;

    match orientation {
        Orientation::Down | Orientation::DownMirrored => {
            transform = transform.translated(width, height).rotated(PI);
        }
        Orientation::Left | Orientation::LeftMirrored => {
            transform = transform.translated(width, 0.0).rotated(FRAC_PI_2);
        }
        Orientation::Right | Orientation::RightMirrored => {
            transform = transform.translated(0.0, height).rotated(-FRAC_PI_2);
        }
        Orientation::Up | Orientation::UpMirrored => {}
    }

    if orientation.is_mirrored() {
        // The mirror axis of a quarter-turned buffer is its own width, which
        // is the upright height.
        let axis = if orientation.swaps_dimensions() {
            height
        } else {
            width
        };
        transform = transform.translated(axis, 0.0).scaled(-1.0, 1.0);
    }

    transform
}

fn allocate_canvas(
    width: u32,
    height: u32,
    format: PixelFormat,
    color_space: ColorSpace,
) -> Result<Bitmap, OrientationError> {
    if !color_space.supports(format) {
        return Err(OrientationError::UnsupportedPixelFormat(format!(
            "{:?} ({}-bit, {} channels) in {:?}",
            format,
            format.bit_depth(),
            format.channels(),
            color_space
        )));
    }

    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(format.bytes_per_pixel()))
        .ok_or_else(|| {
            OrientationError::ResampleFailure(format!(
                "{}x{} canvas size overflows usize",
                width, height
            ))
        })?;

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|e| OrientationError::ResampleFailure(e.to_string()))?;
    pixels.resize(len, 0);

    Ok(Bitmap::new(width, height, format, pixels).with_color_space(color_space))
}

/// Draw `source` into the rectangle `(0, 0, rect_w, rect_h)` of user space,
/// with `transform` mapping user space onto `canvas`.
fn draw(
    canvas: &mut Bitmap,
    source: &Bitmap,
    transform: AffineTransform,
    rect_w: u32,
    rect_h: u32,
) -> Result<(), OrientationError> {
    let inverse = transform.inverted().ok_or_else(|| {
        OrientationError::ResampleFailure("orientation transform is not invertible".to_string())
    })?;

    let bpp = source.format.bytes_per_pixel();
    let row_bytes = canvas.row_bytes();
    let canvas_h = canvas.height as f64;
    let x_scale = source.width as f64 / rect_w as f64;
    let y_scale = source.height as f64 / rect_h as f64;

    for (row, dst_row) in canvas.pixels.chunks_exact_mut(row_bytes).enumerate() {
        // Canvas rows run top-down while the transform is y-up
        let y = canvas_h - row as f64 - 0.5;

        for (col, dst_px) in dst_row.chunks_exact_mut(bpp).enumerate() {
            let x = col as f64 + 0.5;
            let (ux, uy) = inverse.apply(x, y);

            let src_x = sample_index(ux * x_scale, source.width);
            let src_y = source.height - 1 - sample_index(uy * y_scale, source.height);

            let start = src_x as usize * bpp;
            dst_px.copy_from_slice(&source.row(src_y)[start..start + bpp]);
        }
    }

    Ok(())
}

/// Index of the sample covering coordinate `v` along an axis of `len` samples.
#[inline]
fn sample_index(v: f64, len: u32) -> u32 {
    (v.floor().max(0.0) as u32).min(len - 1)
}
