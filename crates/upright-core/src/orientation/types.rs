//! Orientation tags, errors and oriented images.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitmap::Bitmap;

/// Errors that can occur while normalizing an image's orientation.
#[derive(Debug, Error)]
pub enum OrientationError {
    /// Width or height is zero, or the pixel buffer doesn't match the geometry.
    #[error("Invalid bitmap: {0}")]
    InvalidBitmap(String),

    /// A destination canvas can't be allocated in the source's format.
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// The upright pixel buffer couldn't be produced.
    #[error("Resample failed: {0}")]
    ResampleFailure(String),
}

/// An orientation tag value outside the EXIF range 1-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unknown orientation value: {0}")]
pub struct UnknownOrientation(pub u32);

/// How a raw pixel buffer must be reinterpreted to appear upright.
///
/// Names follow the display convention: the tag says where the top of the
/// picture ended up in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Buffer is already upright (EXIF 1).
    #[default]
    Up,
    /// Buffer is rotated 180° (EXIF 3).
    Down,
    /// Buffer is rotated 90°, dimensions swapped (EXIF 8).
    Left,
    /// Buffer is rotated -90°, dimensions swapped (EXIF 6).
    Right,
    /// Horizontal flip (EXIF 2).
    UpMirrored,
    /// Rotated 180° and flipped, i.e. a vertical flip (EXIF 4).
    DownMirrored,
    /// Rotated 90° and flipped, i.e. a transpose (EXIF 5).
    LeftMirrored,
    /// Rotated -90° and flipped, i.e. a transverse (EXIF 7).
    RightMirrored,
}

impl Orientation {
    /// All eight orientations, in EXIF order.
    pub const ALL: [Orientation; 8] = [
        Orientation::Up,
        Orientation::UpMirrored,
        Orientation::Down,
        Orientation::DownMirrored,
        Orientation::LeftMirrored,
        Orientation::Right,
        Orientation::RightMirrored,
        Orientation::Left,
    ];

    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Left
                | Orientation::Right
                | Orientation::LeftMirrored
                | Orientation::RightMirrored
        )
    }

    /// Returns true for the four mirrored variants.
    #[inline]
    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            Orientation::UpMirrored
                | Orientation::DownMirrored
                | Orientation::LeftMirrored
                | Orientation::RightMirrored
        )
    }

    /// The orientation that undoes this one.
    ///
    /// Normalizing with `self` and then with `self.inverse()` restores the
    /// original buffer. Quarter turns invert each other; the 180° turn and
    /// all mirrored variants are their own inverse.
    pub fn inverse(self) -> Self {
        match self {
            Orientation::Left => Orientation::Right,
            Orientation::Right => Orientation::Left,
            other => other,
        }
    }

    /// EXIF `Orientation` tag value (1-8).
    pub fn exif_value(self) -> u32 {
        match self {
            Orientation::Up => 1,
            Orientation::UpMirrored => 2,
            Orientation::Down => 3,
            Orientation::DownMirrored => 4,
            Orientation::LeftMirrored => 5,
            Orientation::Right => 6,
            Orientation::RightMirrored => 7,
            Orientation::Left => 8,
        }
    }
}

impl TryFrom<u32> for Orientation {
    type Error = UnknownOrientation;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Orientation::Up),
            2 => Ok(Orientation::UpMirrored),
            3 => Ok(Orientation::Down),
            4 => Ok(Orientation::DownMirrored),
            5 => Ok(Orientation::LeftMirrored),
            6 => Ok(Orientation::Right),
            7 => Ok(Orientation::RightMirrored),
            8 => Ok(Orientation::Left),
            other => Err(UnknownOrientation(other)),
        }
    }
}

/// A bitmap together with the orientation its pixels are stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedImage {
    /// Raw pixels, in buffer order.
    pub bitmap: Bitmap,
    /// How the buffer must be reinterpreted to appear upright.
    pub orientation: Orientation,
}

impl OrientedImage {
    pub fn new(bitmap: Bitmap, orientation: Orientation) -> Self {
        Self {
            bitmap,
            orientation,
        }
    }

    /// Wrap a bitmap whose pixels are already upright.
    pub fn upright(bitmap: Bitmap) -> Self {
        Self::new(bitmap, Orientation::Up)
    }

    /// Display size after orientation is applied.
    pub fn size(&self) -> (u32, u32) {
        super::upright_dimensions(self.bitmap.width, self.bitmap.height, self.orientation)
    }

    /// Returns true if the pixels are stored upright.
    pub fn is_upright(&self) -> bool {
        self.orientation == Orientation::Up
    }

    /// Rewrite the pixels upright. The result is tagged `Up`.
    ///
    /// Already-upright images are returned as-is.
    pub fn fix_orientation(self) -> Result<OrientedImage, OrientationError> {
        let bitmap = super::normalize(self.bitmap, self.orientation)?;
        Ok(OrientedImage::upright(bitmap))
    }

    /// Take the raw bitmap, dropping the orientation.
    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }
}
