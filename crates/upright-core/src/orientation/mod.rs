//! Orientation normalization: bake an orientation tag into the pixel data.
//!
//! Cameras usually store pixels in sensor order and record how the picture
//! should be displayed in an orientation tag. [`normalize`] rewrites a bitmap
//! so that its pixels are stored upright, after which the tag can be dropped.
//!
//! # Coordinate System
//!
//! The transform is built in a y-up space with the origin at the bottom-left
//! corner of the canvas, the convention of 2-D drawing contexts:
//!
//! - `Down`/`DownMirrored`: translate (W, H), rotate 180°
//! - `Left`/`LeftMirrored`: translate (W, 0), rotate +90°
//! - `Right`/`RightMirrored`: translate (0, H), rotate -90°
//! - Mirrored variants then translate by the mirror axis and scale x by -1
//!
//! W and H are the upright canvas dimensions. `UpMirrored` is a flip only,
//! with no rotation step.
//!
//! # Example
//!
//! ```ignore
//! use upright_core::{normalize, Bitmap, Orientation, PixelFormat};
//!
//! let raw = Bitmap::new(4000, 3000, PixelFormat::Rgb8, pixels);
//! let upright = normalize(raw, Orientation::Right)?;
//! assert_eq!((upright.width, upright.height), (3000, 4000));
//! ```

mod affine;
mod normalize;
mod types;

pub use affine::AffineTransform;
pub use normalize::{normalize, upright_dimensions, upright_transform};
pub use types::{Orientation, OrientationError, OrientedImage, UnknownOrientation};
