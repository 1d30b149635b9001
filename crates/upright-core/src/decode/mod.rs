//! Image decoding with orientation tags.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG bytes into a [`Bitmap`](crate::Bitmap) without
//!   touching the pixel order
//! - Reading the EXIF orientation tag that says how those pixels should be
//!   displayed
//! - Decoding straight to upright pixels
//!
//! # Examples
//!
//! ```ignore
//! use upright_core::decode::decode_upright;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_upright(&bytes).unwrap();
//! println!("Decoded {}x{} upright image", image.width, image.height);
//! ```

mod oriented;
mod types;

pub use oriented::{decode_oriented, decode_upright, get_orientation};
pub use types::DecodeError;
