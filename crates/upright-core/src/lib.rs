//! Upright Core - orientation normalization for decoded images
//!
//! This crate rewrites decoded bitmaps so their pixels are stored upright,
//! removing the need to carry an orientation tag alongside them. It also
//! provides decoding that reads the EXIF orientation tag, and the completion
//! logic a host image picker uses to hand upright images to an application.

pub mod bitmap;
pub mod decode;
pub mod orientation;
pub mod picker;

pub use bitmap::{Bitmap, ColorSpace, PixelFormat};
pub use orientation::{normalize, AffineTransform, Orientation, OrientationError, OrientedImage};
pub use picker::{PickOutcome, PickerCoordinator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_and_orientation_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Bitmap>();
        assert_send_sync::<Orientation>();
        assert_send_sync::<OrientedImage>();
    }

    #[test]
    fn test_concurrent_normalization() {
        let handles: Vec<_> = Orientation::ALL
            .into_iter()
            .map(|orientation| {
                std::thread::spawn(move || {
                    let bitmap = Bitmap::new(3, 2, PixelFormat::Rgb8, vec![7u8; 18]);
                    normalize(bitmap, orientation).map(|b| (orientation, b.width, b.height))
                })
            })
            .collect();

        for handle in handles {
            let (orientation, width, height) = handle.join().unwrap().unwrap();
            if orientation.swaps_dimensions() {
                assert_eq!((width, height), (2, 3));
            } else {
                assert_eq!((width, height), (3, 2));
            }
        }
    }
}
