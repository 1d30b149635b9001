//! Decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::ImageReader;
use log::debug;

use super::DecodeError;
use crate::bitmap::Bitmap;
use crate::orientation::{OrientedImage, Orientation};

/// Decode image bytes without applying orientation.
///
/// The returned image carries the pixels in stored order together with the
/// EXIF orientation tag read from the same bytes.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the container format isn't
/// recognized, `DecodeError::CorruptedFile` if decoding fails, and
/// `DecodeError::Orientation` if the decoded color type has no bitmap format.
pub fn decode_oriented(bytes: &[u8]) -> Result<OrientedImage, DecodeError> {
    let orientation = get_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    let bitmap = Bitmap::from_dynamic_image(img)?;

    debug!(
        "decoded {}x{} {:?} tagged {:?}",
        bitmap.width, bitmap.height, bitmap.format, orientation
    );

    Ok(OrientedImage::new(bitmap, orientation))
}

/// Decode image bytes and rewrite the pixels upright.
///
/// # Errors
///
/// Same as [`decode_oriented`], plus any normalization failure.
pub fn decode_upright(bytes: &[u8]) -> Result<Bitmap, DecodeError> {
    let image = decode_oriented(bytes)?.fix_orientation()?;
    Ok(image.into_bitmap())
}

/// Extract the EXIF orientation from image bytes.
///
/// Returns `Orientation::Up` if no EXIF data is found or the orientation
/// value is missing or out of range.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    let exif = match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(_) => return Orientation::Up,
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .and_then(|value| Orientation::try_from(value).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::PixelFormat;
    use image::codecs::jpeg::JpegEncoder;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn encode_jpeg(pixels: &[u8], width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut buffer, 95)
            .write_image(pixels, width, height, ExtendedColorType::Rgb8)
            .unwrap();
        buffer.into_inner()
    }

    fn encode_png(pixels: &[u8], width: u32, height: u32, color: ExtendedColorType) -> Vec<u8> {
        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer)
            .write_image(pixels, width, height, color)
            .unwrap();
        buffer
    }

    /// Insert an APP1 segment carrying a big-endian EXIF block with a single
    /// Orientation entry right after the SOI marker.
    fn with_exif_orientation(jpeg: &[u8], value: u16) -> Vec<u8> {
        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\x00\x2A\x00\x00\x00\x08");
        tiff.extend_from_slice(&1u16.to_be_bytes()); // entry count
        tiff.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
        tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
        tiff.extend_from_slice(&1u32.to_be_bytes()); // count
        tiff.extend_from_slice(&value.to_be_bytes());
        tiff.extend_from_slice(&[0, 0]); // value padding
        tiff.extend_from_slice(&0u32.to_be_bytes()); // next IFD

        let payload_len = (2 + 6 + tiff.len()) as u16;
        let mut out = Vec::with_capacity(jpeg.len() + payload_len as usize + 2);
        out.extend_from_slice(&jpeg[..2]);
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&payload_len.to_be_bytes());
        out.extend_from_slice(b"Exif\x00\x00");
        out.extend_from_slice(&tiff);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_decode_png_keeps_pixels_exact() {
        let pixels = vec![255, 0, 0, 0, 255, 0, 0, 0, 255];
        let png = encode_png(&pixels, 3, 1, ExtendedColorType::Rgb8);

        let image = decode_oriented(&png).unwrap();
        assert_eq!(image.orientation, Orientation::Up);
        assert_eq!(image.bitmap.format, PixelFormat::Rgb8);
        assert_eq!(image.bitmap.pixels, pixels);
    }

    #[test]
    fn test_decode_gray_png() {
        let png = encode_png(&[10, 20, 30, 40], 2, 2, ExtendedColorType::L8);
        let bitmap = decode_upright(&png).unwrap();
        assert_eq!(bitmap.format, PixelFormat::Gray8);
        assert_eq!(bitmap.pixels, vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_decode_jpeg_without_exif() {
        let jpeg = encode_jpeg(&[128u8; 4 * 2 * 3], 4, 2);
        let image = decode_oriented(&jpeg).unwrap();
        assert_eq!(image.orientation, Orientation::Up);
        assert_eq!((image.bitmap.width, image.bitmap.height), (4, 2));
    }

    #[test]
    fn test_orientation_extraction_from_exif() {
        let jpeg = encode_jpeg(&[128u8; 4 * 2 * 3], 4, 2);
        for orientation in Orientation::ALL {
            let tagged = with_exif_orientation(&jpeg, orientation.exif_value() as u16);
            assert_eq!(get_orientation(&tagged), orientation);
        }
    }

    #[test]
    fn test_out_of_range_orientation_is_up() {
        let jpeg = encode_jpeg(&[128u8; 3], 1, 1);
        let tagged = with_exif_orientation(&jpeg, 9);
        assert_eq!(get_orientation(&tagged), Orientation::Up);
    }

    #[test]
    fn test_decode_upright_applies_exif_rotation() {
        let jpeg = encode_jpeg(&[128u8; 4 * 2 * 3], 4, 2);
        let tagged = with_exif_orientation(&jpeg, 6);

        let oriented = decode_oriented(&tagged).unwrap();
        assert_eq!(oriented.orientation, Orientation::Right);
        assert_eq!(oriented.size(), (2, 4));

        let upright = decode_upright(&tagged).unwrap();
        assert_eq!((upright.width, upright.height), (2, 4));
    }

    #[test]
    fn test_orientation_extraction_invalid_data() {
        assert_eq!(get_orientation(&[0x00, 0x01, 0x02]), Orientation::Up);
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = decode_oriented(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_oriented(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let jpeg = encode_jpeg(&[128u8; 16 * 16 * 3], 16, 16);
        let result = decode_oriented(&jpeg[..20]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }
}
