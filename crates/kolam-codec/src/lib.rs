//! Canvas image codec.
//!
//! A canvas export is an RGBA8 pixel buffer. It is stored as a PNG, and the
//! PNG is kept as standard base64 text so it fits a TEXT column.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("pixel buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// A stored image could not be turned back into pixels.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    #[error("image data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image data is not a readable PNG: {0}")]
    Image(#[from] image::ImageError),
}

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Encode an RGBA8 buffer as base64 PNG text.
pub fn encode_rgba(width: u32, height: u32, pixels: &[u8]) -> Result<String, EncodeError> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(EncodeError::BufferSize {
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(pixels, width, height, ExtendedColorType::Rgba8)?;

    Ok(BASE64.encode(png))
}

/// Decode base64 PNG text back into RGBA8 pixels.
pub fn decode(text: &str) -> Result<DecodedImage, DecodeFailure> {
    let png = BASE64.decode(text.trim())?;
    let img = image::load_from_memory_with_format(&png, ImageFormat::Png)?.into_rgba8();

    Ok(DecodedImage {
        width: img.width(),
        height: img.height(),
        pixels: img.into_raw(),
    })
}

/// Check that stored text holds a readable PNG and return the PNG bytes.
pub fn decode_png_bytes(text: &str) -> Result<Vec<u8>, DecodeFailure> {
    let png = BASE64.decode(text.trim())?;
    image::load_from_memory_with_format(&png, ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                if (x + y) % 2 == 0 {
                    pixels.extend_from_slice(&[255, 107, 53, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 0, 0]);
                }
            }
        }
        pixels
    }

    #[test]
    fn roundtrip_is_pixel_identical() {
        let pixels = checkerboard(7, 5);
        let text = encode_rgba(7, 5, &pixels).unwrap();

        let decoded = decode(&text).unwrap();
        assert_eq!(decoded.width, 7);
        assert_eq!(decoded.height, 5);
        assert_eq!(decoded.pixels, pixels);
    }

    #[test]
    fn png_bytes_carry_signature() {
        let text = encode_rgba(2, 2, &checkerboard(2, 2)).unwrap();
        let png = decode_png_bytes(&text).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn wrong_buffer_size_rejected() {
        let err = encode_rgba(4, 4, &[0u8; 10]).unwrap_err();
        assert!(matches!(err, EncodeError::BufferSize { expected: 64, actual: 10, .. }));
    }

    #[test]
    fn garbage_text_is_decode_failure() {
        assert!(matches!(decode("not base64!!"), Err(DecodeFailure::Base64(_))));
    }

    #[test]
    fn non_png_payload_is_decode_failure() {
        let text = BASE64.encode(b"definitely not an image");
        assert!(matches!(decode(&text), Err(DecodeFailure::Image(_))));
        assert!(decode_png_bytes(&text).is_err());
    }
}
