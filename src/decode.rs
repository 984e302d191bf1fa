//! Decoding of client-supplied camera frames.
//!
//! Clients send frames as base64 strings, optionally wrapped in a data-URL
//! prefix (`data:image/png;base64,...`). Only the payload after the last comma
//! is decoded.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use image::RgbImage;

/// A decoded camera frame with known dimensions.
#[derive(Debug)]
pub struct DecodedFrame {
    pub pixels: RgbImage,
}

impl DecodedFrame {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Errors produced while turning an encoded payload into a pixel buffer.
///
/// Both variants are client-input errors and map to a 400 at the HTTP
/// boundary.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid image data: payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("invalid image data: bytes do not form a recognizable image: {0}")]
    UnreadableImage(#[from] image::ImageError),
}

/// Decodes a base64 frame payload into an RGB pixel buffer.
///
/// A data-URL prefix is tolerated: everything up to and including the last
/// comma is discarded before base64 decoding.
pub fn decode_frame(payload: &str) -> Result<DecodedFrame, DecodeError> {
    let encoded = match payload.rsplit_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };

    let bytes = B64.decode(encoded)?;
    let pixels = image::load_from_memory(&bytes)?.to_rgb8();

    Ok(DecodedFrame { pixels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([10, 200, 30]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_plain_base64_png() {
        let payload = B64.encode(png_bytes(10, 10));
        let frame = decode_frame(&payload).unwrap();
        assert_eq!(frame.width(), 10);
        assert_eq!(frame.height(), 10);
    }

    #[test]
    fn decodes_data_url_payload() {
        let payload = format!("data:image/png;base64,{}", B64.encode(png_bytes(32, 24)));
        let frame = decode_frame(&payload).unwrap();
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.height(), 24);
    }

    #[test]
    fn rejects_non_base64() {
        assert!(matches!(
            decode_frame("not-base64!!"),
            Err(DecodeError::InvalidBase64(_))
        ));
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(decode_frame("").is_err());
    }

    #[test]
    fn rejects_truncated_image_bytes() {
        let mut bytes = png_bytes(10, 10);
        bytes.truncate(12);
        let payload = B64.encode(bytes);
        assert!(matches!(
            decode_frame(&payload),
            Err(DecodeError::UnreadableImage(_))
        ));
    }

    #[test]
    fn error_message_mentions_invalid_image_data() {
        let err = decode_frame("not-base64!!").unwrap_err();
        assert!(err.to_string().contains("invalid image data"));
    }
}
