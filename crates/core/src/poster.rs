//! Poster image checks and stored-path naming.
//!
//! Uploaded posters are checked by header only: the format is guessed from
//! the magic bytes and the header must parse to valid dimensions. Pixel data
//! is never decoded.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use uuid::Uuid;

use crate::fields::INVALID_IMAGE;

/// Directory (relative to the media root) that posters are stored under.
pub const POSTER_DIR: &str = "posters";

/// Image formats accepted for posters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterFormat {
    Png,
    Jpeg,
    WebP,
}

impl PosterFormat {
    pub fn extension(self) -> &'static str {
        match self {
            PosterFormat::Png => "png",
            PosterFormat::Jpeg => "jpg",
            PosterFormat::WebP => "webp",
        }
    }
}

/// Identify the poster format from raw upload bytes.
///
/// Returns the field error message when the bytes are not a readable PNG,
/// JPEG, or WebP header.
pub fn detect_poster_format(bytes: &[u8]) -> Result<PosterFormat, &'static str> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| INVALID_IMAGE)?;

    let format = match reader.format() {
        Some(ImageFormat::Png) => PosterFormat::Png,
        Some(ImageFormat::Jpeg) => PosterFormat::Jpeg,
        Some(ImageFormat::WebP) => PosterFormat::WebP,
        _ => return Err(INVALID_IMAGE),
    };

    reader.into_dimensions().map_err(|_| INVALID_IMAGE)?;
    Ok(format)
}

/// Generate a fresh stored path for a poster, e.g. `posters/<uuid>.png`.
pub fn poster_path(format: PosterFormat) -> String {
    format!("{POSTER_DIR}/{}.{}", Uuid::new_v4(), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{DynamicImage, RgbImage};

    fn encode(format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(2, 3))
            .write_to(&mut Cursor::new(&mut buf), format)
            .unwrap();
        buf
    }

    #[test]
    fn detects_png() {
        assert_matches!(
            detect_poster_format(&encode(ImageFormat::Png)),
            Ok(PosterFormat::Png)
        );
    }

    #[test]
    fn detects_jpeg() {
        assert_matches!(
            detect_poster_format(&encode(ImageFormat::Jpeg)),
            Ok(PosterFormat::Jpeg)
        );
    }

    #[test]
    fn rejects_text() {
        assert_eq!(detect_poster_format(b"not an image"), Err(INVALID_IMAGE));
        assert_eq!(detect_poster_format(b""), Err(INVALID_IMAGE));
    }

    #[test]
    fn rejects_truncated_header() {
        let png = encode(ImageFormat::Png);
        assert_eq!(detect_poster_format(&png[..12]), Err(INVALID_IMAGE));
    }

    #[test]
    fn poster_paths_are_unique_and_scoped() {
        let a = poster_path(PosterFormat::Png);
        let b = poster_path(PosterFormat::Png);
        assert_ne!(a, b);
        assert!(a.starts_with("posters/"));
        assert!(a.ends_with(".png"));
        assert!(poster_path(PosterFormat::Jpeg).ends_with(".jpg"));
    }
}
