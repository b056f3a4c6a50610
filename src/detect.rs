//! Image format detection and extension filtering.

use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use std::path::Path;

/// File extensions (lowercase, without the dot) accepted as input images.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Source encoding of an input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// JPEG / JFIF
    Jpeg,
    /// Graphics Interchange Format (first frame only)
    Gif,
    /// Windows bitmap
    Bmp,
}

impl ImageFormat {
    /// Short uppercase label, e.g. `"JPEG"`.
    pub fn label(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Gif => "GIF",
            ImageFormat::Bmp => "BMP",
        }
    }

    /// Matching format of the `image` crate.
    pub fn to_image_crate(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";
const BMP_MAGIC: &[u8] = b"BM";
const HEADER_LEN: usize = 8;

/// Detect the image format from the leading bytes of a reader.
///
/// Consumes at most the magic-number prefix. The file extension plays no
/// part; a `.png` holding JPEG data is reported as JPEG.
pub fn detect_format_from_reader<R: Read>(reader: &mut R) -> io::Result<Option<ImageFormat>> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    reader.by_ref().take(HEADER_LEN as u64).read_to_end(&mut header)?;
    Ok(detect_format_from_bytes(&header))
}

/// Detect the image format from the first bytes of a file.
///
/// Returns `None` when the data matches none of the supported formats.
pub fn detect_format_from_bytes(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(PNG_MAGIC) {
        Some(ImageFormat::Png)
    } else if data.starts_with(JPEG_MAGIC) {
        Some(ImageFormat::Jpeg)
    } else if data.starts_with(GIF87_MAGIC) || data.starts_with(GIF89_MAGIC) {
        Some(ImageFormat::Gif)
    } else if data.starts_with(BMP_MAGIC) {
        Some(ImageFormat::Bmp)
    } else {
        None
    }
}

/// Check whether an extension (without the dot) is an accepted input type.
///
/// Matching is case-insensitive.
pub fn is_supported_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

/// Check whether a path carries an accepted image extension.
pub fn has_supported_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(is_supported_extension)
        .unwrap_or(false)
}
