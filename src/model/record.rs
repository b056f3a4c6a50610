//! Per-image metadata.

use crate::detect::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolution reported when a file carries no usable density information.
pub const DEFAULT_DPI: f64 = 72.0;

/// Metadata of a single input image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Location of the source file
    pub path: PathBuf,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Color mode (informational)
    pub mode: ColorMode,

    /// Source encoding (informational)
    pub format: ImageFormat,

    /// Embedded resolution, 72x72 when absent
    pub dpi: Dpi,

    /// `width / height`
    pub aspect_ratio: f64,
}

impl ImageRecord {
    /// Create a record, deriving the aspect ratio from the dimensions.
    ///
    /// Callers must ensure `height` is non-zero.
    pub fn new(
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        mode: ColorMode,
        format: ImageFormat,
        dpi: Dpi,
    ) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            mode,
            format,
            dpi,
            aspect_ratio: width as f64 / height as f64,
        }
    }

    /// File name component of the path, for display.
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Horizontal and vertical resolution in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dpi {
    /// Horizontal resolution
    pub x: f64,
    /// Vertical resolution
    pub y: f64,
}

impl Dpi {
    /// Create a resolution pair.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether this is the 72x72 fallback value.
    pub fn is_default(&self) -> bool {
        self.x == DEFAULT_DPI && self.y == DEFAULT_DPI
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self::new(DEFAULT_DPI, DEFAULT_DPI)
    }
}

impl std::fmt::Display for Dpi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", trim(self.x), trim(self.y))
    }
}

fn trim(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Color mode of an image, labelled the way common imaging tools do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorMode {
    /// 8-bit grayscale
    #[serde(rename = "L")]
    Luma,
    /// 8-bit grayscale with alpha
    #[serde(rename = "LA")]
    LumaAlpha,
    /// 8-bit RGB
    #[serde(rename = "RGB")]
    Rgb,
    /// 8-bit RGB with alpha
    #[serde(rename = "RGBA")]
    Rgba,
    /// 8-bit CMYK (JPEG only)
    #[serde(rename = "CMYK")]
    Cmyk,
    /// 16-bit grayscale
    #[serde(rename = "I;16")]
    Luma16,
    /// 16-bit grayscale with alpha
    #[serde(rename = "LA;16")]
    LumaAlpha16,
    /// 16-bit RGB
    #[serde(rename = "RGB;16")]
    Rgb16,
    /// 16-bit RGB with alpha
    #[serde(rename = "RGBA;16")]
    Rgba16,
    /// Anything else the decoder reports
    #[serde(rename = "?")]
    Unknown,
}

impl ColorMode {
    /// Short label, e.g. `"RGBA"`.
    pub fn label(&self) -> &'static str {
        match self {
            ColorMode::Luma => "L",
            ColorMode::LumaAlpha => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
            ColorMode::Cmyk => "CMYK",
            ColorMode::Luma16 => "I;16",
            ColorMode::LumaAlpha16 => "LA;16",
            ColorMode::Rgb16 => "RGB;16",
            ColorMode::Rgba16 => "RGBA;16",
            ColorMode::Unknown => "?",
        }
    }
}

impl From<image::ColorType> for ColorMode {
    fn from(color: image::ColorType) -> Self {
        use image::ColorType;

        match color {
            ColorType::L8 => ColorMode::Luma,
            ColorType::La8 => ColorMode::LumaAlpha,
            ColorType::Rgb8 => ColorMode::Rgb,
            ColorType::Rgba8 => ColorMode::Rgba,
            ColorType::L16 => ColorMode::Luma16,
            ColorType::La16 => ColorMode::LumaAlpha16,
            ColorType::Rgb16 => ColorMode::Rgb16,
            ColorType::Rgba16 => ColorMode::Rgba16,
            _ => ColorMode::Unknown,
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
