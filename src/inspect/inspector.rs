//! Image metadata extraction.

use crate::detect::{detect_format_from_reader, ImageFormat};
use crate::error::{Error, Result};
use crate::inspect::header::{read_jpeg_metadata, read_resolution};
use crate::model::{ColorMode, Dpi, ImageRecord};
use image::{ImageDecoder, ImageReader};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

/// Read the metadata of a single image without decoding its pixels.
///
/// # Errors
///
/// Returns [`Error::UnreadableImage`] if the file cannot be opened, is not a
/// supported image, or reports a zero dimension.
///
/// # Example
///
/// ```no_run
/// use images2pdf::analyze;
///
/// let record = analyze("images/01.png")?;
/// println!("{} x {} ({:.2})", record.width, record.height, record.aspect_ratio);
/// # Ok::<(), images2pdf::Error>(())
/// ```
pub fn analyze<P: AsRef<Path>>(path: P) -> Result<ImageRecord> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::unreadable(path, e))?;
    let mut reader = BufReader::new(file);

    let format = detect_format_from_reader(&mut reader)
        .map_err(|e| Error::unreadable(path, e))?
        .ok_or_else(|| Error::unreadable(path, "not a recognized image format"))?;

    let (dpi, cmyk) = read_header_metadata(&mut reader, path, format);

    reader.rewind().map_err(|e| Error::unreadable(path, e))?;
    let (width, height, mut mode) = read_dimensions(reader, path, format)?;
    if width == 0 || height == 0 {
        return Err(Error::unreadable(path, "image has a zero dimension"));
    }
    if cmyk {
        mode = ColorMode::Cmyk;
    }

    let record = ImageRecord::new(path, width, height, mode, format, dpi.unwrap_or_default());
    log::debug!(
        "Analyzed {}: {}x{} {} {} dpi={}",
        path.display(),
        record.width,
        record.height,
        record.format,
        record.mode,
        record.dpi
    );
    Ok(record)
}

/// Analyze every path in order, stopping at the first failure.
pub fn analyze_all<I, P>(paths: I) -> Result<Vec<ImageRecord>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().map(analyze).collect()
}

fn read_dimensions<R: BufRead + Seek>(
    reader: R,
    path: &Path,
    format: ImageFormat,
) -> Result<(u32, u32, ColorMode)> {
    let decoder = ImageReader::with_format(reader, format.to_image_crate())
        .into_decoder()
        .map_err(|e| Error::unreadable(path, e))?;

    let (width, height) = decoder.dimensions();
    Ok((width, height, ColorMode::from(decoder.color_type())))
}

/// Returns the embedded resolution and whether the image is a CMYK JPEG.
fn read_header_metadata<R: BufRead + Seek>(
    reader: &mut R,
    path: &Path,
    format: ImageFormat,
) -> (Option<Dpi>, bool) {
    let metadata = match format {
        ImageFormat::Jpeg => read_jpeg_metadata(reader).map(|h| (h.density, h.is_cmyk())),
        _ => read_resolution(reader, format).map(|dpi| (dpi, false)),
    };

    metadata.unwrap_or_else(|e| {
        log::debug!("No header metadata read from {}: {}", path.display(), e);
        (None, false)
    })
}
