//! Minimal header readers for metadata the `image` crate does not expose.
//!
//! Only the marker/chunk structure is walked; pixel data is never touched.

use crate::detect::ImageFormat;
use crate::model::Dpi;
use exif::{In, Tag, Value};
use std::io::{self, BufRead, Read, Seek, SeekFrom};

const INCHES_PER_METER: f64 = 0.0254;
const CM_PER_INCH: f64 = 2.54;

/// Facts gathered from a JPEG marker walk.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JpegHeader {
    /// JFIF density, when it is expressed in physical units
    pub density: Option<Dpi>,
    /// Number of color components from the SOF marker
    pub components: Option<u8>,
    /// Frame width and height from the SOF marker
    pub dimensions: Option<(u32, u32)>,
    /// Transform flag of an Adobe APP14 segment, if present
    pub adobe_transform: Option<u8>,
}

impl JpegHeader {
    /// Whether the stream is CMYK (or YCCK) encoded.
    pub fn is_cmyk(&self) -> bool {
        self.components == Some(4)
    }

    /// Adobe writers store CMYK JPEGs with inverted samples.
    pub fn is_inverted_cmyk(&self) -> bool {
        self.is_cmyk() && self.adobe_transform.is_some()
    }
}

/// Read the embedded resolution of an image, if it has one.
///
/// Returns `Ok(None)` when the format carries no density, the density is
/// zero, or it is an aspect-only value without physical units. Truncated
/// headers are treated the same way.
pub fn read_resolution<R: BufRead + Seek>(reader: &mut R, format: ImageFormat) -> io::Result<Option<Dpi>> {
    let result = match format {
        ImageFormat::Png => read_png_resolution(reader),
        ImageFormat::Jpeg => read_jpeg_metadata(reader).map(|h| h.density),
        ImageFormat::Bmp => read_bmp_resolution(reader),
        ImageFormat::Gif => Ok(None),
    };

    match result {
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        other => other,
    }
}

/// Walk PNG chunks up to the first `IDAT` looking for `pHYs`.
pub fn read_png_resolution<R: Read + Seek>(reader: &mut R) -> io::Result<Option<Dpi>> {
    reader.seek(SeekFrom::Start(8))?;

    loop {
        let mut head = [0u8; 8];
        reader.read_exact(&mut head)?;
        let len = u32::from_be_bytes([head[0], head[1], head[2], head[3]]);
        let kind = &head[4..8];

        match kind {
            b"pHYs" if len >= 9 => {
                let mut body = [0u8; 9];
                reader.read_exact(&mut body)?;
                let ppu_x = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
                let ppu_y = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
                // unit 1 = meter, 0 = aspect ratio only
                if body[8] != 1 || ppu_x == 0 || ppu_y == 0 {
                    return Ok(None);
                }
                return Ok(Some(Dpi::new(
                    ppu_x as f64 * INCHES_PER_METER,
                    ppu_y as f64 * INCHES_PER_METER,
                )));
            }
            b"IDAT" | b"IEND" => return Ok(None),
            _ => {
                // payload + CRC
                reader.seek(SeekFrom::Current(len as i64 + 4))?;
            }
        }
    }
}

/// [`read_jpeg_header`], taking the resolution from EXIF when the JFIF
/// segment has no physical density.
pub fn read_jpeg_metadata<R: BufRead + Seek>(reader: &mut R) -> io::Result<JpegHeader> {
    let mut header = read_jpeg_header(reader)?;
    if header.density.is_none() {
        header.density = read_exif_resolution(reader);
    }
    Ok(header)
}

/// Walk JPEG markers up to the start of scan.
pub fn read_jpeg_header<R: Read + Seek>(reader: &mut R) -> io::Result<JpegHeader> {
    let mut header = JpegHeader::default();
    reader.seek(SeekFrom::Start(2))?;

    loop {
        let marker = next_marker(reader)?;
        match marker {
            0xD8 | 0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => break,
            _ => {}
        }

        let mut len = [0u8; 2];
        reader.read_exact(&mut len)?;
        let len = u16::from_be_bytes(len) as usize;
        if len < 2 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "bad JPEG segment length"));
        }
        let payload_len = len - 2;

        match marker {
            0xE0 | 0xEE | 0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                let mut payload = vec![0u8; payload_len];
                reader.read_exact(&mut payload)?;
                match marker {
                    0xE0 => header.density = parse_jfif_density(&payload).or(header.density),
                    0xEE => {
                        if payload.len() >= 12 && payload.starts_with(b"Adobe") {
                            header.adobe_transform = Some(payload[11]);
                        }
                    }
                    _ => {
                        if payload.len() >= 6 && header.components.is_none() {
                            let height = u16::from_be_bytes([payload[1], payload[2]]) as u32;
                            let width = u16::from_be_bytes([payload[3], payload[4]]) as u32;
                            header.dimensions = Some((width, height));
                            header.components = Some(payload[5]);
                        }
                    }
                }
            }
            _ => {
                reader.seek(SeekFrom::Current(payload_len as i64))?;
            }
        }
    }

    Ok(header)
}

fn next_marker<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut byte = [0u8; 1];
    loop {
        reader.read_exact(&mut byte)?;
        if byte[0] == 0xFF {
            break;
        }
    }
    // fill bytes
    while byte[0] == 0xFF {
        reader.read_exact(&mut byte)?;
    }
    Ok(byte[0])
}

fn parse_jfif_density(payload: &[u8]) -> Option<Dpi> {
    if payload.len() < 12 || !payload.starts_with(b"JFIF\0") {
        return None;
    }
    let unit = payload[7];
    let x = u16::from_be_bytes([payload[8], payload[9]]) as f64;
    let y = u16::from_be_bytes([payload[10], payload[11]]) as f64;
    if x == 0.0 || y == 0.0 {
        return None;
    }
    match unit {
        1 => Some(Dpi::new(x, y)),
        2 => Some(Dpi::new(x * CM_PER_INCH, y * CM_PER_INCH)),
        _ => None,
    }
}

/// Read `XResolution`/`YResolution` from the primary EXIF IFD.
///
/// Only inch (2) and centimeter (3) units count; a missing unit, a zero or
/// malformed rational, or no EXIF data at all yields `None`.
pub fn read_exif_resolution<R: BufRead + Seek>(reader: &mut R) -> Option<Dpi> {
    reader.seek(SeekFrom::Start(0)).ok()?;
    let exif = exif::Reader::new().read_from_container(reader).ok()?;

    let unit = exif
        .get_field(Tag::ResolutionUnit, In::PRIMARY)?
        .value
        .get_uint(0)?;
    let scale = match unit {
        2 => 1.0,
        3 => CM_PER_INCH,
        _ => return None,
    };

    let x = exif_rational(&exif, Tag::XResolution)?;
    let y = exif_rational(&exif, Tag::YResolution).unwrap_or(x);
    Some(Dpi::new(x * scale, y * scale))
}

fn exif_rational(exif: &exif::Exif, tag: Tag) -> Option<f64> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(values) => values
            .first()
            .filter(|r| r.num > 0 && r.denom > 0)
            .map(|r| r.to_f64()),
        _ => None,
    }
}

/// Read pixels-per-meter from a `BITMAPINFOHEADER` (or later) DIB header.
pub fn read_bmp_resolution<R: Read + Seek>(reader: &mut R) -> io::Result<Option<Dpi>> {
    reader.seek(SeekFrom::Start(14))?;
    let mut dib = [0u8; 32];
    reader.read_exact(&mut dib[..4])?;
    let dib_size = u32::from_le_bytes([dib[0], dib[1], dib[2], dib[3]]);
    if dib_size < 40 {
        // BITMAPCOREHEADER has no resolution fields
        return Ok(None);
    }
    reader.read_exact(&mut dib[4..32])?;
    let x = i32::from_le_bytes([dib[24], dib[25], dib[26], dib[27]]);
    let y = i32::from_le_bytes([dib[28], dib[29], dib[30], dib[31]]);
    if x <= 0 || y <= 0 {
        return Ok(None);
    }
    Ok(Some(Dpi::new(
        x as f64 * INCHES_PER_METER,
        y as f64 * INCHES_PER_METER,
    )))
}
