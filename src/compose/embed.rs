//! Image XObject construction.
//!
//! Images are embedded at their native resolution. JPEG data is passed
//! through untouched; other formats are decoded once and stored losslessly.

use crate::detect::ImageFormat;
use crate::error::{Error, Result};
use crate::inspect::header::read_jpeg_header;
use crate::model::ImageRecord;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{DynamicImage, ImageReader};
use lopdf::{dictionary, Object, Stream};
use std::fs;
use std::io::{Cursor, Write};

/// Image stream plus its optional soft mask.
#[derive(Debug)]
pub struct ImageXObject {
    /// The color image stream
    pub image: Stream,
    /// Alpha channel as a DeviceGray stream
    pub smask: Option<Stream>,
}

/// Re-read the source file of `record` and build its XObject streams.
///
/// # Errors
///
/// Returns [`Error::UnreadableImage`] when the file can no longer be read
/// or decoded.
pub fn load_image(record: &ImageRecord) -> Result<ImageXObject> {
    match record.format {
        ImageFormat::Jpeg => load_jpeg(record),
        _ => load_decoded(record),
    }
}

fn load_jpeg(record: &ImageRecord) -> Result<ImageXObject> {
    let path = &record.path;
    let data = fs::read(path).map_err(|e| Error::unreadable(path, e))?;
    let header = read_jpeg_header(&mut Cursor::new(&data)).map_err(|e| Error::unreadable(path, e))?;

    let color_space = match header.components {
        Some(1) => "DeviceGray",
        Some(3) => "DeviceRGB",
        Some(4) => "DeviceCMYK",
        Some(n) => {
            return Err(Error::unreadable(
                path,
                format!("unsupported JPEG component count {}", n),
            ))
        }
        None => return Err(Error::unreadable(path, "missing JPEG frame header")),
    };

    let (width, height) = header
        .dimensions
        .ok_or_else(|| Error::unreadable(path, "missing JPEG frame header"))?;
    if (width, height) != (record.width, record.height) {
        return Err(Error::unreadable(
            path,
            format!(
                "frame is {}x{} but {}x{} was analyzed",
                width, height, record.width, record.height
            ),
        ));
    }

    let mut dict = image_dictionary(width, height, color_space, 8);
    dict.set("Filter", "DCTDecode");
    if header.is_inverted_cmyk() {
        let decode: Vec<Object> = [1, 0, 1, 0, 1, 0, 1, 0].iter().map(|&v| Object::Integer(v)).collect();
        dict.set("Decode", decode);
    }

    Ok(ImageXObject {
        image: Stream::new(dict, data),
        smask: None,
    })
}

fn load_decoded(record: &ImageRecord) -> Result<ImageXObject> {
    let path = &record.path;
    let mut reader = ImageReader::open(path).map_err(|e| Error::unreadable(path, e))?;
    reader.set_format(record.format.to_image_crate());
    let img = reader.decode().map_err(|e| Error::unreadable(path, e))?;

    let (width, height) = (img.width(), img.height());
    let samples = Samples::from_image(img);

    let mut dict = image_dictionary(width, height, samples.color_space, samples.bits);
    dict.set("Filter", "FlateDecode");

    let smask = match samples.alpha {
        Some(alpha) => {
            let mut mask = image_dictionary(width, height, "DeviceGray", samples.bits);
            mask.set("Filter", "FlateDecode");
            Some(Stream::new(mask, deflate(&alpha)?))
        }
        None => None,
    };

    Ok(ImageXObject {
        image: Stream::new(dict, deflate(&samples.color)?),
        smask,
    })
}

fn image_dictionary(width: u32, height: u32, color_space: &str, bits: u8) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => color_space,
        "BitsPerComponent" => bits as i64,
    }
}

/// Zlib-compress a buffer for a `FlateDecode` stream.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Raw PDF image samples split into color and alpha planes.
struct Samples {
    color: Vec<u8>,
    alpha: Option<Vec<u8>>,
    color_space: &'static str,
    bits: u8,
}

impl Samples {
    fn from_image(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(buf) => Self::opaque(buf.into_raw(), "DeviceGray"),
            DynamicImage::ImageRgb8(buf) => Self::opaque(buf.into_raw(), "DeviceRGB"),
            DynamicImage::ImageLumaA8(buf) => Self::with_alpha(&buf.into_raw(), 1, "DeviceGray"),
            DynamicImage::ImageRgba8(buf) => Self::with_alpha(&buf.into_raw(), 3, "DeviceRGB"),
            DynamicImage::ImageLuma16(buf) => Self::opaque16(&buf.into_raw(), "DeviceGray"),
            DynamicImage::ImageRgb16(buf) => Self::opaque16(&buf.into_raw(), "DeviceRGB"),
            DynamicImage::ImageLumaA16(buf) => Self::with_alpha16(&buf.into_raw(), 1, "DeviceGray"),
            DynamicImage::ImageRgba16(buf) => Self::with_alpha16(&buf.into_raw(), 3, "DeviceRGB"),
            other => Self::with_alpha(&other.to_rgba8().into_raw(), 3, "DeviceRGB"),
        }
    }

    fn opaque(color: Vec<u8>, color_space: &'static str) -> Self {
        Self {
            color,
            alpha: None,
            color_space,
            bits: 8,
        }
    }

    fn opaque16(raw: &[u16], color_space: &'static str) -> Self {
        Self {
            color: to_be_bytes(raw),
            alpha: None,
            color_space,
            bits: 16,
        }
    }

    fn with_alpha(raw: &[u8], color_channels: usize, color_space: &'static str) -> Self {
        let (color, alpha) = split_alpha(raw, color_channels);
        let alpha = alpha.iter().any(|&a| a != u8::MAX).then_some(alpha);
        Self {
            color,
            alpha,
            color_space,
            bits: 8,
        }
    }

    fn with_alpha16(raw: &[u16], color_channels: usize, color_space: &'static str) -> Self {
        let (color, alpha) = split_alpha(raw, color_channels);
        let alpha = alpha
            .iter()
            .any(|&a| a != u16::MAX)
            .then(|| to_be_bytes(&alpha));
        Self {
            color: to_be_bytes(&color),
            alpha,
            color_space,
            bits: 16,
        }
    }
}

/// Split interleaved samples with a trailing alpha channel.
fn split_alpha<T: Copy>(raw: &[T], color_channels: usize) -> (Vec<T>, Vec<T>) {
    let stride = color_channels + 1;
    let pixels = raw.len() / stride;
    let mut color = Vec::with_capacity(pixels * color_channels);
    let mut alpha = Vec::with_capacity(pixels);
    for px in raw.chunks_exact(stride) {
        color.extend_from_slice(&px[..color_channels]);
        alpha.push(px[color_channels]);
    }
    (color, alpha)
}

/// PDF stores 16-bit samples big-endian.
fn to_be_bytes(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorMode, Dpi};
    use image::{GrayImage, Rgb, RgbImage, Rgba, RgbaImage};
    use std::path::Path;

    /// SOI, optional Adobe APP14, a 20x10 SOF0 and SOS: enough for the
    /// marker walk, never decoded.
    fn jpeg_frame(components: u8, adobe: bool) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        if adobe {
            data.extend_from_slice(&[0xFF, 0xEE, 0x00, 0x0E]);
            data.extend_from_slice(b"Adobe");
            data.extend_from_slice(&[0, 100, 0, 0, 0, 0, 2]);
        }
        let sof_len = 8 + 3 * components as u16;
        data.extend_from_slice(&[0xFF, 0xC0]);
        data.extend_from_slice(&sof_len.to_be_bytes());
        data.extend_from_slice(&[8, 0, 10, 0, 20, components]);
        for id in 1..=components {
            data.extend_from_slice(&[id, 0x11, 0]);
        }
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0xFF, 0xD9]);
        data
    }

    fn jpeg_record(path: &Path, width: u32, height: u32) -> ImageRecord {
        ImageRecord::new(path, width, height, ColorMode::Rgb, ImageFormat::Jpeg, Dpi::default())
    }

    fn load_jpeg_bytes(data: &[u8], width: u32, height: u32) -> Result<ImageXObject> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        fs::write(&path, data).unwrap();
        load_image(&jpeg_record(&path, width, height))
    }

    fn name_of(stream: &Stream, key: &[u8]) -> Vec<u8> {
        stream.dict.get(key).unwrap().as_name().unwrap().to_vec()
    }

    #[test]
    fn test_jpeg_color_space_follows_components() {
        let gray = load_jpeg_bytes(&jpeg_frame(1, false), 20, 10).unwrap();
        assert_eq!(name_of(&gray.image, b"ColorSpace"), b"DeviceGray");

        let rgb = load_jpeg_bytes(&jpeg_frame(3, false), 20, 10).unwrap();
        assert_eq!(name_of(&rgb.image, b"ColorSpace"), b"DeviceRGB");
        assert_eq!(name_of(&rgb.image, b"Filter"), b"DCTDecode");
        assert!(rgb.smask.is_none());
    }

    #[test]
    fn test_plain_cmyk_jpeg_has_no_decode_array() {
        let data = jpeg_frame(4, false);
        let cmyk = load_jpeg_bytes(&data, 20, 10).unwrap();
        assert_eq!(name_of(&cmyk.image, b"ColorSpace"), b"DeviceCMYK");
        assert!(cmyk.image.dict.get(b"Decode").is_err());
        assert_eq!(cmyk.image.content, data);
    }

    #[test]
    fn test_adobe_cmyk_jpeg_is_inverted() {
        let cmyk = load_jpeg_bytes(&jpeg_frame(4, true), 20, 10).unwrap();
        assert_eq!(name_of(&cmyk.image, b"ColorSpace"), b"DeviceCMYK");
        let decode: Vec<i64> = cmyk
            .image
            .dict
            .get(b"Decode")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        assert_eq!(decode, vec![1, 0, 1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_adobe_rgb_jpeg_is_not_inverted() {
        let rgb = load_jpeg_bytes(&jpeg_frame(3, true), 20, 10).unwrap();
        assert!(rgb.image.dict.get(b"Decode").is_err());
    }

    #[test]
    fn test_unsupported_component_count() {
        let result = load_jpeg_bytes(&jpeg_frame(2, false), 20, 10);
        match result {
            Err(Error::UnreadableImage { reason, .. }) => assert!(reason.contains("component count 2")),
            other => panic!("expected UnreadableImage, got {:?}", other),
        }
    }

    #[test]
    fn test_jpeg_size_comes_from_frame_header() {
        let xobject = load_jpeg_bytes(&jpeg_frame(3, false), 20, 10).unwrap();
        assert_eq!(xobject.image.dict.get(b"Width").unwrap().as_i64().unwrap(), 20);
        assert_eq!(xobject.image.dict.get(b"Height").unwrap().as_i64().unwrap(), 10);
    }

    #[test]
    fn test_jpeg_replaced_after_analysis() {
        let result = load_jpeg_bytes(&jpeg_frame(3, false), 40, 30);
        match result {
            Err(Error::UnreadableImage { reason, .. }) => {
                assert!(reason.contains("20x10"));
                assert!(reason.contains("40x30"));
            }
            other => panic!("expected UnreadableImage, got {:?}", other),
        }
    }

    #[test]
    fn test_split_alpha() {
        let raw = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let (color, alpha) = split_alpha(&raw, 3);
        assert_eq!(color, vec![1, 2, 3, 5, 6, 7]);
        assert_eq!(alpha, vec![4, 8]);
    }

    #[test]
    fn test_be_bytes() {
        assert_eq!(to_be_bytes(&[0x0102, 0xA0B0]), vec![1, 2, 0xA0, 0xB0]);
    }

    #[test]
    fn test_rgb_samples_are_unchanged() {
        let img = RgbImage::from_pixel(2, 1, Rgb([10, 20, 30]));
        let samples = Samples::from_image(DynamicImage::ImageRgb8(img));
        assert_eq!(samples.color, vec![10, 20, 30, 10, 20, 30]);
        assert!(samples.alpha.is_none());
        assert_eq!(samples.color_space, "DeviceRGB");
        assert_eq!(samples.bits, 8);
    }

    #[test]
    fn test_opaque_alpha_is_dropped() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let samples = Samples::from_image(DynamicImage::ImageRgba8(img));
        assert!(samples.alpha.is_none());
        assert_eq!(samples.color.len(), 12);
    }

    #[test]
    fn test_translucent_alpha_becomes_mask() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 128]));
        let samples = Samples::from_image(DynamicImage::ImageRgba8(img));
        assert_eq!(samples.alpha, Some(vec![128]));
    }

    #[test]
    fn test_gray_samples() {
        let img = GrayImage::from_pixel(3, 1, image::Luma([7]));
        let samples = Samples::from_image(DynamicImage::ImageLuma8(img));
        assert_eq!(samples.color_space, "DeviceGray");
        assert_eq!(samples.color, vec![7, 7, 7]);
    }

    #[test]
    fn test_deflate_round_trips() {
        use flate2::read::ZlibDecoder;
        use std::io::Read;

        let packed = deflate(b"slides slides slides").unwrap();
        let mut out = Vec::new();
        ZlibDecoder::new(&packed[..]).read_to_end(&mut out).unwrap();
        assert_eq!(out, b"slides slides slides");
    }
}
