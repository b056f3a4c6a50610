//! In-memory PDF document builder.

use crate::compose::embed::{deflate, load_image};
use crate::compose::ConvertOptions;
use crate::error::{Error, Result};
use crate::model::{ImageRecord, PageGeometry, Placement};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::fs;
use std::path::Path;

const PDF_VERSION: &str = "1.5";
const IMAGE_NAME: &str = "Im0";

/// Builds a multi-page PDF where every page has the same size.
///
/// Pages are appended one at a time; [`PdfWriter::finish`] consumes the
/// writer, so a document can only be written once.
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    geometry: PageGeometry,
    options: ConvertOptions,
}

impl PdfWriter {
    /// Start an empty document with fixed page geometry.
    pub fn new(geometry: PageGeometry, options: ConvertOptions) -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            geometry,
            options,
        }
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append a page showing `record` at `placement`.
    pub fn add_page(&mut self, record: &ImageRecord, placement: &Placement) -> Result<()> {
        let xobject = load_image(record)?;

        let mut image = xobject.image;
        if let Some(smask) = xobject.smask {
            let smask_id = self.doc.add_object(smask);
            image.dict.set("SMask", smask_id);
        }
        let image_id = self.doc.add_object(image);

        let content_id = self.add_content(placement)?;
        let media_box = self.media_box();
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_NAME => image_id,
                },
            },
        });
        self.page_ids.push(page_id);

        log::debug!(
            "Page {}: {} at ({:.2}, {:.2}) size {:.2}x{:.2}",
            self.page_ids.len(),
            record.path.display(),
            placement.x,
            placement.y,
            placement.draw_width,
            placement.draw_height
        );
        Ok(())
    }

    fn add_content(&mut self, placement: &Placement) -> Result<ObjectId> {
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(placement.draw_width),
                        Object::Integer(0),
                        Object::Integer(0),
                        real(placement.draw_height),
                        real(placement.x),
                        real(placement.y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let data = content.encode()?;

        let stream = if self.options.compress_content {
            Stream::new(dictionary! { "Filter" => "FlateDecode" }, deflate(&data)?)
        } else {
            Stream::new(lopdf::Dictionary::new(), data)
        };
        Ok(self.doc.add_object(stream))
    }

    fn media_box(&self) -> Vec<Object> {
        vec![
            Object::Integer(0),
            Object::Integer(0),
            real(self.geometry.width),
            real(self.geometry.height),
        ]
    }

    /// Serialize the document and write it to `path`, replacing any
    /// existing file. Returns the number of pages written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputWrite`] if the destination cannot be written.
    pub fn finish<P: AsRef<Path>>(mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let bytes = self.serialize()?;
        fs::write(path, &bytes).map_err(|source| Error::OutputWrite {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!(
            "Wrote {} pages ({} bytes) to {}",
            self.page_ids.len(),
            bytes.len(),
            path.display()
        );
        Ok(self.page_ids.len())
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| Object::Reference(id)).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.page_ids.len() as i64,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let info = self.info_dictionary();
        let info_id = self.doc.add_object(info);
        self.doc.trailer.set("Info", info_id);

        let mut buf = Vec::new();
        self.doc.save_to(&mut buf)?;
        Ok(buf)
    }

    fn info_dictionary(&self) -> lopdf::Dictionary {
        let mut info = dictionary! {
            "Producer" => Object::string_literal(self.options.producer.as_str()),
        };
        if let Some(ref title) = self.options.title {
            info.set("Title", Object::string_literal(title.as_str()));
        }
        if self.options.creation_date {
            let now = chrono::Local::now();
            info.set("CreationDate", Object::string_literal(pdf_date(&now)));
        }
        info
    }
}

fn real(value: f64) -> Object {
    (value as f32).into()
}

/// Format a timestamp as a PDF date string, e.g. `D:20240131120000+01'00'`.
fn pdf_date<Tz: chrono::TimeZone>(time: &chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let offset = time.format("%z").to_string();
    let (hours, minutes) = offset.split_at(offset.len().saturating_sub(2));
    format!("D:{}{}'{}'", time.format("%Y%m%d%H%M%S"), hours, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_pdf_date() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let time = tz.with_ymd_and_hms(2024, 1, 31, 12, 0, 5).unwrap();
        assert_eq!(pdf_date(&time), "D:20240131120005+01'00'");
    }

    #[test]
    fn test_empty_writer_serializes() {
        let geometry = PageGeometry::from_aspect_ratio(1.5);
        let mut writer = PdfWriter::new(geometry, ConvertOptions::new().reproducible());
        assert_eq!(writer.page_count(), 0);
        let bytes = writer.serialize().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 0);
    }
}
