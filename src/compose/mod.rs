//! Page composition: geometry, placement, and PDF assembly.
//!
//! The page size is derived once from the first record; every record then
//! gets its own page with the image fitted and centered.
//!
//! # Example
//!
//! ```no_run
//! use images2pdf::compose::compose;
//! use images2pdf::inspect::{analyze_all, scan_folder};
//!
//! fn main() -> images2pdf::Result<()> {
//!     let records = analyze_all(scan_folder("images")?)?;
//!     let pages = compose(&records, "slides.pdf")?;
//!     println!("{} pages", pages);
//!     Ok(())
//! }
//! ```

mod embed;
mod observer;
mod options;
mod writer;

pub use embed::{load_image, ImageXObject};
pub use observer::{ConversionObserver, NoopObserver};
pub use options::ConvertOptions;
pub use writer::PdfWriter;

use crate::error::Result;
use crate::model::{ImageRecord, PageGeometry};
use std::path::Path;

/// Build a PDF from `records`, one page each, and write it to `output`.
///
/// Returns the number of pages written. An empty slice writes nothing and
/// returns `0`.
pub fn compose<P: AsRef<Path>>(records: &[ImageRecord], output: P) -> Result<usize> {
    compose_with(records, output, &ConvertOptions::default(), &mut NoopObserver)
}

/// [`compose`] with explicit options and a progress observer.
pub fn compose_with<P: AsRef<Path>>(
    records: &[ImageRecord],
    output: P,
    options: &ConvertOptions,
    observer: &mut dyn ConversionObserver,
) -> Result<usize> {
    let Some(first) = records.first() else {
        return Ok(0);
    };

    let geometry = PageGeometry::from_record(first);
    log::debug!(
        "Page size {:.2}x{:.2} pt from {}",
        geometry.width,
        geometry.height,
        first.path.display()
    );

    let mut writer = PdfWriter::new(geometry, options.clone());
    let total = records.len();
    for (idx, record) in records.iter().enumerate() {
        let placement = geometry.place_record(record);
        writer.add_page(record, &placement)?;
        observer.on_page_added(idx + 1, total, record, &placement);
    }

    writer.finish(output)
}
