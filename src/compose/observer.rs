//! Progress callbacks for a conversion run.
//!
//! # Example
//!
//! ```
//! use images2pdf::compose::ConversionObserver;
//! use images2pdf::model::{ImageRecord, Placement};
//!
//! struct PageCounter(usize);
//!
//! impl ConversionObserver for PageCounter {
//!     fn on_page_added(&mut self, _: usize, _: usize, _: &ImageRecord, _: &Placement) {
//!         self.0 += 1;
//!     }
//! }
//! ```

use crate::model::{ConversionSummary, ImageRecord, Placement};

/// Receives progress notifications while a folder is converted.
///
/// All methods do nothing by default. Indices are 1-based.
pub trait ConversionObserver {
    /// Called once the folder scan has found `count` images.
    fn on_scan_complete(&mut self, count: usize) {
        let _ = count;
    }

    /// Called after each image has been analyzed.
    fn on_image_analyzed(&mut self, index: usize, total: usize, record: &ImageRecord) {
        let _ = (index, total, record);
    }

    /// Called after each page has been added to the document.
    fn on_page_added(
        &mut self,
        index: usize,
        total: usize,
        record: &ImageRecord,
        placement: &Placement,
    ) {
        let _ = (index, total, record, placement);
    }

    /// Called after the document has been written (or skipped when empty).
    fn on_finished(&mut self, summary: &ConversionSummary) {
        let _ = summary;
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ConversionObserver for NoopObserver {}
