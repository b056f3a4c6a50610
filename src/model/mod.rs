//! Data model shared by the inspector and the composer.
//!
//! Records describe input images, geometry types describe pages and where
//! each image lands on them. All of them are plain values.

mod geometry;
mod record;
mod summary;

pub use geometry::{PageGeometry, Placement, MAX_PAGE_HEIGHT, MAX_PAGE_WIDTH, POINTS_PER_INCH};
pub use record::{ColorMode, Dpi, ImageRecord, DEFAULT_DPI};
pub use summary::ConversionSummary;
