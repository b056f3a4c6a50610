//! # images2pdf
//!
//! Turn a folder of still images into a PDF slide deck, one image per page.
//!
//! The page size is taken from the first image (sorted by file name): a
//! landscape image gets an 11in wide page, a portrait or square image an
//! 8.5in tall one, with the other side following the image's aspect ratio.
//! Every image is then scaled to fit that page and centered, without being
//! resampled.
//!
//! ## Quick Start
//!
//! ```no_run
//! use images2pdf::convert_folder;
//!
//! fn main() -> images2pdf::Result<()> {
//!     let summary = convert_folder("images", "output_slides.pdf")?;
//!     println!("Pages: {}", summary.pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Supported inputs
//!
//! PNG, JPEG, GIF (first frame) and BMP files directly inside the folder.
//! Matching is by extension, case-insensitively; subfolders are ignored.

pub mod compose;
pub mod detect;
pub mod error;
pub mod inspect;
pub mod model;

// Re-export commonly used types
pub use compose::{compose, ConversionObserver, ConvertOptions, NoopObserver, PdfWriter};
pub use detect::{ImageFormat, SUPPORTED_EXTENSIONS};
pub use error::{Error, Result};
pub use inspect::{analyze, analyze_all, scan_folder, validate_folder};
pub use model::{ColorMode, ConversionSummary, Dpi, ImageRecord, PageGeometry, Placement};

use std::path::Path;

/// Convert every image in `folder` into a PDF at `output`.
///
/// A folder without images is not an error: nothing is written and the
/// summary reports zero pages.
///
/// # Errors
///
/// * [`Error::FolderNotFound`] / [`Error::NotADirectory`] for a bad folder
/// * [`Error::UnreadableImage`] for the first image that cannot be read
/// * [`Error::OutputWrite`] if the PDF cannot be written
pub fn convert_folder<P: AsRef<Path>, Q: AsRef<Path>>(
    folder: P,
    output: Q,
) -> Result<ConversionSummary> {
    Images2Pdf::new().convert(folder, output)
}

/// Builder for configuring a conversion.
///
/// # Example
///
/// ```no_run
/// use images2pdf::Images2Pdf;
///
/// let summary = Images2Pdf::new()
///     .with_title("Team offsite")
///     .reproducible()
///     .convert("photos", "offsite.pdf")?;
/// # Ok::<(), images2pdf::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Images2Pdf {
    options: ConvertOptions,
}

impl Images2Pdf {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all document options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options = self.options.with_title(title);
        self
    }

    /// Omit the creation date so identical input yields identical bytes.
    pub fn reproducible(mut self) -> Self {
        self.options = self.options.reproducible();
        self
    }

    /// Current document options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Scan and analyze `folder` without writing anything.
    pub fn inspect<P: AsRef<Path>>(&self, folder: P) -> Result<Vec<ImageRecord>> {
        self.inspect_observed(folder, &mut NoopObserver)
    }

    /// [`Images2Pdf::inspect`] reporting progress to `observer`.
    pub fn inspect_observed<P: AsRef<Path>>(
        &self,
        folder: P,
        observer: &mut dyn ConversionObserver,
    ) -> Result<Vec<ImageRecord>> {
        let paths = scan_folder(folder)?;
        observer.on_scan_complete(paths.len());

        let total = paths.len();
        let mut records = Vec::with_capacity(total);
        for (idx, path) in paths.iter().enumerate() {
            let record = analyze(path)?;
            observer.on_image_analyzed(idx + 1, total, &record);
            records.push(record);
        }
        Ok(records)
    }

    /// Convert `folder` into a PDF at `output`.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        self,
        folder: P,
        output: Q,
    ) -> Result<ConversionSummary> {
        self.convert_observed(folder, output, &mut NoopObserver)
    }

    /// [`Images2Pdf::convert`] reporting progress to `observer`.
    pub fn convert_observed<P: AsRef<Path>, Q: AsRef<Path>>(
        self,
        folder: P,
        output: Q,
        observer: &mut dyn ConversionObserver,
    ) -> Result<ConversionSummary> {
        let folder = folder.as_ref();
        let output = output.as_ref();

        let records = self.inspect_observed(folder, observer)?;
        if records.is_empty() {
            log::info!("No images found in {}", folder.display());
            let summary = ConversionSummary::empty();
            observer.on_finished(&summary);
            return Ok(summary);
        }

        let pages = compose::compose_with(&records, output, &self.options, observer)?;
        let summary = ConversionSummary {
            pages,
            output: Some(output.to_path_buf()),
            geometry: Some(PageGeometry::from_record(&records[0])),
        };
        observer.on_finished(&summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = Images2Pdf::default();
        assert!(builder.options().title.is_none());
        assert!(builder.options().creation_date);
    }

    #[test]
    fn test_builder_chained() {
        let builder = Images2Pdf::new().with_title("Deck").reproducible();
        assert_eq!(builder.options().title.as_deref(), Some("Deck"));
        assert!(!builder.options().creation_date);
    }

    #[test]
    fn test_builder_with_options() {
        let builder = Images2Pdf::new().with_options(ConvertOptions::new().with_compression(false));
        assert!(!builder.options().compress_content);
    }

    #[test]
    fn test_convert_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_folder(dir.path().join("nope"), dir.path().join("out.pdf"));
        assert!(matches!(result, Err(Error::FolderNotFound(_))));
    }

    #[test]
    fn test_convert_empty_folder_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");
        let summary = convert_folder(dir.path(), &output).unwrap();
        assert_eq!(summary.pages, 0);
        assert!(summary.is_empty());
        assert!(summary.output.is_none());
        assert!(!output.exists());
    }
}
