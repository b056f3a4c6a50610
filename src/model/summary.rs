//! Outcome of a conversion run.

use super::PageGeometry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a conversion produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionSummary {
    /// Number of pages written
    pub pages: usize,

    /// Written document, `None` when no images were found
    pub output: Option<PathBuf>,

    /// Page size used for every page
    pub geometry: Option<PageGeometry>,
}

impl ConversionSummary {
    /// Summary of a run that found nothing to convert.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether no document was produced.
    pub fn is_empty(&self) -> bool {
        self.pages == 0
    }
}
