//! Document options.

/// Options for building the output document.
///
/// None of these affect page geometry or image placement.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Document title written to the PDF info dictionary
    pub title: Option<String>,

    /// Producer string written to the PDF info dictionary
    pub producer: String,

    /// Whether to Flate-compress page content streams
    pub compress_content: bool,

    /// Whether to stamp the creation date
    pub creation_date: bool,
}

impl ConvertOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the producer string.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress_content = compress;
        self
    }

    /// Enable or disable the creation date stamp.
    pub fn with_creation_date(mut self, stamp: bool) -> Self {
        self.creation_date = stamp;
        self
    }

    /// Produce byte-identical output for identical input.
    pub fn reproducible(mut self) -> Self {
        self.creation_date = false;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            title: None,
            producer: format!("images2pdf {}", env!("CARGO_PKG_VERSION")),
            compress_content: true,
            creation_date: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert!(options.title.is_none());
        assert!(options.producer.starts_with("images2pdf "));
        assert!(options.compress_content);
        assert!(options.creation_date);
    }

    #[test]
    fn test_builder() {
        let options = ConvertOptions::new()
            .with_title("Quarterly review")
            .with_producer("test")
            .with_compression(false)
            .reproducible();

        assert_eq!(options.title.as_deref(), Some("Quarterly review"));
        assert_eq!(options.producer, "test");
        assert!(!options.compress_content);
        assert!(!options.creation_date);
    }
}
