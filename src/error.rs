//! Error types for images2pdf library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for images2pdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting images to PDF.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading directories or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input folder does not exist.
    #[error("Folder '{}' does not exist", .0.display())]
    FolderNotFound(PathBuf),

    /// The input path exists but is not a directory.
    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// An image could not be opened or decoded.
    #[error("Cannot read image '{}': {reason}", path.display())]
    UnreadableImage {
        /// Path of the offending file
        path: PathBuf,
        /// Human-readable cause
        reason: String,
    },

    /// The finished document could not be written.
    #[error("Cannot write '{}': {source}", path.display())]
    OutputWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Error assembling the PDF structure.
    #[error("PDF assembly error: {0}")]
    Pdf(String),
}

impl Error {
    /// Build an [`Error::UnreadableImage`] for `path`.
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::UnreadableImage {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}
