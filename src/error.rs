//! Error types for the casemask library.

use std::io;
use thiserror::Error;

/// Result type alias for casemask operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while planning or applying redactions.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reported by the PDF backend.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The detection manifest is malformed (missing required fields,
    /// non-finite coordinates, zero-sized pages).
    #[error("Invalid detection manifest: {0}")]
    InvalidManifest(String),

    /// Page number is out of range for the document.
    #[error("Page {page} is out of range (document has {pages} pages)")]
    PageOutOfRange {
        /// Requested page index (0-based)
        page: usize,
        /// Number of pages in the document
        pages: usize,
    },

    /// A region was staged on a page whose redactions were already
    /// burned in. Burn-in is one-way; late regions would be lost.
    #[error("Page {page} is already committed; no further regions may be staged")]
    PageCommitted {
        /// Offending page index (0-based)
        page: usize,
    },

    /// A page-range extraction was requested with an inverted range.
    #[error("Empty page range: {start}..={end}")]
    EmptyPageRange {
        /// Range start (0-based, inclusive)
        start: usize,
        /// Range end (0-based, inclusive)
        end: usize,
    },

    /// Error serializing output (plans, in-memory document dumps).
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
