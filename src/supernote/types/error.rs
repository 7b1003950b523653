//! Custom error types for the supernote-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum NoteError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// None of the known signature families matched the leading bytes of the file.
    #[error("Unsupported file format: signature found '{found}'")]
    UnsupportedFormat { found: String },

    /// A block address or declared block length reaches past the end of the file.
    #[error("Truncated read at address {address:#x}: expected {expected} bytes, only {available} available")]
    TruncatedRead {
        address: u64,
        expected: u64,
        available: u64,
    },

    /// A block was read but its content does not have the required structure.
    #[error("Malformed block: {0}")]
    MalformedBlock(String),

    /// A page or layer declares a pixel protocol outside the known codecs.
    #[error("Unknown decode protocol: {0}")]
    UnknownProtocol(String),

    /// The run-length decoder produced a buffer of the wrong size.
    #[error("Decoded bitmap size mismatch: expected {expected} bytes, but found {found} bytes")]
    DecodeSizeMismatch { expected: u64, found: u64 },

    /// A run-length stream used a color code the selected colormap does not define.
    #[error("Unknown color code {code:#04x} in run-length stream")]
    UnknownColorCode { code: u8 },

    /// An error occurred while inflating a compressed bitmap.
    #[error("Decompression failed: {0}")]
    DecompressionError(String),

    /// A palette was constructed with values that do not fit its color mode.
    #[error("Invalid color palette: {0}")]
    InvalidPalette(String),

    /// A page index was outside the document.
    #[error("Page number out of range: {page} (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// A layer index was outside the fixed layer slots of a page.
    #[error("Layer number out of range: {layer}")]
    LayerOutOfRange { layer: usize },
}

/// A convenience `Result` type alias using the crate's `NoteError` type.
pub type Result<T> = std::result::Result<T, NoteError>;
