//! # supernote-reader
//!
//! A reader for Supernote handwriting documents (`.note` and `.mark` files).
//! Reconstructs the document structure (pages, layers, titles, links,
//! keywords) and decodes the bitmap of every drawing layer.
//!
//! Supports the original `SN_FILE_ASA_` container and every known
//! `SN_FILE_VER_` release of the X-series firmware.
//!
//! ```no_run
//! use supernote_reader::{ColorPalette, NoteReader, Policy};
//!
//! let mut reader = NoteReader::open("notebook.note", Policy::Strict)?;
//! let notebook = reader.load_notebook()?;
//! let bitmaps = supernote_reader::decode_page(&notebook, 0, &ColorPalette::grayscale())?;
//! # Ok::<(), supernote_reader::NoteError>(())
//! ```
pub mod supernote;

// Re-export the main types for convenience
pub use supernote::{
    decode_all,
    decode_page,
    load_notebook,
    parse_metadata,
    NoteError,
    NoteReader,
    PageBitmaps,
    Result,
    codec::{DecodedBitmap, RleVariant},
    format::signature::detect_family,
    types::{
        models::{
            DocumentMetadata,
            Family,
            FooterMetadata,
            LinkDirection,
            LinkType,
            MetadataMap,
            MetadataValue,
            PageMetadata,
            Policy,
            Protocol,
            StyleUsageType,
        },
        notebook::{Cover, Keyword, Layer, Link, Notebook, Page, Title},
        palette::{ColorMode, ColorPalette},
    },
};
