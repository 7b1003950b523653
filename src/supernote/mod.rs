//! Core note file reader module

pub mod codec;
pub mod format;
pub mod reader;
pub mod types;
mod utils;

pub use reader::{decode_all, decode_page, load_notebook, parse_metadata, NoteReader, PageBitmaps};
pub use types::error::{NoteError, Result};
