//! File format parsing layer for note and mark files.
//!
//! This module provides the mid-level parsing layer that bridges between
//! raw file I/O and the high-level [`NoteReader`](crate::supernote::reader::NoteReader).
//!
//! # Module Organization
//!
//! - [`block`]: Reads length-prefixed blocks by absolute address
//! - [`metadata`]: Decodes `<KEY:VALUE>` metadata blocks
//! - [`signature`]: Identifies the format family from the leading bytes
//! - [`container`]: Walks footer, header, page and layer blocks
//! - [`links`]: Decodes links embedded in page templates
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Signature      │ ← signature::detect_family()
//! ├─────────────────┤
//! │  Content and    │ ← block::read_block()
//! │  metadata       │   metadata::parse_block()
//! │  blocks         │
//! ├─────────────────┤
//! │  Footer block   │ ← container::parse()
//! ├─────────────────┤
//! │  Footer address │ ← block::read_footer_address()
//! └─────────────────┘
//! ```

pub mod block;
pub mod container;
pub mod links;
pub mod metadata;
pub mod signature;
