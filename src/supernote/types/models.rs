//! Core data structures for the note container.
//!
//! This module defines the fundamental types shared by the parser layers:
//! - Metadata blocks and their values
//! - The parsed document metadata tree
//! - Format family, policy and protocol enumerations

use super::error::{NoteError, Result};

/// Size in bytes of an absolute block address.
pub const ADDRESS_SIZE: u64 = 4;

/// Size in bytes of the length prefix in front of every block.
pub const LENGTH_FIELD_SIZE: u64 = 4;

/// Number of layer slots on a layered page.
pub const MAX_LAYERS: usize = 5;

/// Layer keys of a page block, in slot order.
pub const LAYER_KEYS: [&str; MAX_LAYERS] = ["MAINLAYER", "LAYER1", "LAYER2", "LAYER3", "BGLAYER"];

/// Caller directive for signatures that are not in the known list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Reject any signature that is not an exact known match.
    #[default]
    Strict,
    /// Accept a signature matching the family pattern as the newest known one.
    Loose,
}

/// Container grammar, selected once from the file signature.
///
/// - `A`: `SN_FILE_ASA_` files from the first device generation, no layers.
/// - `B`: `noteSN_FILE_VER_` / `markSN_FILE_VER_` files, a superset of `A`
///   with layers, keywords, titles and links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    A,
    B,
}

/// Pixel encoding named by a page or layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// `SN_ASA_COMPRESS`: raw deflate stream of 8-bit cells.
    Flate,
    /// `RATTA_RLE`: proprietary color run-length stream.
    RattaRle,
}

impl TryFrom<&str> for Protocol {
    type Error = NoteError;
    fn try_from(value: &str) -> Result<Self> {
        match value {
            "SN_ASA_COMPRESS" => Ok(Self::Flate),
            "RATTA_RLE" => Ok(Self::RattaRle),
            _ => Err(NoteError::UnknownProtocol(value.to_string())),
        }
    }
}

/// A metadata value: one string, or every value of a key that recurs in its block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    Scalar(String),
    List(Vec<String>),
}

impl MetadataValue {
    /// Returns the value if it is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            MetadataValue::Scalar(value) => Some(value),
            MetadataValue::List(_) => None,
        }
    }

    /// Returns the scalar, or the first element of a list.
    pub fn first(&self) -> Option<&str> {
        match self {
            MetadataValue::Scalar(value) => Some(value),
            MetadataValue::List(values) => values.first().map(String::as_str),
        }
    }

    /// Iterates over all values in source order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            MetadataValue::Scalar(value) => std::slice::from_ref(value),
            MetadataValue::List(values) => values,
        };
        slice.iter().map(String::as_str)
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        match self {
            MetadataValue::Scalar(_) => 1,
            MetadataValue::List(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered key/value map decoded from one `<KEY:VALUE>` block.
///
/// Keys keep the order of their first appearance. A key seen a second time
/// turns its scalar into a list; later occurrences append to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataMap {
    entries: Vec<(String, MetadataValue)>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `key`.
    pub fn push(&mut self, key: &str, value: &str) {
        let Some(index) = self.entries.iter().position(|(k, _)| k == key) else {
            self.entries
                .push((key.to_string(), MetadataValue::Scalar(value.to_string())));
            return;
        };
        let existing = &mut self.entries[index].1;
        match existing {
            MetadataValue::Scalar(first) => {
                let first = std::mem::take(first);
                *existing = MetadataValue::List(vec![first, value.to_string()]);
            }
            MetadataValue::List(values) => values.push(value.to_string()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the scalar value of `key`, or the first value if it recurs.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::first)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries whose key starts with `prefix`, in block order.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a MetadataValue)> + 'a {
        self.iter().filter(move |(k, _)| k.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The footer block plus the item blocks it indexes.
///
/// `keywords`, `titles` and `links` are only resolved for family `B`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FooterMetadata {
    pub map: MetadataMap,
    pub keywords: Vec<MetadataMap>,
    pub titles: Vec<MetadataMap>,
    pub links: Vec<MetadataMap>,
}

/// A page block and, for layered pages, its layer blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub map: MetadataMap,
    /// Exactly [`MAX_LAYERS`] entries in [`LAYER_KEYS`] order when present.
    /// An empty map stands for a layer the page does not use.
    pub layers: Option<Vec<MetadataMap>>,
}

impl PageMetadata {
    pub fn is_layer_supported(&self) -> bool {
        self.layers.is_some()
    }
}

/// Structural metadata of a whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub signature: String,
    pub family: Family,
    pub header: MetadataMap,
    pub footer: FooterMetadata,
    pub pages: Vec<PageMetadata>,
}

impl DocumentMetadata {
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Whether `page` carries layer blocks.
    pub fn is_layer_supported(&self, page: usize) -> Result<bool> {
        self.pages
            .get(page)
            .map(PageMetadata::is_layer_supported)
            .ok_or(NoteError::PageOutOfRange {
                page,
                total: self.pages.len(),
            })
    }
}

/// Target kind of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Page,
    File,
    Web,
    Other(i64),
}

impl From<i64> for LinkType {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Page,
            1 => Self::File,
            4 => Self::Web,
            other => Self::Other(other),
        }
    }
}

/// Whether a link leaves from or arrives at its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Out,
    In,
}

impl From<i64> for LinkDirection {
    fn from(value: i64) -> Self {
        if value == 1 { Self::In } else { Self::Out }
    }
}

/// How a document uses its template style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleUsageType {
    #[default]
    Default,
    Image,
    Pdf,
}

impl TryFrom<i64> for StyleUsageType {
    type Error = NoteError;
    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::Default),
            1 => Ok(Self::Image),
            2 => Ok(Self::Pdf),
            _ => Err(NoteError::MalformedBlock(format!(
                "Unknown style usage type: {}",
                value
            ))),
        }
    }
}
