//! Decoding of `<KEY:VALUE>` metadata blocks.

use std::io::{Read, Seek};
use std::sync::OnceLock;
use log::{trace, warn};
use regex::Regex;

use crate::supernote::types::error::Result;
use crate::supernote::types::models::MetadataMap;
use super::block;

/// Matches one `<KEY:VALUE>` token. Neither part may contain `<`, `>` or `:`.
static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    TOKEN_PATTERN.get_or_init(|| Regex::new(r"<([^:<>]+):([^:<>]*)>").expect("Invalid metadata token pattern"))
}

/// Decodes every `<KEY:VALUE>` token of `text`, left to right.
///
/// Text without any token yields an empty map.
pub fn decode(text: &str) -> MetadataMap {
    let mut map = MetadataMap::new();
    for cap in token_regex().captures_iter(text) {
        map.push(&cap[1], &cap[2]);
    }
    map
}

/// Reads the block at `address` and decodes it as metadata.
///
/// An absent address (`<= 0`) yields an empty map.
pub fn parse_block<R: Read + Seek>(file: &mut R, address: i64) -> Result<MetadataMap> {
    let Some(bytes) = block::read_block(file, address)? else {
        return Ok(MetadataMap::new());
    };

    let text = match std::str::from_utf8(&bytes) {
        Ok(text) => std::borrow::Cow::Borrowed(text),
        Err(e) => {
            warn!("Metadata block at {:#x} is not valid UTF-8 ({}), decoding lossily", address, e);
            String::from_utf8_lossy(&bytes)
        }
    };

    let map = decode(&text);
    if map.is_empty() && !bytes.is_empty() {
        warn!("Metadata block at {:#x} ({} bytes) contains no tokens", address, bytes.len());
    }
    trace!("Metadata block at {:#x}: {} keys", address, map.len());
    Ok(map)
}
