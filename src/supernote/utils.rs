//! Small parsing helpers for metadata values.

use super::types::error::{NoteError, Result};
use super::types::models::MetadataMap;

/// Parses a decimal block address. Zero and negative values mean "absent".
pub fn parse_address(value: &str, key: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        NoteError::MalformedBlock(format!("Invalid address for '{}': '{}'", key, value))
    })
}

/// Collects every address stored under keys starting with `prefix`.
///
/// List values contribute one address per element, keys in block order.
pub fn addresses_with_prefix(map: &MetadataMap, prefix: &str) -> Result<Vec<i64>> {
    let mut addresses = Vec::new();
    for (key, value) in map.with_prefix(prefix) {
        for item in value.values() {
            addresses.push(parse_address(item, key)?);
        }
    }
    Ok(addresses)
}

/// Address stored under `key`, or 0 when the key is missing.
pub fn address_of(map: &MetadataMap, key: &str) -> Result<i64> {
    match map.get_str(key) {
        Some(value) => parse_address(value, key),
        None => Ok(0),
    }
}

/// Integer stored under `key`, or `default` when the key is missing.
pub fn int_or(map: &MetadataMap, key: &str, default: i64) -> Result<i64> {
    match map.get_str(key) {
        Some(value) => parse_int(value, key),
        None => Ok(default),
    }
}

/// Parses a decimal integer stored under `key`.
pub fn parse_int(value: &str, key: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        NoteError::MalformedBlock(format!("Invalid integer for '{}': '{}'", key, value))
    })
}

/// Converts a 1-based page number from the container into a 0-based index.
pub fn page_index(number: i64, context: &str) -> Result<usize> {
    usize::try_from(number)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| {
            NoteError::MalformedBlock(format!("Invalid page number {} in {}", number, context))
        })
}

/// Extracts the 0-based page index from a footer key such as `TITLE_01234567`.
///
/// Characters 6..10 hold the 1-based page number.
pub fn page_index_from_key(key: &str) -> Result<usize> {
    let digits = key.get(6..10).ok_or_else(|| {
        NoteError::MalformedBlock(format!("Footer key too short for a page number: '{}'", key))
    })?;
    let number = parse_int(digits, key)?;
    page_index(number, key)
}

/// Page indices for every entry under keys starting with `prefix`.
///
/// A key holding a list contributes its page once per element, so the result
/// lines up with [`addresses_with_prefix`].
pub fn page_indices_with_prefix(map: &MetadataMap, prefix: &str) -> Result<Vec<usize>> {
    let mut pages = Vec::new();
    for (key, value) in map.with_prefix(prefix) {
        let page = page_index_from_key(key)?;
        pages.extend(std::iter::repeat_n(page, value.len()));
    }
    Ok(pages)
}

/// Parses a `left,top,width,height` rectangle.
pub fn parse_rect(value: &str, key: &str) -> Result<[i64; 4]> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() < 4 {
        return Err(NoteError::MalformedBlock(format!(
            "Rectangle for '{}' needs 4 fields: '{}'",
            key, value
        )));
    }
    let mut rect = [0i64; 4];
    for (slot, part) in rect.iter_mut().zip(&parts) {
        *slot = parse_int(part, key)?;
    }
    Ok(rect)
}

/// Converts `left,top,width,height` into `(left, top, right, bottom)`.
pub fn rect_edges(rect: [i64; 4], key: &str) -> Result<(i64, i64, i64, i64)> {
    let [left, top, width, height] = rect;
    match (left.checked_add(width), top.checked_add(height)) {
        (Some(right), Some(bottom)) => Ok((left, top, right, bottom)),
        _ => Err(NoteError::MalformedBlock(format!(
            "Rectangle for '{}' overflows: {:?}",
            key, rect
        ))),
    }
}

/// Returns `value`, or an empty string when it is the literal `none`.
pub fn none_as_empty(value: &str) -> String {
    if value == "none" { String::new() } else { value.to_string() }
}
