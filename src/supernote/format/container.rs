//! # Container Parsing
//!
//! Walks the address chain of a note file once its family is known:
//!
//! ```text
//! [last 4 bytes]  → footer block
//! footer          → FILE_FEATURE → header block
//!                 → PAGE*        → page blocks
//!                 → KEYWORD_* / TITLE_* / LINK*  (family B)
//! page            → MAINLAYER / LAYER1..3 / BGLAYER (family B)
//! ```
//!
//! Addresses are only checked when they are dereferenced. Any block that
//! cannot be read is fatal for the whole document.

use std::io::{Read, Seek};
use log::{debug, info};

use crate::supernote::types::error::{NoteError, Result};
use crate::supernote::types::models::{
    DocumentMetadata, Family, FooterMetadata, MetadataMap, PageMetadata, LAYER_KEYS,
};
use crate::supernote::utils;
use super::{block, metadata};

/// Parses the full metadata tree of a file whose family is already known.
pub fn parse<R: Read + Seek>(
    file: &mut R,
    family: Family,
    signature: String,
) -> Result<DocumentMetadata> {
    info!("Parsing {:?} family container", family);

    let footer_address = block::read_footer_address(file)?;
    debug!("Footer block at {:#x}", footer_address);
    let footer = parse_footer(file, family, footer_address)?;

    let header_address = footer
        .map
        .get_str("FILE_FEATURE")
        .ok_or_else(|| {
            NoteError::MalformedBlock(format!(
                "Footer at {:#x} has no FILE_FEATURE entry",
                footer_address
            ))
        })
        .and_then(|value| utils::parse_address(value, "FILE_FEATURE"))?;
    debug!("Header block at {:#x}", header_address);
    let header = metadata::parse_block(file, header_address)?;

    let page_addresses = page_addresses(&footer.map, family)?;
    let pages = page_addresses
        .into_iter()
        .map(|address| parse_page(file, family, address))
        .collect::<Result<Vec<_>>>()?;

    info!("Container parsed: {} pages", pages.len());

    Ok(DocumentMetadata {
        signature,
        family,
        header,
        footer,
        pages,
    })
}

/// Parses the footer and, for family B, the item blocks it points to.
fn parse_footer<R: Read + Seek>(
    file: &mut R,
    family: Family,
    address: i64,
) -> Result<FooterMetadata> {
    let map = metadata::parse_block(file, address)?;
    let mut footer = FooterMetadata {
        map,
        ..Default::default()
    };

    if family == Family::B {
        footer.keywords = parse_items(file, &footer.map, "KEYWORD_")?;
        footer.titles = parse_items(file, &footer.map, "TITLE_")?;
        // `LINK` covers both LINKO_ and LINKI_ keys
        footer.links = parse_items(file, &footer.map, "LINK")?;
        debug!(
            "Footer items: {} keywords, {} titles, {} links",
            footer.keywords.len(),
            footer.titles.len(),
            footer.links.len()
        );
    }

    Ok(footer)
}

fn parse_items<R: Read + Seek>(
    file: &mut R,
    footer: &MetadataMap,
    prefix: &str,
) -> Result<Vec<MetadataMap>> {
    utils::addresses_with_prefix(footer, prefix)?
        .into_iter()
        .map(|address| metadata::parse_block(file, address))
        .collect()
}

/// Page addresses in footer order.
///
/// Family A stores them under a single `PAGE` key, family B under one
/// `PAGExxxx` key per page.
fn page_addresses(footer: &MetadataMap, family: Family) -> Result<Vec<i64>> {
    match family {
        Family::A => match footer.get("PAGE") {
            Some(value) => value
                .values()
                .map(|item| utils::parse_address(item, "PAGE"))
                .collect(),
            None => Ok(Vec::new()),
        },
        Family::B => utils::addresses_with_prefix(footer, "PAGE"),
    }
}

fn parse_page<R: Read + Seek>(file: &mut R, family: Family, address: i64) -> Result<PageMetadata> {
    debug!("Page block at {:#x}", address);
    let map = metadata::parse_block(file, address)?;

    let layers = match family {
        Family::A => None,
        Family::B => {
            let mut layers = Vec::with_capacity(LAYER_KEYS.len());
            for key in LAYER_KEYS {
                let layer_address = utils::address_of(&map, key)?;
                layers.push(metadata::parse_block(file, layer_address)?);
            }
            Some(layers)
        }
    };

    Ok(PageMetadata { map, layers })
}
