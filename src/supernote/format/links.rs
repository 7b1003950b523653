//! Links embedded in page templates.
//!
//! A page carrying an `EXTERNALLINKINFO` address points to a UTF-8 text
//! block of `|`-separated records. Each record has at least nine
//! `,`-separated base64 fields:
//!
//! ```text
//! page_out, page_id, page_in, left, top, width, height, link_type, target_file
//! ```
//!
//! Page numbers are 1-based in the record.

use base64::{engine::general_purpose::STANDARD, Engine};
use log::{debug, trace};

use crate::supernote::types::error::{NoteError, Result};
use crate::supernote::types::models::{LinkDirection, LinkType, MetadataMap};
use crate::supernote::types::notebook::Link;
use crate::supernote::utils;

/// Minimum number of fields in one template link record.
pub const TEMPLATE_LINK_FIELDS: usize = 9;

/// Decodes every record of an external link info block.
///
/// Each record yields an outbound link on `page_out`. Links of type
/// [`LinkType::Page`] also yield the matching inbound link on `page_in`.
pub fn parse_template_links(content: &[u8]) -> Result<Vec<Link>> {
    let text = std::str::from_utf8(content).map_err(|e| {
        NoteError::MalformedBlock(format!("Template link block is not UTF-8: {}", e))
    })?;

    let mut links = Vec::new();
    for record in text.split('|').filter(|record| !record.trim().is_empty()) {
        let fields = record
            .split(',')
            .map(decode_field)
            .collect::<Result<Vec<String>>>()?;
        if fields.len() < TEMPLATE_LINK_FIELDS {
            return Err(NoteError::MalformedBlock(format!(
                "Template link record has {} fields, expected at least {}",
                fields.len(),
                TEMPLATE_LINK_FIELDS
            )));
        }
        trace!("Template link record: {:?}", fields);

        let page_out = utils::page_index(utils::parse_int(&fields[0], "template page out")?, "template link")?;
        let page_id = utils::none_as_empty(&fields[1]);
        let page_in = utils::page_index(utils::parse_int(&fields[2], "template page in")?, "template link")?;
        let rect = utils::rect_edges(
            [
                utils::parse_int(&fields[3], "template rect left")?,
                utils::parse_int(&fields[4], "template rect top")?,
                utils::parse_int(&fields[5], "template rect width")?,
                utils::parse_int(&fields[6], "template rect height")?,
            ],
            "template link",
        )?;
        let link_type = LinkType::from(utils::parse_int(&fields[7], "template link type")?);
        let file_path = fields[8].clone();

        let outbound = Link {
            metadata: MetadataMap::new(),
            content: None,
            page_number: page_out,
            target_page: Some(page_in),
            position: rect.1,
            link_type,
            direction: LinkDirection::Out,
            rect,
            timestamp: String::new(),
            file_path,
            file_id: String::new(),
            page_id,
        };

        let inbound = (link_type == LinkType::Page).then(|| Link {
            page_number: page_in,
            target_page: Some(page_out),
            direction: LinkDirection::In,
            ..outbound.clone()
        });

        links.push(outbound);
        links.extend(inbound);
    }

    debug!("Decoded {} template links", links.len());
    Ok(links)
}

fn decode_field(field: &str) -> Result<String> {
    let bytes = STANDARD.decode(field.trim()).map_err(|e| {
        NoteError::MalformedBlock(format!("Invalid base64 in template link field '{}': {}", field, e))
    })?;
    String::from_utf8(bytes).map_err(|e| {
        NoteError::MalformedBlock(format!("Template link field is not UTF-8: {}", e))
    })
}
