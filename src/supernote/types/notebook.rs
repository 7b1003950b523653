//! The notebook tree built on top of [`DocumentMetadata`].
//!
//! Entities are constructed from metadata alone; their raw content buffers
//! stay `None` until the reader attaches them.

use super::error::{NoteError, Result};
use super::models::{
    DocumentMetadata, Family, LinkDirection, LinkType, MetadataMap, StyleUsageType,
};
use crate::supernote::utils;

/// Cover image of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cover {
    pub content: Option<Vec<u8>>,
}

/// A keyword marked by the user on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub metadata: MetadataMap,
    pub content: Option<Vec<u8>>,
    /// 0-based page index.
    pub page_number: usize,
    /// Top edge of the keyword rectangle.
    pub position: i64,
}

impl Keyword {
    pub fn from_metadata(metadata: MetadataMap) -> Result<Self> {
        let page_number = match metadata.get_str("KEYWORDPAGE") {
            Some(value) => utils::page_index(utils::parse_int(value, "KEYWORDPAGE")?, "KEYWORDPAGE")?,
            None => 0,
        };
        let position = rect_top(&metadata, "KEYWORDRECT")?;
        Ok(Self {
            metadata,
            content: None,
            page_number,
            position,
        })
    }

    /// Address of the keyword bitmap.
    pub fn content_address(&self) -> Result<i64> {
        utils::address_of(&self.metadata, "KEYWORDSITE")
    }
}

/// A title region on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub metadata: MetadataMap,
    pub content: Option<Vec<u8>>,
    /// 0-based page index, taken from the footer key.
    pub page_number: usize,
    pub position: i64,
}

impl Title {
    pub fn from_metadata(metadata: MetadataMap, page_number: usize) -> Result<Self> {
        let position = rect_top(&metadata, "TITLERECTORI")?;
        Ok(Self {
            metadata,
            content: None,
            page_number,
            position,
        })
    }

    pub fn content_address(&self) -> Result<i64> {
        utils::address_of(&self.metadata, "TITLEBITMAP")
    }
}

/// A link, either stored in the footer or embedded in a page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub metadata: MetadataMap,
    pub content: Option<Vec<u8>>,
    /// 0-based page the link sits on.
    pub page_number: usize,
    /// 0-based page at the other end, known for template links only.
    pub target_page: Option<usize>,
    pub position: i64,
    pub link_type: LinkType,
    pub direction: LinkDirection,
    /// `(left, top, right, bottom)`.
    pub rect: (i64, i64, i64, i64),
    pub timestamp: String,
    pub file_path: String,
    pub file_id: String,
    pub page_id: String,
}

impl Link {
    pub fn from_metadata(metadata: MetadataMap, page_number: usize) -> Result<Self> {
        let rect = match metadata.get_str("LINKRECT") {
            Some(value) => utils::rect_edges(utils::parse_rect(value, "LINKRECT")?, "LINKRECT")?,
            None => (0, 0, 0, 0),
        };
        let link_type = LinkType::from(utils::int_or(&metadata, "LINKTYPE", 0)?);
        let direction = LinkDirection::from(utils::int_or(&metadata, "LINKINOUT", 0)?);
        let text = |key: &str| metadata.get_str(key).unwrap_or_default().to_string();
        let timestamp = text("LINKTIMESTAMP");
        let file_path = text("LINKFILE");
        let file_id = utils::none_as_empty(&text("LINKFILEID"));
        let page_id = utils::none_as_empty(&text("PAGEID"));

        Ok(Self {
            metadata,
            content: None,
            page_number,
            target_page: None,
            position: rect.1,
            link_type,
            direction,
            rect,
            timestamp,
            file_path,
            file_id,
            page_id,
        })
    }

    pub fn content_address(&self) -> Result<i64> {
        utils::address_of(&self.metadata, "LINKBITMAP")
    }
}

/// One drawing plane of a layered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub metadata: MetadataMap,
    pub content: Option<Vec<u8>>,
    pub name: String,
    pub protocol: String,
}

impl Layer {
    pub fn from_metadata(metadata: MetadataMap) -> Self {
        let name = metadata.get_str("LAYERNAME").unwrap_or_default().to_string();
        let protocol = metadata.get_str("LAYERPROTOCOL").unwrap_or_default().to_string();
        Self {
            metadata,
            content: None,
            name,
            protocol,
        }
    }

    pub fn content_address(&self) -> Result<i64> {
        utils::address_of(&self.metadata, "LAYERBITMAP")
    }
}

/// A page with either fixed layer slots or a single flat bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub metadata: MetadataMap,
    /// Flat bitmap of a non-layered page.
    pub content: Option<Vec<u8>>,
    /// Five slots on layered pages, empty otherwise.
    pub layers: Vec<Option<Layer>>,
    pub protocol: String,
    pub style: String,
    pub style_hash: String,
    pub layer_info: String,
    pub layer_order: Vec<String>,
    pub page_id: String,
    pub recogn_status: i64,
    pub total_path: Option<Vec<u8>>,
    pub recogn_file: Option<Vec<u8>>,
    pub recogn_text: Option<Vec<u8>>,
    pub external_link_info: Option<Vec<u8>>,
}

impl Page {
    pub fn from_metadata(metadata: MetadataMap, layers: Option<Vec<MetadataMap>>) -> Result<Self> {
        let layers: Vec<Option<Layer>> = layers
            .unwrap_or_default()
            .into_iter()
            .map(|layer| (!layer.is_empty()).then(|| Layer::from_metadata(layer)))
            .collect();

        let text = |key: &str| metadata.get_str(key).unwrap_or_default().to_string();

        let protocol = if layers.is_empty() {
            text("PROTOCOL")
        } else {
            layers
                .first()
                .and_then(Option::as_ref)
                .map(|layer| layer.protocol.clone())
                .unwrap_or_default()
        };

        let style_hash = match text("PAGESTYLEMD5") {
            hash if hash == "0" => String::new(),
            hash => hash,
        };

        let layer_info = match text("LAYERINFO") {
            info if info.is_empty() || info == "none" => String::new(),
            info => info.replace('#', ":"),
        };

        let layer_order = match metadata.get_str("LAYERSEQ") {
            Some(seq) if !seq.is_empty() => seq.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            style: text("PAGESTYLE"),
            page_id: text("PAGEID"),
            recogn_status: utils::int_or(&metadata, "RECOGNSTATUS", 0)?,
            metadata,
            content: None,
            layers,
            protocol,
            style_hash,
            layer_info,
            layer_order,
            total_path: None,
            recogn_file: None,
            recogn_text: None,
            external_link_info: None,
        })
    }

    pub fn is_layer_supported(&self) -> bool {
        !self.layers.is_empty()
    }

    /// The layer in slot `layer`, `None` for an unused slot.
    pub fn layer(&self, layer: usize) -> Result<Option<&Layer>> {
        self.layers
            .get(layer)
            .map(Option::as_ref)
            .ok_or(NoteError::LayerOutOfRange { layer })
    }

    pub fn layer_mut(&mut self, layer: usize) -> Result<Option<&mut Layer>> {
        self.layers
            .get_mut(layer)
            .map(Option::as_mut)
            .ok_or(NoteError::LayerOutOfRange { layer })
    }

    pub fn total_path_address(&self) -> Result<i64> {
        utils::address_of(&self.metadata, "TOTALPATH")
    }

    pub fn recogn_file_address(&self) -> Result<i64> {
        utils::address_of(&self.metadata, "RECOGNFILE")
    }

    pub fn recogn_text_address(&self) -> Result<i64> {
        utils::address_of(&self.metadata, "RECOGNTEXT")
    }

    pub fn external_link_info_address(&self) -> Result<i64> {
        utils::address_of(&self.metadata, "EXTERNALLINKINFO")
    }
}

/// A parsed document with every entity it indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    pub metadata: DocumentMetadata,
    pub cover: Cover,
    pub keywords: Vec<Keyword>,
    pub titles: Vec<Title>,
    pub links: Vec<Link>,
    pub template_links: Vec<Link>,
    pub pages: Vec<Page>,
}

impl Notebook {
    /// Builds the entity tree. Content buffers are left empty.
    pub fn from_metadata(metadata: DocumentMetadata) -> Result<Self> {
        let footer = &metadata.footer;

        let keywords = footer
            .keywords
            .iter()
            .cloned()
            .map(Keyword::from_metadata)
            .collect::<Result<Vec<_>>>()?;

        // Footer items are only resolved for family B
        let item_pages = |prefix: &str| match metadata.family {
            Family::B => utils::page_indices_with_prefix(&footer.map, prefix),
            Family::A => Ok(Vec::new()),
        };

        let title_pages = item_pages("TITLE_")?;
        let titles = footer
            .titles
            .iter()
            .cloned()
            .zip(title_pages)
            .map(|(title, page)| Title::from_metadata(title, page))
            .collect::<Result<Vec<_>>>()?;

        let link_pages = item_pages("LINK")?;
        let links = footer
            .links
            .iter()
            .cloned()
            .zip(link_pages)
            .map(|(link, page)| Link::from_metadata(link, page))
            .collect::<Result<Vec<_>>>()?;

        let pages = metadata
            .pages
            .iter()
            .cloned()
            .map(|page| Page::from_metadata(page.map, page.layers))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            metadata,
            cover: Cover::default(),
            keywords,
            titles,
            links,
            template_links: Vec::new(),
            pages,
        })
    }

    pub fn signature(&self) -> &str {
        &self.metadata.signature
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, page: usize) -> Result<&Page> {
        let total = self.pages.len();
        self.pages.get(page).ok_or(NoteError::PageOutOfRange { page, total })
    }

    fn header_text(&self, key: &str, default: &str) -> String {
        self.metadata.header.get_str(key).unwrap_or(default).to_string()
    }

    /// `NOTE` or `MARK`.
    pub fn file_type(&self) -> String {
        self.header_text("FILE_TYPE", "")
    }

    pub fn file_id(&self) -> String {
        self.header_text("FILE_ID", "")
    }

    pub fn apply_equipment(&self) -> String {
        self.header_text("APPLY_EQUIPMENT", "")
    }

    pub fn is_realtime_recognition(&self) -> bool {
        self.metadata.header.get_str("FILE_RECOGN_TYPE") == Some("1")
    }

    pub fn pdf_style(&self) -> String {
        self.header_text("PDFSTYLE", "none")
    }

    pub fn pdf_style_md5(&self) -> String {
        self.header_text("PDFSTYLEMD5", "0")
    }

    pub fn style_usage_type(&self) -> Result<StyleUsageType> {
        match self.metadata.header.get_str("STYLEUSAGETYPE") {
            Some(value) => StyleUsageType::try_from(utils::parse_int(value, "STYLEUSAGETYPE")?),
            None => Ok(StyleUsageType::Default),
        }
    }

    /// Address of the cover bitmap, 0 when the document has none.
    pub fn cover_address(&self) -> Result<i64> {
        utils::address_of(&self.metadata.footer.map, "COVER_1")
    }
}

/// Top edge of a `left,top,width,height` rectangle, 0 when absent.
fn rect_top(metadata: &MetadataMap, key: &str) -> Result<i64> {
    match metadata.get_str(key) {
        Some(value) => Ok(utils::parse_rect(value, key)?[1]),
        None => Ok(0),
    }
}
