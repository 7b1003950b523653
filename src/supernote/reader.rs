use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use log::{debug, info, warn};

use super::codec::{self, DecodedBitmap, RleVariant};
use super::format::{block, container, links, signature};
use super::types::error::{NoteError, Result};
use super::types::models::{DocumentMetadata, Policy, Protocol, MAX_LAYERS};
use super::types::notebook::{Notebook, Page};
use super::types::palette::ColorPalette;

/// Layer name of the template background.
pub const BACKGROUND_LAYER: &str = "BGLAYER";

/// Page style whose blank background uses the short special run.
pub const WHITE_STYLE: &str = "style_white";

/// Content size of the blank background block of [`WHITE_STYLE`] pages.
pub const SPECIAL_WHITE_STYLE_BLOCK_SIZE: usize = 0x140e;

/// Equipment code of devices writing the X2 run-length colormap.
pub const X2_EQUIPMENT: &str = "N5";

/// Reader for note and mark files.
///
/// Owns the underlying stream; every operation is a sequence of seeks and
/// reads against it. Use [`NoteReader::open`] for files on disk or
/// [`NoteReader::new`] for any seekable stream.
#[derive(Debug)]
pub struct NoteReader<R> {
    file: R,
    policy: Policy,
}

impl NoteReader<File> {
    /// Opens the file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened. The format is checked
    /// lazily by [`parse_metadata`](Self::parse_metadata) and
    /// [`load_notebook`](Self::load_notebook).
    pub fn open(path: impl AsRef<Path>, policy: Policy) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening note file: {}", path.display());
        let file = File::open(path)?;
        Ok(Self::new(file, policy))
    }
}

impl<R: Read + Seek> NoteReader<R> {
    pub fn new(file: R, policy: Policy) -> Self {
        Self { file, policy }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Releases the underlying stream.
    pub fn into_inner(self) -> R {
        self.file
    }

    /// Detects the format family and parses the metadata tree.
    ///
    /// # Errors
    /// - `UnsupportedFormat` if no family accepts the signature
    /// - `TruncatedRead` / `MalformedBlock` for structural damage
    pub fn parse_metadata(&mut self) -> Result<DocumentMetadata> {
        let (family, signature) = signature::detect_family(&mut self.file, self.policy)?;
        container::parse(&mut self.file, family, signature)
    }

    /// Parses the document and attaches the raw content of every entity.
    ///
    /// Content is attached in container order: cover, keywords, titles,
    /// links, then per page its bitmaps and auxiliary blocks. Template links
    /// are decoded last since they come from page content.
    pub fn load_notebook(&mut self) -> Result<Notebook> {
        let metadata = self.parse_metadata()?;
        let mut notebook = Notebook::from_metadata(metadata)?;

        notebook.cover.content = self.read(notebook.cover_address()?)?;

        for keyword in &mut notebook.keywords {
            keyword.content = self.read(keyword.content_address()?)?;
        }
        for title in &mut notebook.titles {
            title.content = self.read(title.content_address()?)?;
        }
        for link in &mut notebook.links {
            link.content = self.read(link.content_address()?)?;
        }

        for (index, page) in notebook.pages.iter_mut().enumerate() {
            self.attach_page(index, page)?;
        }

        let mut template_links = Vec::new();
        for page in &notebook.pages {
            if let Some(content) = &page.external_link_info {
                template_links.extend(links::parse_template_links(content)?);
            }
        }
        notebook.template_links = template_links;

        info!(
            "Notebook loaded: {} pages, {} keywords, {} titles, {} links, {} template links",
            notebook.total_pages(),
            notebook.keywords.len(),
            notebook.titles.len(),
            notebook.links.len(),
            notebook.template_links.len()
        );
        Ok(notebook)
    }

    fn attach_page(&mut self, index: usize, page: &mut Page) -> Result<()> {
        if page.is_layer_supported() {
            for slot in 0..MAX_LAYERS {
                if let Some(layer) = page.layer_mut(slot)? {
                    let address = layer.content_address()?;
                    layer.content = self.read(address)?;
                }
            }
        } else {
            // The content key of non-layered pages has not been confirmed on real files.
            warn!("Page {} has no layers; its flat bitmap is not attached", index);
        }

        page.total_path = self.read(page.total_path_address()?)?;
        page.recogn_file = self.read(page.recogn_file_address()?)?;
        page.recogn_text = self.read(page.recogn_text_address()?)?;
        page.external_link_info = self.read(page.external_link_info_address()?)?;
        debug!("Page {} content attached", index);
        Ok(())
    }

    fn read(&mut self, address: i64) -> Result<Option<Vec<u8>>> {
        block::read_block(&mut self.file, address)
    }
}

/// Decoded bitmaps of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBitmaps {
    /// One entry per layer slot, `None` for unused or empty layers.
    Layered(Vec<Option<DecodedBitmap>>),
    Flat(Option<DecodedBitmap>),
}

/// Run-length colormap used by the device that wrote `notebook`.
pub fn rle_variant(notebook: &Notebook) -> RleVariant {
    if notebook.apply_equipment() == X2_EQUIPMENT {
        RleVariant::X2
    } else {
        RleVariant::X
    }
}

/// Decodes every bitmap of page `page_number`.
///
/// # Errors
/// - `PageOutOfRange` for an index outside the document
/// - `UnknownProtocol` if a layer or page names an unknown codec
/// - any codec error
pub fn decode_page(
    notebook: &Notebook,
    page_number: usize,
    palette: &ColorPalette,
) -> Result<PageBitmaps> {
    let page = notebook.page(page_number)?;
    let variant = rle_variant(notebook);

    if !page.is_layer_supported() {
        let bitmap = match &page.content {
            Some(content) => Some(codec::decode(
                Protocol::try_from(page.protocol.as_str())?,
                variant,
                content,
                palette,
                false,
            )?),
            None => None,
        };
        return Ok(PageBitmaps::Flat(bitmap));
    }

    let mut bitmaps = Vec::with_capacity(MAX_LAYERS);
    for layer in &page.layers {
        let bitmap = match layer {
            Some(layer) => match &layer.content {
                Some(content) => {
                    let all_blank = layer.name == BACKGROUND_LAYER
                        && page.style == WHITE_STYLE
                        && content.len() == SPECIAL_WHITE_STYLE_BLOCK_SIZE;
                    let protocol = Protocol::try_from(layer.protocol.as_str())?;
                    Some(codec::decode(protocol, variant, content, palette, all_blank)?)
                }
                None => None,
            },
            None => None,
        };
        bitmaps.push(bitmap);
    }
    Ok(PageBitmaps::Layered(bitmaps))
}

/// Decodes every page of `notebook`, in page order.
pub fn decode_all(notebook: &Notebook, palette: &ColorPalette) -> Result<Vec<PageBitmaps>> {
    (0..notebook.total_pages())
        .map(|page| decode_page(notebook, page, palette))
        .collect()
}

/// Convenience wrapper: parses metadata from any seekable stream.
pub fn parse_metadata<R: Read + Seek>(file: R, policy: Policy) -> Result<DocumentMetadata> {
    NoteReader::new(file, policy).parse_metadata()
}

/// Convenience wrapper: loads a notebook from any seekable stream.
pub fn load_notebook<R: Read + Seek>(file: R, policy: Policy) -> Result<Notebook> {
    NoteReader::new(file, policy).load_notebook()
}

impl PageBitmaps {
    /// Bitmap of layer slot `layer`, or the flat bitmap for slot 0.
    pub fn get(&self, layer: usize) -> Result<Option<&DecodedBitmap>> {
        match self {
            PageBitmaps::Layered(layers) => layers
                .get(layer)
                .map(Option::as_ref)
                .ok_or(NoteError::LayerOutOfRange { layer }),
            PageBitmaps::Flat(bitmap) if layer == 0 => Ok(bitmap.as_ref()),
            PageBitmaps::Flat(_) => Err(NoteError::LayerOutOfRange { layer }),
        }
    }
}
