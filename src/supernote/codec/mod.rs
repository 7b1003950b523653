//! Codec layer for page and layer bitmaps.
//!
//! This module turns raw content blocks into flat pixel buffers. It depends
//! only on the color palette, never on the container parser.
//!
//! # Submodules
//!
//! - [`flate`]: `SN_ASA_COMPRESS` bitmaps (raw deflate, first device generation)
//! - [`rle`]: `RATTA_RLE` bitmaps (color run-length, X and X2 colormaps)

pub mod flate;
pub mod rle;

use log::debug;

use crate::supernote::types::error::Result;
use crate::supernote::types::models::Protocol;
use crate::supernote::types::palette::ColorPalette;

pub use rle::RleVariant;

/// A freshly decoded bitmap. Owns its pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBitmap {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub bits_per_pixel: u8,
}

impl DecodedBitmap {
    pub fn bytes_per_pixel(&self) -> usize {
        usize::from(self.bits_per_pixel / 8)
    }
}

/// Decodes `data` with the codec named by `protocol`.
///
/// `variant` only affects `RATTA_RLE`. `all_blank` shortens the special run
/// length for the known blank background block.
pub fn decode(
    protocol: Protocol,
    variant: RleVariant,
    data: &[u8],
    palette: &ColorPalette,
    all_blank: bool,
) -> Result<DecodedBitmap> {
    debug!(
        "Decoding {} bytes with {:?} (variant {:?}, all_blank={})",
        data.len(),
        protocol,
        variant,
        all_blank
    );
    match protocol {
        Protocol::Flate => flate::decode(data, palette),
        Protocol::RattaRle => rle::decode(data, palette, all_blank, variant),
    }
}
