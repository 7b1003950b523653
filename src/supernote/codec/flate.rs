//! `SN_ASA_COMPRESS` bitmap decoding.
//!
//! The payload is a raw deflate stream of one byte per cell. Cells are
//! widened to 16 bits, padded to a `1888 x 1404` canvas, reversed, and
//! cropped by column window before the color lookup.

use std::io::Read;

use flate2::read::DeflateDecoder;
use log::trace;

use crate::supernote::types::error::{NoteError, Result};
use crate::supernote::types::palette::{ColorMode, ColorPalette};
use super::DecodedBitmap;

pub const INTERNAL_PAGE_HEIGHT: usize = 1888;
pub const INTERNAL_PAGE_WIDTH: usize = 1404;

const COLORCODE_BLACK: u16 = 0x0000;
const COLORCODE_BACKGROUND: u16 = 0xffff;
const COLORCODE_DARK_GRAY: u16 = 0x2104;
const COLORCODE_GRAY: u16 = 0xe1e2;

const ALPHA: u32 = 0xff;

/// Decodes a deflate bitmap.
///
/// Output is 8 bits per pixel in grayscale mode. In RGB mode every cell is
/// emitted as a little-endian 32-bit word holding the 16-bit cell, which
/// keeps only the low bits of `(color << 8) | alpha`. Unknown cell values
/// pass through unchanged.
pub fn decode(data: &[u8], palette: &ColorPalette) -> Result<DecodedBitmap> {
    let mut inflated = Vec::new();
    DeflateDecoder::new(data)
        .read_to_end(&mut inflated)
        .map_err(|e| NoteError::DecompressionError(format!("Deflate decompression failed: {}", e)))?;
    trace!("Inflated {} bytes to {} cells", data.len(), inflated.len());

    let mut cells: Vec<u16> = inflated.into_iter().map(u16::from).collect();
    cells.resize(INTERNAL_PAGE_WIDTH * INTERNAL_PAGE_HEIGHT, 0);
    cells.reverse();

    let cells = cells
        .into_iter()
        .enumerate()
        .filter(|(index, _)| index % INTERNAL_PAGE_WIDTH < INTERNAL_PAGE_HEIGHT)
        .map(|(_, cell)| map_color(cell, palette));

    let (pixels, bits_per_pixel): (Vec<u8>, u8) = match palette.mode() {
        ColorMode::Grayscale => (cells.map(|cell| cell as u8).collect(), 8),
        ColorMode::Rgb => (
            cells.flat_map(|cell| u32::from(cell).to_le_bytes()).collect(),
            32,
        ),
    };

    Ok(DecodedBitmap {
        pixels,
        width: INTERNAL_PAGE_WIDTH,
        height: INTERNAL_PAGE_HEIGHT,
        bits_per_pixel,
    })
}

fn map_color(cell: u16, palette: &ColorPalette) -> u16 {
    let color = match cell {
        COLORCODE_BLACK => palette.black,
        COLORCODE_DARK_GRAY => palette.dark_gray,
        COLORCODE_GRAY => palette.gray,
        COLORCODE_BACKGROUND => palette.white,
        other => return other,
    };
    match palette.mode() {
        ColorMode::Grayscale => color as u16,
        ColorMode::Rgb => ((color << 8) | ALPHA) as u16,
    }
}
