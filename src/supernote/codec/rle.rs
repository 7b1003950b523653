//! `RATTA_RLE` bitmap decoding.
//!
//! The stream is a flat sequence of `(colorcode, length)` byte pairs:
//!
//! - `length == 0xff`: a fixed-size run (`0x4000` pixels, or `0x400` for the
//!   known blank background block)
//! - `length & 0x80 != 0`: the run is held back; if the next pair repeats the
//!   color code it extends the run, otherwise the held run is flushed alone
//! - otherwise: a run of `length + 1` pixels
//!
//! The decoded buffer must cover the `1872 x 1404` canvas exactly.

use log::{debug, trace};

use crate::supernote::types::error::{NoteError, Result};
use crate::supernote::types::palette::{rgb_bytes, ColorMode, ColorPalette};
use super::DecodedBitmap;

pub const PAGE_HEIGHT: usize = 1872;
pub const PAGE_WIDTH: usize = 1404;

pub const COLORCODE_BLACK: u8 = 0x61;
pub const COLORCODE_BACKGROUND: u8 = 0x62;
pub const COLORCODE_DARK_GRAY: u8 = 0x63;
pub const COLORCODE_GRAY: u8 = 0x64;
pub const COLORCODE_WHITE: u8 = 0x65;
pub const COLORCODE_MARKER_BLACK: u8 = 0x66;
pub const COLORCODE_MARKER_DARK_GRAY: u8 = 0x67;
pub const COLORCODE_MARKER_GRAY: u8 = 0x68;

pub const X2_COLORCODE_DARK_GRAY: u8 = 0x9d;
pub const X2_COLORCODE_GRAY: u8 = 0xc9;
pub const X2_COLORCODE_MARKER_DARK_GRAY: u8 = 0x9e;
pub const X2_COLORCODE_MARKER_GRAY: u8 = 0xca;
pub const X2_COLORCODE_DARK_GRAY_COMPATIBLE: u8 = 0x63;
pub const X2_COLORCODE_GRAY_COMPATIBLE: u8 = 0x64;

pub const SPECIAL_LENGTH_MARKER: u8 = 0xff;
pub const SPECIAL_LENGTH: usize = 0x4000;
pub const SPECIAL_LENGTH_FOR_BLANK: usize = 0x400;

/// Colormap generation of the device that wrote the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RleVariant {
    /// X-series color codes. Unknown codes are an error.
    #[default]
    X,
    /// X2-series color codes. Unknown codes are gray literals.
    X2,
}

impl RleVariant {
    /// Builds the code to color lookup for `palette`.
    fn colormap(&self, palette: &ColorPalette) -> [Option<u32>; 256] {
        let mut map = [None; 256];
        let mut set = |code: u8, color: u32| map[usize::from(code)] = Some(color);

        set(COLORCODE_BLACK, palette.black);
        set(COLORCODE_BACKGROUND, palette.transparent());
        set(COLORCODE_WHITE, palette.white);
        set(COLORCODE_MARKER_BLACK, palette.black);
        match self {
            RleVariant::X => {
                set(COLORCODE_DARK_GRAY, palette.dark_gray);
                set(COLORCODE_GRAY, palette.gray);
                set(COLORCODE_MARKER_DARK_GRAY, palette.dark_gray);
                set(COLORCODE_MARKER_GRAY, palette.gray);
            }
            RleVariant::X2 => {
                set(X2_COLORCODE_DARK_GRAY, palette.dark_gray);
                set(X2_COLORCODE_GRAY, palette.gray);
                set(X2_COLORCODE_MARKER_DARK_GRAY, palette.dark_gray);
                set(X2_COLORCODE_MARKER_GRAY, palette.gray);
                set(X2_COLORCODE_DARK_GRAY_COMPATIBLE, palette.dark_gray_compatible);
                set(X2_COLORCODE_GRAY_COMPATIBLE, palette.gray_compatible);
            }
        }
        map
    }
}

/// Writes resolved runs into the output buffer.
struct RunWriter {
    colormap: [Option<u32>; 256],
    mode: ColorMode,
    variant: RleVariant,
    bytes_per_pixel: usize,
    expected_len: usize,
    output: Vec<u8>,
}

impl RunWriter {
    /// Appends `length` pixels of `code`. A run past the canvas end is fatal.
    fn push(&mut self, code: u8, length: usize) -> Result<()> {
        let found = self.output.len() + length * self.bytes_per_pixel;
        if found > self.expected_len {
            return Err(NoteError::DecodeSizeMismatch {
                expected: self.expected_len as u64,
                found: found as u64,
            });
        }
        let color = match (self.colormap[usize::from(code)], self.variant) {
            (Some(color), _) => color,
            (None, RleVariant::X2) => u32::from(code) * 0x01_0101,
            (None, RleVariant::X) => return Err(NoteError::UnknownColorCode { code }),
        };
        match self.mode {
            ColorMode::Grayscale => {
                let gray = (color & 0xff) as u8;
                self.output.resize(self.output.len() + length, gray);
            }
            ColorMode::Rgb => {
                let rgb = rgb_bytes(color);
                self.output.reserve(length * 3);
                for _ in 0..length {
                    self.output.extend_from_slice(&rgb);
                }
            }
        }
        Ok(())
    }
}

/// Length of a held run flushed without a continuation pair.
fn held_length(length: u8) -> usize {
    (usize::from(length & 0x7f) + 1) << 7
}

/// Decodes a run-length bitmap.
///
/// # Errors
/// - `UnknownColorCode` for a code outside the X colormap
/// - `DecodeSizeMismatch` when the runs do not cover the canvas exactly,
///   raised as soon as a run would overflow it
pub fn decode(
    data: &[u8],
    palette: &ColorPalette,
    all_blank: bool,
    variant: RleVariant,
) -> Result<DecodedBitmap> {
    let mode = palette.mode();
    let bytes_per_pixel = match mode {
        ColorMode::Grayscale => 1,
        ColorMode::Rgb => 3,
    };
    let expected_len = PAGE_HEIGHT * PAGE_WIDTH * bytes_per_pixel;

    let mut writer = RunWriter {
        colormap: variant.colormap(palette),
        mode,
        variant,
        bytes_per_pixel,
        expected_len,
        output: Vec::with_capacity(expected_len),
    };

    let mut holder: Option<(u8, u8)> = None;
    for pair in data.chunks_exact(2) {
        let (code, length) = (pair[0], pair[1]);

        if let Some((held_code, held)) = holder.take() {
            if held_code == code {
                writer.push(code, 1 + usize::from(length) + held_length(held))?;
                continue;
            }
            writer.push(held_code, held_length(held))?;
        }

        if length == SPECIAL_LENGTH_MARKER {
            let run = if all_blank { SPECIAL_LENGTH_FOR_BLANK } else { SPECIAL_LENGTH };
            writer.push(code, run)?;
        } else if length & 0x80 != 0 {
            holder = Some((code, length));
        } else {
            writer.push(code, usize::from(length) + 1)?;
        }
    }

    if let Some((code, length)) = holder {
        let gap = expected_len.saturating_sub(writer.output.len()) / bytes_per_pixel;
        match (0..=7).rev().map(|shift| (usize::from(length & 0x7f) + 1) << shift).find(|&run| run <= gap) {
            Some(run) => {
                trace!("Trailing run of {:#04x} adjusted to {} pixels", code, run);
                writer.push(code, run)?;
            }
            None => debug!("Trailing run of {:#04x} dropped, gap is {} pixels", code, gap),
        }
    }

    let output = writer.output;
    if output.len() != expected_len {
        return Err(NoteError::DecodeSizeMismatch {
            expected: expected_len as u64,
            found: output.len() as u64,
        });
    }

    Ok(DecodedBitmap {
        pixels: output,
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
        bits_per_pixel: (bytes_per_pixel * 8) as u8,
    })
}
