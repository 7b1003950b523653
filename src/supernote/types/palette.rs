//! Color palettes consumed by the pixel codecs.

use super::error::{NoteError, Result};

/// Whether decoded pixels are single gray bytes or packed RGB values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Grayscale,
    Rgb,
}

impl ColorMode {
    /// Value used for the transparent background slot in this mode.
    pub fn transparent(&self) -> u32 {
        match self {
            ColorMode::Grayscale => GRAYSCALE_TRANSPARENT,
            ColorMode::Rgb => RGB_TRANSPARENT,
        }
    }
}

pub const GRAYSCALE_BLACK: u32 = 0x00;
pub const GRAYSCALE_DARK_GRAY: u32 = 0x9d;
pub const GRAYSCALE_GRAY: u32 = 0xc9;
pub const GRAYSCALE_WHITE: u32 = 0xfe;
pub const GRAYSCALE_TRANSPARENT: u32 = 0xff;
pub const GRAYSCALE_DARK_GRAY_COMPAT: u32 = 0x30;
pub const GRAYSCALE_GRAY_COMPAT: u32 = 0x50;

pub const RGB_BLACK: u32 = 0x000000;
pub const RGB_DARK_GRAY: u32 = 0x9d9d9d;
pub const RGB_GRAY: u32 = 0xc9c9c9;
pub const RGB_WHITE: u32 = 0xfefefe;
pub const RGB_TRANSPARENT: u32 = 0xffffff;
pub const RGB_DARK_GRAY_COMPAT: u32 = 0x303030;
pub const RGB_GRAY_COMPAT: u32 = 0x505050;

/// Immutable set of output colors shared by every decode call.
///
/// `transparent` always follows from the mode. The two compatible grays are
/// only looked up by the X2 run-length colormap, for strokes written by the
/// previous device generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    mode: ColorMode,
    pub black: u32,
    pub dark_gray: u32,
    pub gray: u32,
    pub white: u32,
    pub dark_gray_compatible: u32,
    pub gray_compatible: u32,
}

impl ColorPalette {
    /// Builds a palette from `[black, dark_gray, gray, white]`.
    ///
    /// Grayscale values must fit in one byte and RGB values in 24 bits.
    pub fn new(mode: ColorMode, colors: [u32; 4]) -> Result<Self> {
        let (dark_gray_compatible, gray_compatible) = match mode {
            ColorMode::Grayscale => (GRAYSCALE_DARK_GRAY_COMPAT, GRAYSCALE_GRAY_COMPAT),
            ColorMode::Rgb => (RGB_DARK_GRAY_COMPAT, RGB_GRAY_COMPAT),
        };
        let [black, dark_gray, gray, white] = colors;
        let palette = Self {
            mode,
            black,
            dark_gray,
            gray,
            white,
            dark_gray_compatible,
            gray_compatible,
        };
        palette.validate()?;
        Ok(palette)
    }

    /// Replaces the two compatible grays.
    pub fn with_compatible_grays(mut self, dark_gray: u32, gray: u32) -> Result<Self> {
        self.dark_gray_compatible = dark_gray;
        self.gray_compatible = gray;
        self.validate()?;
        Ok(self)
    }

    /// The default grayscale palette.
    pub fn grayscale() -> Self {
        Self {
            mode: ColorMode::Grayscale,
            black: GRAYSCALE_BLACK,
            dark_gray: GRAYSCALE_DARK_GRAY,
            gray: GRAYSCALE_GRAY,
            white: GRAYSCALE_WHITE,
            dark_gray_compatible: GRAYSCALE_DARK_GRAY_COMPAT,
            gray_compatible: GRAYSCALE_GRAY_COMPAT,
        }
    }

    /// The default RGB palette.
    pub fn rgb() -> Self {
        Self {
            mode: ColorMode::Rgb,
            black: RGB_BLACK,
            dark_gray: RGB_DARK_GRAY,
            gray: RGB_GRAY,
            white: RGB_WHITE,
            dark_gray_compatible: RGB_DARK_GRAY_COMPAT,
            gray_compatible: RGB_GRAY_COMPAT,
        }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn transparent(&self) -> u32 {
        self.mode.transparent()
    }

    fn validate(&self) -> Result<()> {
        let limit = match self.mode {
            ColorMode::Grayscale => 0xff,
            ColorMode::Rgb => 0xff_ffff,
        };
        let colors = [
            ("black", self.black),
            ("dark gray", self.dark_gray),
            ("gray", self.gray),
            ("white", self.white),
            ("compatible dark gray", self.dark_gray_compatible),
            ("compatible gray", self.gray_compatible),
        ];
        match colors.iter().find(|(_, value)| *value > limit) {
            Some((name, value)) => Err(NoteError::InvalidPalette(format!(
                "{} value {:#x} does not fit {:?} mode",
                name, value, self.mode
            ))),
            None => Ok(()),
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::grayscale()
    }
}

/// Splits a 24-bit color into its red, green and blue bytes.
pub fn rgb_bytes(value: u32) -> [u8; 3] {
    [
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    ]
}
