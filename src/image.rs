//! Packed bitmap formats and row decoding.
//!
//! Bitmaps carry a fixed six-byte header, then a palette of 565 color words
//! for the indexed formats, then byte-aligned pixel rows. The same layout is
//! used whether the image lives in directly addressable memory or behind an
//! external fetch callback; [`BitmapReader`] abstracts over the two.

use display_interface::DisplayError;

use crate::color::Color;

/// Longest decoded scanline, in pixels (the widest glass the controller
/// scans out)
pub const MAX_LINE_PIXELS: usize = crate::MAX_WIDTH as usize;

/// Bits per pixel of a packed bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 1 bit per pixel, 2-entry palette, MSB first
    Bpp1,
    /// 4 bits per pixel, 16-entry palette, low nibble first
    Bpp4,
    /// 8 bits per pixel, 256-entry palette
    Bpp8,
    /// 16 bits per pixel, direct 565 color, little endian
    Bpp16,
}

impl PixelFormat {
    /// Map a header depth byte to a format
    pub const fn from_depth(depth: u8) -> Option<PixelFormat> {
        match depth {
            1 => Some(PixelFormat::Bpp1),
            4 => Some(PixelFormat::Bpp4),
            8 => Some(PixelFormat::Bpp8),
            16 => Some(PixelFormat::Bpp16),
            _ => None,
        }
    }

    /// Number of palette entries preceding the pixel data
    pub const fn palette_entries(self) -> usize {
        match self {
            PixelFormat::Bpp1 => 2,
            PixelFormat::Bpp4 => 16,
            PixelFormat::Bpp8 => 256,
            PixelFormat::Bpp16 => 0,
        }
    }

    /// Bytes occupied by one source row of `width` pixels
    pub const fn row_bytes(self, width: u16) -> usize {
        let w = width as usize;
        match self {
            PixelFormat::Bpp1 => w.div_ceil(8),
            PixelFormat::Bpp4 => w.div_ceil(2),
            PixelFormat::Bpp8 => w,
            PixelFormat::Bpp16 => w * 2,
        }
    }
}

/// Fixed bitmap header: compression tag, color depth, then height and width
/// as little-endian 16-bit values.
#[derive(Clone, Copy, Debug)]
pub struct BitmapHeader {
    /// Compression tag (only uncompressed images are supported)
    pub compression: u8,
    /// Bits per pixel
    pub depth: u8,
    /// Source rows
    pub height: u16,
    /// Source pixels per row
    pub width: u16,
}

impl BitmapHeader {
    /// Header size in bytes
    pub const LEN: usize = 6;

    /// Decode the six header bytes
    pub fn parse(raw: &[u8; Self::LEN]) -> BitmapHeader {
        BitmapHeader {
            compression: raw[0],
            depth: raw[1],
            height: u16::from_le_bytes([raw[2], raw[3]]),
            width: u16::from_le_bytes([raw[4], raw[5]]),
        }
    }

    /// The pixel format declared by the depth byte
    pub fn format(&self) -> Result<PixelFormat, DisplayError> {
        PixelFormat::from_depth(self.depth).ok_or(DisplayError::InvalidFormatError)
    }
}

/// Byte-range access to bitmap storage.
///
/// Implement this for memory the host cannot address directly (serial flash,
/// external EEPROM): copy `buf.len()` bytes starting at `offset` into `buf`.
/// [`FlashBitmap`] provides the implementation for in-address-space slices.
pub trait BitmapReader {
    /// Fill `buf` from the bitmap bytes at `offset`
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), DisplayError>;
}

/// A bitmap resident in directly addressable memory.
pub struct FlashBitmap<'a>(pub &'a [u8]);

impl BitmapReader for FlashBitmap<'_> {
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), DisplayError> {
        let start = offset as usize;
        let end = start
            .checked_add(buf.len())
            .ok_or(DisplayError::OutOfBoundsError)?;
        if end > self.0.len() {
            return Err(DisplayError::OutOfBoundsError);
        }
        buf.copy_from_slice(&self.0[start..end]);
        Ok(())
    }
}

/// Decode one packed source row into raw 565 words, replicating each pixel
/// `stretch` times. Returns the number of words written; output is truncated
/// at `out.len()` if the stretched row does not fit.
pub(crate) fn decode_row(
    format: PixelFormat,
    palette: &[Color],
    row: &[u8],
    width: u16,
    stretch: u16,
    out: &mut [u16],
) -> usize {
    let mut n = 0;
    for x in 0..width as usize {
        let raw = match format {
            PixelFormat::Bpp1 => {
                let bit = 0x80 >> (x % 8);
                palette[usize::from(row[x / 8] & bit != 0)].raw()
            }
            PixelFormat::Bpp4 => {
                let byte = row[x / 2];
                let index = if x % 2 == 0 { byte & 0x0F } else { byte >> 4 };
                palette[index as usize].raw()
            }
            PixelFormat::Bpp8 => palette[row[x] as usize].raw(),
            PixelFormat::Bpp16 => u16::from_le_bytes([row[2 * x], row[2 * x + 1]]),
        };
        for _ in 0..stretch {
            if n == out.len() {
                return n;
            }
            out[n] = raw;
            n += 1;
        }
    }
    n
}
