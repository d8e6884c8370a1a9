use std::fmt::Display;

/// Every glyph in the supported fonts is 16 rows tall.
pub const GLYPH_HEIGHT: usize = 16;

/// A 8x16 or 16x16 bitmap glyph.
///
/// Rows are stored MSB first: for an 8px glyph bit 7 is the leftmost pixel,
/// for a 16px glyph bit 15 is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    width: u8,
    rows: [u16; GLYPH_HEIGHT],
}

impl Glyph {
    /// Create a glyph, returns `None` for widths other than 8 and 16 or rows
    /// with bits set beyond the width.
    pub fn new(width: u8, rows: [u16; GLYPH_HEIGHT]) -> Option<Self> {
        if width != 8 && width != 16 {
            return None;
        }
        if rows.iter().any(|row| (*row as u32) >> width != 0) {
            return None;
        }
        Some(Self { width, rows })
    }

    /// An all blank glyph.
    pub fn blank(width: u8) -> Option<Self> {
        Self::new(width, [0; GLYPH_HEIGHT])
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> usize {
        GLYPH_HEIGHT
    }

    pub fn rows(&self) -> &[u16; GLYPH_HEIGHT] {
        &self.rows
    }

    /// Number of bytes [`Self::uxn_bytes`] produces: 16 for 8px, 32 for 16px glyphs.
    pub fn byte_len(&self) -> usize {
        self.width as usize * GLYPH_HEIGHT / 8
    }

    /// Packs the glyph in the order the uxn sprite blit expects it.
    ///
    /// The glyph is cut into a top and a bottom half of 8 rows. Each half is
    /// emitted as 8x8 tiles, left column first, one byte per row.
    pub fn uxn_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.byte_len());
        for half in self.rows.chunks(8) {
            for shift in (0..self.width).step_by(8).rev() {
                result.extend(half.iter().map(|row| (row >> shift) as u8));
            }
        }
        result
    }
}

impl Display for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            write!(f, "( ")?;
            for x in (0..self.width).rev() {
                if row & (1u16 << x) == 0 {
                    write!(f, "  ")?;
                } else {
                    write!(f, "██")?;
                }
            }
            write!(f, " )")?;
        }
        Ok(())
    }
}
