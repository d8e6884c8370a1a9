//! Lays out the glyphs of a program so `prehash(c) % a % b` finds them.
//!
//! Two layouts are supported:
//!
//! - [`Layout::Indirect`]: a lookup table of 2 byte big endian offsets indexed
//!   by slot, pointing into a glyph blob where 8px glyphs take 16 and 16px
//!   glyphs 32 bytes.
//! - [`Layout::Direct`]: one array of 32 byte cells indexed by slot, narrow
//!   glyphs are zero padded.

use serde::{Deserialize, Serialize};

use crate::{is_narrow_prehash, prehash, FontPackError, GlyphStore, ModChain, Result, UsedCharacterSet};

/// Bytes per slot of the direct layout, room for one 16x16 glyph.
pub const DIRECT_STRIDE: usize = 32;

/// Bytes of one 8x16 glyph, the unit of [`OffsetUnit::Blocks`].
pub const BLOCK_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Lookup table plus variable width glyph data.
    #[default]
    Indirect,
    /// Fixed stride cells, no lookup table.
    Direct,
}

/// Unit of the offsets stored in the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    #[default]
    Bytes,
    /// 16 byte blocks, lets the table address up to 1 MiB.
    Blocks,
}

impl OffsetUnit {
    fn size(self) -> usize {
        match self {
            OffsetUnit::Bytes => 1,
            OffsetUnit::Blocks => BLOCK_SIZE,
        }
    }
}

/// The packed glyph data of one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFont {
    pub chain: ModChain,
    pub layout: Layout,
    pub offset_unit: OffsetUnit,
    /// Only set for [`Layout::Indirect`].
    pub lookup_table: Option<Vec<u8>>,
    pub glyph_data: Vec<u8>,
}

impl PackedFont {
    /// Size of everything the program has to embed: both moduli, the table and the glyphs.
    pub fn total_len(&self) -> usize {
        4 + self.lookup_table.as_ref().map_or(0, Vec::len) + self.glyph_data.len()
    }

    /// Looks up a glyph the way the VM does.
    ///
    /// The width isn't stored anywhere, the number of bytes to read is derived
    /// from the prehash range. Returns `None` if the slot or the data is out of
    /// range; characters that weren't packed may return some other glyph.
    pub fn glyph_bytes(&self, ch: char) -> Option<&[u8]> {
        let hash = prehash(ch);
        let slot = self.chain.slot(hash);
        let len = if is_narrow_prehash(hash) { BLOCK_SIZE } else { 2 * BLOCK_SIZE };
        let start = match &self.lookup_table {
            Some(table) => {
                let entry = table.get(2 * slot..2 * slot + 2)?;
                u16::from_be_bytes([entry[0], entry[1]]) as usize * self.offset_unit.size()
            }
            None => slot * DIRECT_STRIDE,
        };
        self.glyph_data.get(start..start + len)
    }
}

/// Packs the glyphs of `used` with the given layout.
///
/// Characters are placed in code point order, so the output only depends on the inputs.
pub fn pack(store: &GlyphStore, used: &UsedCharacterSet, chain: ModChain, layout: Layout, offset_unit: OffsetUnit) -> Result<PackedFont> {
    let packed = match layout {
        Layout::Indirect => {
            let (lookup_table, glyph_data) = pack_indirect(store, used, chain, offset_unit)?;
            PackedFont {
                chain,
                layout,
                offset_unit,
                lookup_table: Some(lookup_table),
                glyph_data,
            }
        }
        Layout::Direct => PackedFont {
            chain,
            layout,
            offset_unit,
            lookup_table: None,
            glyph_data: pack_direct(store, used, chain)?,
        },
    };
    log::info!(
        "packed {} glyphs: {} table bytes, {} glyph bytes",
        used.len(),
        packed.lookup_table.as_ref().map_or(0, Vec::len),
        packed.glyph_data.len()
    );
    Ok(packed)
}

/// Builds the lookup table and glyph blob of the indirect layout.
pub fn pack_indirect(store: &GlyphStore, used: &UsedCharacterSet, chain: ModChain, offset_unit: OffsetUnit) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut lookup_table = Vec::new();
    let mut glyph_data = Vec::new();

    for ch in used.iter() {
        let glyph = store.require(ch)?;
        let slot = chain.slot(prehash(ch));
        let offset = glyph_data.len() / offset_unit.size();
        let entry = u16::try_from(offset).map_err(|_| FontPackError::OffsetOverflow { offset })?;

        if lookup_table.len() < 2 * slot + 2 {
            lookup_table.resize(2 * slot + 2, 0);
        }
        lookup_table[2 * slot..2 * slot + 2].copy_from_slice(&entry.to_be_bytes());
        glyph_data.extend(glyph.uxn_bytes());
    }
    Ok((lookup_table, glyph_data))
}

/// Builds the fixed stride cells of the direct layout.
pub fn pack_direct(store: &GlyphStore, used: &UsedCharacterSet, chain: ModChain) -> Result<Vec<u8>> {
    let mut cells = Vec::new();

    for ch in used.iter() {
        let glyph = store.require(ch)?;
        let start = chain.slot(prehash(ch)) * DIRECT_STRIDE;
        if cells.len() < start + DIRECT_STRIDE {
            cells.resize(start + DIRECT_STRIDE, 0);
        }
        let bytes = glyph.uxn_bytes();
        cells[start..start + bytes.len()].copy_from_slice(&bytes);
    }
    Ok(cells)
}
