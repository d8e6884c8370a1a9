//! Character to 16 bit key folding.
//!
//! The VM can't afford a real UTF-8 decoder, so characters are addressed by
//! folding their UTF-8 bytes in "base 64": `acc = (acc << 6) + byte`, masked to
//! 16 bits. The fold needs nothing but shift, add and mask instructions.

/// Fold the UTF-8 bytes of `ch` into a 16 bit key.
pub fn prehash(ch: char) -> u16 {
    let mut buf = [0u8; 4];
    let acc = ch.encode_utf8(&mut buf).bytes().fold(0u32, |acc, b| (acc << 6) + b as u32);
    (acc & 0xFFFF) as u16
}

/// The range check the runtime uses to tell 8px glyphs from 16px glyphs.
///
/// ASCII folds below 0x80 and the half-width katakana block (EF BD xx / EF BE xx)
/// lands just around 0x2000; everything else in the JIS repertoire is full width.
/// This only holds for the fonts it was checked against, see
/// [`GlyphStore::validate`](crate::GlyphStore::validate).
pub fn is_narrow_prehash(prehash: u16) -> bool {
    prehash < 0x80 || (0x1FE0 < prehash && prehash < 0x2020)
}
