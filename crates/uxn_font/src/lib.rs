//! Packs the glyphs a uxntal program prints into a compact, hash addressed table.
//!
//! Fonts are JIS encoded BDF files. Only the characters used in the string
//! literals of the program are packed, and the VM finds a glyph with
//! `prehash(c) % a % b` where `(a, b)` is searched per program.

mod error;
pub use error::*;

pub mod bdf;
pub use bdf::{decode_jis, parse_bdf, read_bdf_file, JisCharacter};

mod glyph;
pub use glyph::*;

mod prehash;
pub use prehash::*;

mod store;
pub use store::*;

mod usage;
pub use usage::*;

pub mod mod_chain;
pub use mod_chain::{find_mod_chain, ModChain, ModChainSolver};

pub mod packer;
pub use packer::{pack, Layout, OffsetUnit, PackedFont};

pub mod emitter;
pub use emitter::{hexdump, render_tal};

mod options;
pub use options::*;

/// The result of one packing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontTal {
    pub font: PackedFont,
    /// The uxntal text to write.
    pub text: String,
}

/// Packs the glyphs the string literals of `source` need.
///
/// The store is validated and every character is checked against it before
/// the (expensive) mod chain search starts.
pub fn build_font_tal(store: &GlyphStore, source: &str, options: &PackOptions) -> Result<FontTal> {
    store.validate()?;
    let used = UsedCharacterSet::from_source(source);
    for ch in used.iter() {
        store.require(ch)?;
    }
    log::info!("{} distinct characters in use", used.len());

    let chain = options.solver().solve(&used.prehashes())?;
    let font = pack(store, &used, chain, options.layout, options.offset_unit)?;
    let text = render_tal(&font, &options.label_prefix);
    Ok(FontTal { font, text })
}
