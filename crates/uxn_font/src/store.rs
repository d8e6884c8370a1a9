use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use crate::{bdf::read_bdf_file, is_narrow_prehash, prehash, FontPackError, Glyph, Result};

/// All glyphs of the loaded fonts, keyed by character.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphStore {
    glyphs: BTreeMap<char, Glyph>,
}

impl GlyphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_glyphs(glyphs: impl IntoIterator<Item = (char, Glyph)>) -> Self {
        Self {
            glyphs: glyphs.into_iter().collect(),
        }
    }

    /// Loads and merges the given BDF files, later files replace glyphs of
    /// earlier ones. The merged store is validated.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut store = Self::new();
        for path in paths {
            store.merge(read_bdf_file(path.as_ref())?);
        }
        store.validate()?;
        Ok(store)
    }

    pub fn merge(&mut self, other: GlyphStore) {
        for (ch, glyph) in other.glyphs {
            if self.glyphs.insert(ch, glyph).is_some() {
                log::debug!("'{ch}' redefined by a later font");
            }
        }
    }

    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Like [`Self::get`] but a missing glyph is an error.
    pub fn require(&self, ch: char) -> Result<&Glyph> {
        self.get(ch).ok_or(FontPackError::MissingGlyph { ch })
    }

    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Glyph)> {
        self.glyphs.iter().map(|(ch, glyph)| (*ch, glyph))
    }

    /// Checks what the packed table relies on: no two characters share a
    /// prehash, and the prehash range check predicts every glyph width.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashMap<u16, char> = HashMap::with_capacity(self.glyphs.len());
        for (ch, glyph) in self.iter() {
            let hash = prehash(ch);
            if let Some(first) = seen.insert(hash, ch) {
                return Err(FontPackError::PrehashCollision {
                    first,
                    second: ch,
                    prehash: hash,
                });
            }
            if is_narrow_prehash(hash) != (glyph.width() == 8) {
                return Err(FontPackError::WidthRangeMismatch {
                    ch,
                    prehash: hash,
                    width: glyph.width(),
                });
            }
        }
        Ok(())
    }
}
