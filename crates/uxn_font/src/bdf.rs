//! Reader for JIS encoded BDF fonts.
//!
//! Only the directives needed to build a [`GlyphStore`] are looked at:
//!
//! - `CHARSET_REGISTRY` must name a JIS registry
//! - `ENCODING` is a JIS code: below 256 it is a single Shift_JIS byte,
//!   above it a two byte JIS X 0208 code
//! - `DWIDTH` gives the glyph width (8 or 16)
//! - `BITMAP` starts the 16 hex rows, `ENDCHAR` finishes the glyph
//!
//! Codes that don't decode (reserved cells, 0xA0, vendor extension rows) are
//! dropped silently.

use std::{
    collections::{btree_map::Entry, BTreeMap},
    ops::RangeInclusive,
    path::Path,
};

use encoding_rs::{ISO_2022_JP, SHIFT_JIS};

use crate::{FontPackError, Glyph, GlyphStore, Result, GLYPH_HEIGHT};

/// Single Shift_JIS bytes with a character: ASCII and half width katakana.
/// 0x80 and 0xA0 are left out, fonts use them as placeholders.
const SINGLE_BYTE_CODES: [RangeInclusive<u8>; 2] = [0x00..=0x7F, 0xA1..=0xDF];

/// Rows of JIS X 0208 proper: symbols and kana, then the kanji levels.
/// The NEC and IBM extension rows the WHATWG tables add are not part of it.
const JIS_X0208_ROWS: [RangeInclusive<u8>; 2] = [0x21..=0x28, 0x30..=0x74];

/// Switches an ISO-2022-JP decoder to JIS X 0208.
const JIS_X0208_ESCAPE: &[u8] = b"\x1b$B";

/// Character an `ENCODING` value stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JisCharacter {
    Char(char),
    /// The code has no character, the glyph is skipped.
    Invalid,
}

/// Decodes a BDF `ENCODING` value.
///
/// Returns `None` for codes that don't fit into two bytes.
pub fn decode_jis(code: i64) -> Option<JisCharacter> {
    if !(0..=0xFFFF).contains(&code) {
        return if code < 0 { Some(JisCharacter::Invalid) } else { None };
    }
    let (encoding, bytes) = if code < 256 {
        let byte = code as u8;
        if !SINGLE_BYTE_CODES.iter().any(|codes| codes.contains(&byte)) {
            return Some(JisCharacter::Invalid);
        }
        (SHIFT_JIS, vec![byte])
    } else {
        let [row, cell] = (code as u16).to_be_bytes();
        if !JIS_X0208_ROWS.iter().any(|rows| rows.contains(&row)) {
            return Some(JisCharacter::Invalid);
        }
        let mut bytes = JIS_X0208_ESCAPE.to_vec();
        bytes.extend_from_slice(&[row, cell]);
        (ISO_2022_JP, bytes)
    };
    let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(&bytes) else {
        return Some(JisCharacter::Invalid);
    };
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(JisCharacter::Char(ch)),
        _ => Some(JisCharacter::Invalid),
    }
}

#[derive(Debug, Default)]
struct PendingGlyph {
    character: Option<JisCharacter>,
    width: Option<u8>,
    rows: Vec<u16>,
}

impl PendingGlyph {
    fn finish(self, line: usize) -> Result<(JisCharacter, Glyph)> {
        let Some(character) = self.character else {
            return Err(FontPackError::MissingEncoding { line });
        };
        let Some(width) = self.width else {
            return Err(FontPackError::MissingWidth { line });
        };
        let rows: [u16; GLYPH_HEIGHT] = self.rows.try_into().map_err(|rows: Vec<u16>| FontPackError::RowCountMismatch {
            line,
            expected: GLYPH_HEIGHT,
            actual: rows.len(),
        })?;
        if let Some(row) = rows.iter().find(|row| (**row as u32) >> width != 0) {
            return Err(FontPackError::RowTooWide { line, row: *row as u32, width });
        }
        let glyph = Glyph::new(width, rows).ok_or(FontPackError::UnsupportedWidth {
            line,
            width: width.to_string(),
        })?;
        Ok((character, glyph))
    }
}

/// Where the scanner is inside the current glyph record.
#[derive(Debug, Default)]
enum ParseState {
    #[default]
    Idle,
    Header(PendingGlyph),
    Bitmap(PendingGlyph),
}

impl ParseState {
    fn into_pending(self) -> PendingGlyph {
        match self {
            ParseState::Idle => PendingGlyph::default(),
            ParseState::Header(pending) | ParseState::Bitmap(pending) => pending,
        }
    }
}

/// Parses a BDF font.
pub fn parse_bdf(text: &str) -> Result<GlyphStore> {
    let mut glyphs = BTreeMap::new();
    let mut state = ParseState::Idle;
    let mut invalid = 0;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let ParseState::Bitmap(pending) = &mut state {
            if !line.starts_with("ENDCHAR") {
                let row = u16::from_str_radix(line, 16).map_err(|_| FontPackError::InvalidBitmapRow {
                    line: line_number,
                    value: line.to_string(),
                })?;
                pending.rows.push(row);
                continue;
            }
        }

        let (keyword, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let args = args.trim();
        match keyword {
            "CHARSET_REGISTRY" => {
                if !args.to_ascii_uppercase().contains("JIS") {
                    return Err(FontPackError::NonJisRegistry {
                        line: line_number,
                        registry: args.trim_matches('"').to_string(),
                    });
                }
            }
            "ENCODING" => {
                let value = args.split_whitespace().next().unwrap_or_default();
                let code: i64 = value.parse().map_err(|_| FontPackError::InvalidEncoding {
                    line: line_number,
                    value: value.to_string(),
                })?;
                let character = decode_jis(code).ok_or(FontPackError::EncodingOutOfRange { line: line_number, code })?;
                let mut pending = std::mem::take(&mut state).into_pending();
                pending.character = Some(character);
                state = ParseState::Header(pending);
            }
            "DWIDTH" => {
                let value = args.split_whitespace().next().unwrap_or_default();
                let width = match value.parse::<u8>() {
                    Ok(width @ (8 | 16)) => width,
                    _ => {
                        return Err(FontPackError::UnsupportedWidth {
                            line: line_number,
                            width: value.to_string(),
                        })
                    }
                };
                let mut pending = std::mem::take(&mut state).into_pending();
                pending.width = Some(width);
                state = ParseState::Header(pending);
            }
            "BITMAP" => {
                state = ParseState::Bitmap(std::mem::take(&mut state).into_pending());
            }
            "ENDCHAR" => {
                let (character, glyph) = std::mem::take(&mut state).into_pending().finish(line_number)?;
                match character {
                    JisCharacter::Char(ch) => match glyphs.entry(ch) {
                        Entry::Occupied(_) => return Err(FontPackError::DuplicateGlyph { line: line_number, ch }),
                        Entry::Vacant(entry) => {
                            log::trace!("'{ch}' ({width}px):\n{glyph}", width = glyph.width());
                            entry.insert(glyph);
                        }
                    },
                    JisCharacter::Invalid => {
                        log::debug!("line {line_number}: dropping glyph without a JIS character");
                        invalid += 1;
                    }
                }
            }
            _ => {}
        }
    }

    log::debug!("parsed {} glyphs, dropped {invalid} invalid ones", glyphs.len());
    Ok(GlyphStore::from_glyphs(glyphs))
}

/// Reads a `.bdf` font file.
pub fn read_bdf_file(path: &Path) -> Result<GlyphStore> {
    let is_bdf = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("bdf"));
    if !is_bdf {
        return Err(FontPackError::NotBdfFile { path: path.to_path_buf() });
    }
    let text = std::fs::read_to_string(path).map_err(|err| FontPackError::read_file(path, err.to_string()))?;
    let store = parse_bdf(&text)?;
    log::info!("{}: {} glyphs", path.display(), store.len());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "STARTFONT 2.1\nFONT -test-fixed-medium-r-normal--16-150-75-75-c-80-jisx0201.1976-0\nSIZE 16 75 75\nCHARSET_REGISTRY \"JISX0201.1976\"\nCHARSET_ENCODING \"0\"\nCHARS 2\n";

    fn glyph_record(encoding: i64, width: u8, row: &str, rows: usize) -> String {
        let mut s = format!("STARTCHAR c{encoding}\nENCODING {encoding}\nSWIDTH 500 0\nDWIDTH {width} 0\nBBX {width} 16 0 -2\nBITMAP\n");
        for _ in 0..rows {
            s.push_str(row);
            s.push('\n');
        }
        s.push_str("ENDCHAR\n");
        s
    }

    #[test]
    fn test_decode_single_byte() {
        assert_eq!(decode_jis(0x41), Some(JisCharacter::Char('A')));
        assert_eq!(decode_jis(0xB1), Some(JisCharacter::Char('ｱ')));
        assert_eq!(decode_jis(0xA0), Some(JisCharacter::Invalid));
        assert_eq!(decode_jis(0x80), Some(JisCharacter::Invalid));
        assert_eq!(decode_jis(0xDF), Some(JisCharacter::Char('ﾟ')));
        // lead byte without a trail byte
        assert_eq!(decode_jis(0x81), Some(JisCharacter::Invalid));
    }

    #[test]
    fn test_decode_double_byte() {
        assert_eq!(decode_jis(0x2121), Some(JisCharacter::Char('\u{3000}')));
        assert_eq!(decode_jis(0x2422), Some(JisCharacter::Char('あ')));
        assert_eq!(decode_jis(0x3B7A), Some(JisCharacter::Char('字')));
        assert_eq!(decode_jis(0x7F21), Some(JisCharacter::Invalid));
        assert_eq!(decode_jis(0x7426), Some(JisCharacter::Char('熙')));
        // NEC row 13 and the NEC selected IBM rows
        assert_eq!(decode_jis(0x2D21), Some(JisCharacter::Invalid));
        assert_eq!(decode_jis(0x7921), Some(JisCharacter::Invalid));
        assert_eq!(decode_jis(0x7C7E), Some(JisCharacter::Invalid));
    }

    #[test]
    fn test_decode_out_of_range() {
        assert_eq!(decode_jis(0x10000), None);
        assert_eq!(decode_jis(-1), Some(JisCharacter::Invalid));
    }

    #[test]
    fn test_parse_glyphs() {
        let mut text = HEADER.to_string();
        text.push_str(&glyph_record(0x41, 8, "18", 16));
        text.push_str(&glyph_record(0x2422, 16, "8001", 16));
        text.push_str("ENDFONT\n");

        let store = parse_bdf(&text).unwrap();
        assert_eq!(store.len(), 2);
        let a = store.get('A').unwrap();
        assert_eq!(a.width(), 8);
        assert!(a.rows().iter().all(|r| *r == 0x18));
        let hiragana = store.get('あ').unwrap();
        assert_eq!(hiragana.width(), 16);
        assert!(hiragana.rows().iter().all(|r| *r == 0x8001));
    }

    #[test]
    fn test_invalid_glyphs_are_dropped() {
        let mut text = HEADER.to_string();
        text.push_str(&glyph_record(0xA0, 8, "00", 16));
        text.push_str(&glyph_record(0xA0, 8, "00", 16));
        text.push_str(&glyph_record(0x7F21, 16, "0000", 16));
        text.push_str(&glyph_record(0x2D21, 16, "0000", 16));
        let store = parse_bdf(&text).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_full_single_byte_font_validates() {
        let mut text = HEADER.to_string();
        for code in 0x20..=0xFF {
            text.push_str(&glyph_record(code, 8, "00", 16));
        }
        let store = parse_bdf(&text).unwrap();
        assert_eq!(store.len(), 0x60 + 0x3F);
        assert!(!store.contains('\u{80}'));
        store.validate().unwrap();
    }

    #[test]
    fn test_non_jis_registry() {
        let text = "STARTFONT 2.1\nCHARSET_REGISTRY \"ISO10646\"\n";
        assert!(matches!(parse_bdf(text), Err(FontPackError::NonJisRegistry { line: 2, .. })));
    }

    #[test]
    fn test_duplicate_glyph() {
        let mut text = HEADER.to_string();
        text.push_str(&glyph_record(0x41, 8, "00", 16));
        text.push_str(&glyph_record(0x41, 8, "00", 16));
        assert!(matches!(parse_bdf(&text), Err(FontPackError::DuplicateGlyph { ch: 'A', .. })));
    }

    #[test]
    fn test_missing_width() {
        let text = "STARTCHAR x\nENCODING 65\nBITMAP\n00\nENDCHAR\n";
        assert!(matches!(parse_bdf(text), Err(FontPackError::MissingWidth { line: 5 })));
    }

    #[test]
    fn test_missing_encoding() {
        let text = "STARTCHAR x\nDWIDTH 8 0\nBITMAP\nENDCHAR\n";
        assert!(matches!(parse_bdf(text), Err(FontPackError::MissingEncoding { line: 4 })));
    }

    #[test]
    fn test_unsupported_width() {
        let text = glyph_record(0x41, 12, "00", 16);
        assert!(matches!(parse_bdf(&text), Err(FontPackError::UnsupportedWidth { line: 4, .. })));
    }

    #[test]
    fn test_row_count_mismatch() {
        let text = glyph_record(0x41, 8, "00", 15);
        assert!(matches!(
            parse_bdf(&text),
            Err(FontPackError::RowCountMismatch {
                expected: 16,
                actual: 15,
                ..
            })
        ));
    }

    #[test]
    fn test_row_too_wide() {
        let text = glyph_record(0x41, 8, "1FF", 16);
        assert!(matches!(parse_bdf(&text), Err(FontPackError::RowTooWide { width: 8, row: 0x1FF, .. })));
    }

    #[test]
    fn test_invalid_row() {
        let text = glyph_record(0x41, 8, "XY", 16);
        assert!(matches!(parse_bdf(&text), Err(FontPackError::InvalidBitmapRow { line: 7, .. })));
    }

    #[test]
    fn test_encoding_out_of_range() {
        let text = glyph_record(0x12345, 16, "00", 16);
        assert!(matches!(parse_bdf(&text), Err(FontPackError::EncodingOutOfRange { line: 2, code: 0x12345 })));
    }

    #[test]
    fn test_unreadable_file() {
        let err = read_bdf_file(Path::new("tests/files/does-not-exist.bdf")).unwrap_err();
        assert!(matches!(err, FontPackError::ReadFile { .. }), "{err}");
    }

    #[test]
    fn test_requires_bdf_extension() {
        let err = read_bdf_file(Path::new("font.yaff")).unwrap_err();
        assert!(matches!(err, FontPackError::NotBdfFile { .. }));
    }
}
