//! Unified error types for uxn_font

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for font packing operations
#[derive(Debug, Error)]
pub enum FontPackError {
    // === I/O Errors ===
    #[error("Failed to read file '{path}': {message}")]
    ReadFile { path: PathBuf, message: String },

    #[error("Invalid options file '{path}': {message}")]
    InvalidOptions { path: PathBuf, message: String },

    // === BDF Errors ===
    #[error("Not a BDF font file: '{path}'")]
    NotBdfFile { path: PathBuf },

    #[error("line {line}: charset registry '{registry}' is not a JIS registry")]
    NonJisRegistry { line: usize, registry: String },

    #[error("line {line}: invalid ENCODING value '{value}'")]
    InvalidEncoding { line: usize, value: String },

    #[error("line {line}: ENCODING {code:#x} does not fit into two bytes")]
    EncodingOutOfRange { line: usize, code: i64 },

    #[error("line {line}: glyph has no ENCODING")]
    MissingEncoding { line: usize },

    #[error("line {line}: glyph has no DWIDTH")]
    MissingWidth { line: usize },

    #[error("line {line}: glyph width {width} is not supported (expected 8 or 16)")]
    UnsupportedWidth { line: usize, width: String },

    #[error("line {line}: invalid bitmap row '{value}'")]
    InvalidBitmapRow { line: usize, value: String },

    #[error("line {line}: bitmap row {row:#x} is wider than {width} pixels")]
    RowTooWide { line: usize, row: u32, width: u8 },

    #[error("line {line}: glyph has {actual} bitmap rows, expected {expected}")]
    RowCountMismatch { line: usize, expected: usize, actual: usize },

    #[error("line {line}: character '{ch}' is defined twice")]
    DuplicateGlyph { line: usize, ch: char },

    // === Store Errors ===
    #[error("Characters '{first}' and '{second}' share prehash {prehash:#06x}")]
    PrehashCollision { first: char, second: char, prehash: u16 },

    #[error("Character '{ch}' (prehash {prehash:#06x}) is {width}px wide, which the prehash range check does not predict")]
    WidthRangeMismatch { ch: char, prehash: u16, width: u8 },

    #[error("No glyph for character '{ch}'")]
    MissingGlyph { ch: char },

    // === Search Errors ===
    #[error("no mod chain found for {keys} keys")]
    NoModChain { keys: usize },

    #[error("Cannot search a mod chain for an empty key set")]
    EmptyKeySet,

    #[error("Coarseness must be at least 1")]
    InvalidCoarseness,

    // === Packing Errors ===
    #[error("Glyph offset {offset} does not fit into a 2-byte lookup table entry")]
    OffsetOverflow { offset: usize },
}

/// Result type alias for uxn_font operations
pub type Result<T> = std::result::Result<T, FontPackError>;

// === Convenience constructors ===
impl FontPackError {
    /// Create a read file error
    pub fn read_file(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ReadFile {
            path: path.into(),
            message: msg.into(),
        }
    }
}
