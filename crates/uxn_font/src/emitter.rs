//! Renders a [`PackedFont`] as uxntal data.

use crate::PackedFont;

/// Bytes per line of a hex dump.
pub const HEXDUMP_LINE_LEN: usize = 32;

/// Hex dump lines: four spaces indent, lowercase byte pairs separated by a space.
pub fn hexdump(data: &[u8]) -> impl Iterator<Item = String> + '_ {
    data.chunks(HEXDUMP_LINE_LEN).map(|line| {
        let pairs: Vec<String> = line
            .rchunks(2)
            .rev()
            .map(|pair| pair.iter().map(|b| format!("{b:02x}")).collect())
            .collect();
        format!("    {}", pairs.join(" "))
    })
}

/// Renders the labels and data of a packed font, `prefix` names the labels
/// (`@font-mod1`, `@font-mod2`, `@font-lut` and `@font` for "font").
pub fn render_tal(font: &PackedFont, prefix: &str) -> String {
    let mut lines = vec![format!("@{prefix}-mod1 {:04x}", font.chain.a), format!("@{prefix}-mod2 {:04x}", font.chain.b)];
    if let Some(table) = &font.lookup_table {
        lines.push(format!("@{prefix}-lut"));
        lines.extend(hexdump(table));
    }
    lines.push(format!("@{prefix}"));
    lines.extend(hexdump(&font.glyph_data));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
