/// Rows per glyph in the block font
pub const GLYPH_HEIGHT: usize = 5;

type Glyph = [&'static str; GLYPH_HEIGHT];

const DIGITS: [Glyph; 10] = [
    ["██████", "█    █", "█    █", "█    █", "██████"],
    ["  ██  ", "  ██  ", "  ██  ", "  ██  ", "  ██  "],
    ["██████", "     █", "██████", "█     ", "██████"],
    ["██████", "     █", "██████", "     █", "██████"],
    ["█    █", "█    █", "██████", "     █", "     █"],
    ["██████", "█     ", "██████", "     █", "██████"],
    ["██████", "█     ", "██████", "█    █", "██████"],
    ["██████", "     █", "     █", "     █", "     █"],
    ["██████", "█    █", "██████", "█    █", "██████"],
    ["██████", "█    █", "██████", "     █", "██████"],
];

const COLON: Glyph = ["      ", "  ██  ", "      ", "  ██  ", "      "];

fn glyph(c: char) -> Option<&'static Glyph> {
    match c {
        ':' => Some(&COLON),
        _ => c.to_digit(10).map(|d| &DIGITS[d as usize]),
    }
}

/// Render `text` as rows of block glyphs separated by one column.
/// Characters without a glyph are skipped.
pub fn render_big(text: &str) -> Vec<String> {
    let glyphs: Vec<&Glyph> = text.chars().filter_map(glyph).collect();
    (0..GLYPH_HEIGHT)
        .map(|row| {
            glyphs
                .iter()
                .map(|g| g[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
