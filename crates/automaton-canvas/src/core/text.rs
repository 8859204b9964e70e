//! Text helpers shared by the renderer and hit testing

use unicode_width::UnicodeWidthStr;

/// Escape text for use inside SVG element content or attribute values.
pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Approximate rendered size `(width, height)` of a centered label.
///
/// Uses display columns, so wide glyphs count double; one column is taken as
/// 0.6 em.
pub fn label_extent(label: &str, font_size: f64) -> (f64, f64) {
    let columns = UnicodeWidthStr::width(label).max(1) as f64;
    (columns * font_size * 0.6, font_size)
}
