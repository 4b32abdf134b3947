/// Whitespace as understood by the data source: unicode whitespace plus the byte order mark,
/// but not the next line control (U+0085).
pub fn is_blank(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

pub fn trim_blank(s: &str) -> &str {
    s.trim_matches(is_blank)
}
