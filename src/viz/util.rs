//! Utility functions for visualization: color parsing.

use super::types::Rgb8;

/// Named colors recognized in style strings.
const NAMED: [(&str, Rgb8); 8] = [
    ("blue", Rgb8::new(0, 0, 255)),
    ("red", Rgb8::new(255, 0, 0)),
    ("green", Rgb8::new(0, 128, 0)),
    ("black", Rgb8::new(0, 0, 0)),
    ("white", Rgb8::new(255, 255, 255)),
    ("gray", Rgb8::new(128, 128, 128)),
    ("grey", Rgb8::new(128, 128, 128)),
    ("orange", Rgb8::new(255, 165, 0)),
];

/// Parse `#rgb`, `#rrggbb`, or a named color. Returns `None` for anything else.
pub fn parse_color(s: &str) -> Option<Rgb8> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        if !hex.is_ascii() {
            return None;
        }
        return match hex.len() {
            3 => Some(Rgb8::new(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
            6 => Some(Rgb8::new(byte(0)?, byte(2)?, byte(4)?)),
            _ => None,
        };
    }
    NAMED
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, c)| *c)
}

/// Like [`parse_color`], falling back to blue (the default series color).
pub fn color_or_default(s: &str) -> Rgb8 {
    parse_color(s).unwrap_or_else(|| {
        log::debug!("unrecognized color {s:?}, using blue");
        Rgb8::BLUE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_named_colors() {
        assert_eq!(parse_color("#1d4ed8"), Some(Rgb8::new(0x1d, 0x4e, 0xd8)));
        assert_eq!(parse_color("#444"), Some(Rgb8::new(0x44, 0x44, 0x44)));
        assert_eq!(parse_color("Blue"), Some(Rgb8::BLUE));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(color_or_default("chartreuse-ish"), Rgb8::BLUE);
    }
}
