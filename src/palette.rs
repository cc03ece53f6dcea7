// Colors: parsing user-supplied color strings and ordinal palettes

use plotters::style::RGBColor;

/// The ten-color categorical scheme used for series fills
pub const CATEGORY10: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

/// Default box fill
pub const BOX_FILL: RGBColor = RGBColor(0x69, 0xb3, 0xa2);

/// Default line stroke
pub const LINE_STROKE: RGBColor = CATEGORY10[0];

/// Parse a named color or a `#rgb` / `#rrggbb` hex string
pub fn parse_color(color: &str) -> Option<RGBColor> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        return parse_hex(hex);
    }
    let named = match color.to_ascii_lowercase().as_str() {
        "red" => RGBColor(255, 0, 0),
        "green" => RGBColor(0, 128, 0),
        "blue" => RGBColor(0, 0, 255),
        "black" => RGBColor(0, 0, 0),
        "white" => RGBColor(255, 255, 255),
        "yellow" => RGBColor(255, 255, 0),
        "cyan" => RGBColor(0, 255, 255),
        "magenta" => RGBColor(255, 0, 255),
        "gray" | "grey" => RGBColor(128, 128, 128),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "steelblue" => RGBColor(70, 130, 180),
        _ => return None,
    };
    Some(named)
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(RGBColor(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(RGBColor(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

/// Resolve an optional color string, falling back (with a warning) when the
/// string is not recognised.
pub fn resolve_color(color: Option<&str>, fallback: RGBColor) -> RGBColor {
    match color {
        None => fallback,
        Some(text) => parse_color(text).unwrap_or_else(|| {
            log::warn!("Unknown color '{}', using default", text);
            fallback
        }),
    }
}

/// Maps each key of a categorical domain to a color, cycling through the
/// range when there are more keys than colors.
#[derive(Debug, Clone)]
pub struct OrdinalPalette<K> {
    domain: Vec<K>,
    range: Vec<RGBColor>,
}

impl<K: PartialEq + Clone> OrdinalPalette<K> {
    pub fn new<I>(domain: I, range: &[RGBColor]) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut keys: Vec<K> = Vec::new();
        for key in domain {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        let range = if range.is_empty() {
            CATEGORY10.to_vec()
        } else {
            range.to_vec()
        };
        Self { domain: keys, range }
    }

    /// Keys outside the domain get the first color
    pub fn color(&self, key: &K) -> RGBColor {
        let idx = self.domain.iter().position(|k| k == key).unwrap_or(0);
        self.range[idx % self.range.len()]
    }

    pub fn entries(&self) -> impl Iterator<Item = (&K, RGBColor)> {
        self.domain.iter().map(move |k| (k, self.color(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_color("#69b3a2"), Some(RGBColor(0x69, 0xb3, 0xa2)));
        assert_eq!(parse_color("#fff"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(parse_color("Red"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn test_resolve_color_fallback() {
        assert_eq!(resolve_color(None, BOX_FILL), BOX_FILL);
        assert_eq!(resolve_color(Some("nope"), BOX_FILL), BOX_FILL);
        assert_eq!(resolve_color(Some("black"), BOX_FILL), RGBColor(0, 0, 0));
    }

    #[test]
    fn test_ordinal_palette_cycles() {
        let palette = OrdinalPalette::new(vec!["a", "b", "c", "a"], &CATEGORY10[..2]);
        assert_eq!(palette.color(&"a"), CATEGORY10[0]);
        assert_eq!(palette.color(&"b"), CATEGORY10[1]);
        assert_eq!(palette.color(&"c"), CATEGORY10[0]);
        assert_eq!(palette.entries().count(), 3);
    }
}
