//! Hex color arithmetic for accent variants.

pub(crate) fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

fn to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn map_channels(hex: &str, f: impl Fn(f64) -> f64) -> Option<String> {
    let channels = parse_hex(hex)?;
    Some(to_hex(channels.map(|c| f(f64::from(c)).floor().clamp(0.0, 255.0) as u8)))
}

/// Moves each channel `percent`% of the way towards 255.
pub fn lighten_color(hex: &str, percent: f64) -> Option<String> {
    map_channels(hex, |c| c + (255.0 - c) * percent / 100.0)
}

/// Scales each channel down by `percent`%.
pub fn darken_color(hex: &str, percent: f64) -> Option<String> {
    map_channels(hex, |c| c * (1.0 - percent / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(hex: &str) -> [u8; 3] {
        parse_hex(hex).unwrap()
    }

    #[test]
    fn lighten_matches_known_value() {
        assert_eq!(lighten_color("#2563eb", 10.0).as_deref(), Some("#3a72ed"));
    }

    #[test]
    fn darken_matches_known_value() {
        assert_eq!(darken_color("#2563eb", 10.0).as_deref(), Some("#2159d3"));
    }

    #[test]
    fn lightening_never_decreases_a_channel() {
        for base in ["#2563eb", "#059669", "#7c3aed", "#dc2626", "#ea580c", "#0d9488", "#000000", "#ffffff"] {
            for percent in [0.0, 10.0, 50.0, 100.0] {
                let light = channels(&lighten_color(base, percent).unwrap());
                let original = channels(base);
                assert!(light.iter().zip(original).all(|(l, o)| *l >= o), "{base} {percent}");
            }
        }
    }

    #[test]
    fn extremes_clamp() {
        assert_eq!(lighten_color("#123456", 100.0).as_deref(), Some("#ffffff"));
        assert_eq!(darken_color("#123456", 100.0).as_deref(), Some("#000000"));
        assert_eq!(lighten_color("#123456", 250.0).as_deref(), Some("#ffffff"));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert_eq!(lighten_color("blue", 10.0), None);
        assert_eq!(darken_color("#12345", 10.0), None);
        assert_eq!(darken_color("#zzzzzz", 10.0), None);
    }
}
