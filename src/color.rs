use anyhow::{Context, Result};
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hex parsing
// ---------------------------------------------------------------------------

/// Parse `"#f34f1c"` (the leading `#` is optional).
pub fn parse_hex(text: &str) -> Result<Srgb<u8>> {
    text.trim()
        .parse::<Srgb<u8>>()
        .with_context(|| format!("'{text}' is not a hex colour"))
}

/// Resolve optional configured colours, filling gaps from [`generate_palette`].
pub fn resolve_colors(configured: &[Option<String>]) -> Result<Vec<Srgb<u8>>> {
    let generated = generate_palette(configured.len());
    configured
        .iter()
        .zip(generated)
        .map(|(c, fallback)| match c {
            Some(hex) => parse_hex(hex),
            None => Ok(fallback),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(parse_hex("#f34f1c").unwrap(), Srgb::new(0xf3, 0x4f, 0x1c));
        assert_eq!(parse_hex("80ba06").unwrap(), Srgb::new(0x80, 0xba, 0x06));
        assert!(parse_hex("orange").is_err());
    }

    #[test]
    fn palette_has_distinct_entries() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in i + 1..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn missing_colours_are_generated() {
        let colors = resolve_colors(&[Some("#000000".into()), None]).unwrap();
        assert_eq!(colors[0], Srgb::new(0, 0, 0));
        assert_eq!(colors[1], generate_palette(2)[1]);
    }
}
