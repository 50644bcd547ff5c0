use ratatui::style::Color;

/// CSS named colours that show up in hand-written styles.
const NAMED: [(&str, Color); 12] = [
    ("black", Color::Rgb(0, 0, 0)),
    ("white", Color::Rgb(255, 255, 255)),
    ("red", Color::Rgb(255, 0, 0)),
    ("green", Color::Rgb(0, 128, 0)),
    ("blue", Color::Rgb(0, 0, 255)),
    ("yellow", Color::Rgb(255, 255, 0)),
    ("orange", Color::Rgb(255, 165, 0)),
    ("gray", Color::Rgb(128, 128, 128)),
    ("grey", Color::Rgb(128, 128, 128)),
    ("silver", Color::Rgb(192, 192, 192)),
    ("navy", Color::Rgb(0, 0, 128)),
    ("transparent", Color::Reset),
];

/// Parse a CSS colour string from a style's paint properties.
///
/// Supports hex (`#rgb`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()`,
/// `hsl()`/`hsla()` and a handful of names. Alpha is ignored.
pub fn parse_css_color(input: &str) -> Option<Color> {
    let s = input.trim().to_ascii_lowercase();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = function_args(&s, "rgba").or_else(|| function_args(&s, "rgb")) {
        let [r, g, b] = first_three(args)?;
        return Some(Color::Rgb(channel(r)?, channel(g)?, channel(b)?));
    }
    if let Some(args) = function_args(&s, "hsla").or_else(|| function_args(&s, "hsl")) {
        let [h, sat, light] = first_three(args)?;
        let h: f64 = h.parse().ok()?;
        let sat = percent(sat)?;
        let light = percent(light)?;
        let (r, g, b) = hsl_to_rgb(h, sat, light);
        return Some(Color::Rgb(r, g, b));
    }
    NAMED
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, color)| *color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 | 4 => Some(Color::Rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 | 8 => Some(Color::Rgb(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn first_three(args: &str) -> Option<[&str; 3]> {
    let mut parts = args.split(',').map(str::trim);
    Some([parts.next()?, parts.next()?, parts.next()?])
}

fn channel(v: &str) -> Option<u8> {
    let n: f64 = match v.strip_suffix('%') {
        Some(p) => p.trim().parse::<f64>().ok()? * 2.55,
        None => v.parse().ok()?,
    };
    Some(n.round().clamp(0.0, 255.0) as u8)
}

fn percent(v: &str) -> Option<f64> {
    let n: f64 = v.strip_suffix('%').unwrap_or(v).trim().parse().ok()?;
    Some((n / 100.0).clamp(0.0, 1.0))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0) / 360.0;
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return (v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    (hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        assert_eq!(parse_css_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_css_color("#1A2b3C"), Some(Color::Rgb(26, 43, 60)));
        assert_eq!(parse_css_color("#1a2b3c80"), Some(Color::Rgb(26, 43, 60)));
        assert_eq!(parse_css_color("#12345"), None);
        assert_eq!(parse_css_color("#ggg"), None);
    }

    #[test]
    fn functional_forms() {
        assert_eq!(
            parse_css_color("rgb(10, 20, 30)"),
            Some(Color::Rgb(10, 20, 30))
        );
        assert_eq!(
            parse_css_color("rgba(255,0,0,0.5)"),
            Some(Color::Rgb(255, 0, 0))
        );
        assert_eq!(
            parse_css_color("hsl(0, 100%, 50%)"),
            Some(Color::Rgb(255, 0, 0))
        );
        assert_eq!(
            parse_css_color("hsla(120, 100%, 25%, 0.3)"),
            Some(Color::Rgb(0, 128, 0))
        );
        assert_eq!(
            parse_css_color("hsl(0, 0%, 50%)"),
            Some(Color::Rgb(128, 128, 128))
        );
        assert_eq!(parse_css_color("rgb(1, 2)"), None);
    }

    #[test]
    fn names_and_garbage() {
        assert_eq!(parse_css_color(" White "), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_css_color("not-a-colour"), None);
    }
}
