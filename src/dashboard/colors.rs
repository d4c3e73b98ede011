//! Hex color helpers: parsing, perceived darkness, hue, and tile styling.

use crate::dashboard::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Parses `#RRGGBB` (case-insensitive, `#` optional). Anything else is `None`.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Whether text on `color`, blended `darkness` percent toward white, should be light.
///
/// Malformed colors are treated as light backgrounds.
pub fn is_color_dark(color: &str, darkness: u8) -> bool {
    let Some(rgb) = hex_to_rgb(color) else {
        return false;
    };
    let d = f64::from(darkness.min(100)) / 100.0;
    let blend = |c: u8| f64::from(c) * (1.0 - d) + 255.0 * d;

    let luminance =
        (0.299 * blend(rgb.r) + 0.587 * blend(rgb.g) + 0.114 * blend(rgb.b)) / 255.0;
    luminance < 0.5
}

/// HSL hue in degrees `[0, 360)`. Achromatic and malformed colors yield 0,
/// the same as pure red.
pub fn hex_to_hue(hex: &str) -> f64 {
    let Some(rgb) = hex_to_rgb(hex) else {
        return 0.0;
    };
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;
    if diff == 0.0 {
        return 0.0;
    }

    let hue = if max == r {
        ((g - b) / diff + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / diff + 2.0) / 6.0
    } else {
        ((r - g) / diff + 4.0) / 6.0
    };
    hue * 360.0
}

/// Validates free-text color input and returns it as uppercase `#RRGGBB`.
pub fn parse_custom_color(input: &str) -> Result<String, DashboardError> {
    let trimmed = input.trim();
    let candidate = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    };
    if hex_to_rgb(&candidate).is_none() || candidate.len() != 7 {
        return Err(DashboardError::Validation(format!(
            "Enter a valid color code such as #9B4400 (got {input:?})"
        )));
    }
    Ok(candidate.to_uppercase())
}

/// Computed presentation of a tile card.
#[derive(Debug, Clone, PartialEq)]
pub struct TileStyle {
    /// CSS for the accent border, always present.
    pub border_top: String,
    /// CSS background fill; `None` means the plain card background.
    pub background: Option<String>,
    /// Whether labels drawn on this tile should be light.
    pub light_text: bool,
}

pub fn tile_style(color: &str, darkness: u8) -> TileStyle {
    let border_top = format!("4px solid {color}");
    let background = match (darkness.min(100), hex_to_rgb(color)) {
        (0, _) | (_, None) => None,
        (d, Some(rgb)) => Some(format!(
            "rgba({}, {}, {}, {})",
            rgb.r,
            rgb.g,
            rgb.b,
            f64::from(d) / 100.0
        )),
    };
    TileStyle {
        border_top,
        background,
        light_text: is_color_dark(color, darkness),
    }
}
