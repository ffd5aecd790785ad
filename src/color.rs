use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Diverging ramp for the correlation heatmap
// ---------------------------------------------------------------------------

const COOL: (u8, u8, u8) = (59, 76, 192);
const NEUTRAL: (u8, u8, u8) = (221, 221, 221);
const WARM: (u8, u8, u8) = (180, 4, 38);

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

/// Blue → grey → red ramp over `[-1, 1]`. Undefined values are drawn grey.
pub fn coolwarm(value: Option<f64>) -> Color32 {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return Color32::GRAY;
    };
    let v = v.clamp(-1.0, 1.0) as f32;
    let mixed = if v < 0.0 {
        linear(NEUTRAL).mix(linear(COOL), -v)
    } else {
        linear(NEUTRAL).mix(linear(WARM), v)
    };
    to_color32(Srgb::from_linear(mixed))
}

/// Text colour readable on top of `coolwarm(value)`.
pub fn text_on_coolwarm(value: Option<f64>) -> Color32 {
    match value {
        Some(v) if v.abs() > 0.6 => Color32::WHITE,
        _ => Color32::BLACK,
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the levels of a categorical axis to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map over `levels`, in order.
    pub fn new(levels: &[String]) -> Self {
        let palette = generate_palette(levels.len());
        let mapping = levels.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(5).len(), 5);
    }

    fn close(a: Color32, (r, g, b): (u8, u8, u8)) -> bool {
        a.r().abs_diff(r) <= 1 && a.g().abs_diff(g) <= 1 && a.b().abs_diff(b) <= 1
    }

    #[test]
    fn coolwarm_endpoints() {
        assert!(close(coolwarm(Some(1.0)), WARM));
        assert!(close(coolwarm(Some(-1.0)), COOL));
        assert!(close(coolwarm(Some(0.0)), NEUTRAL));
        assert!(close(coolwarm(Some(7.0)), WARM));
        assert_eq!(coolwarm(None), Color32::GRAY);
    }

    #[test]
    fn unknown_label_falls_back() {
        let map = ColorMap::new(&["Male".to_string(), "Female".to_string()]);
        assert_ne!(map.color_for("Male"), map.color_for("Female"));
        assert_eq!(map.color_for("Other"), Color32::LIGHT_BLUE);
    }
}
