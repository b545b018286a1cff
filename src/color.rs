use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Dashboard colours
// ---------------------------------------------------------------------------

pub const PRIMARY: Color32 = Color32::from_rgb(0x00, 0x4b, 0xa0);
pub const GOLD: Color32 = Color32::from_rgb(0xd4, 0xaf, 0x37);
pub const WIN: Color32 = Color32::from_rgb(0x2e, 0x8b, 0x57);
pub const NEUTRAL: Color32 = Color32::GRAY;

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
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Colour for the i-th selected entity. The first two keep the house
/// colours so a two-way comparison always reads blue against gold.
pub fn entity_color(index: usize, total: usize) -> Color32 {
    match index {
        0 => PRIMARY,
        1 => GOLD,
        _ => generate_palette(total.max(index + 1))
            .get(index)
            .copied()
            .unwrap_or(NEUTRAL),
    }
}

/// Colour for a result category label produced by the metric layer.
pub fn outcome_color(label: &str) -> Color32 {
    match label {
        "runs" => PRIMARY,
        "wickets" => WIN,
        "tie" => GOLD,
        _ => NEUTRAL,
    }
}
