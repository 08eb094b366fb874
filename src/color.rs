use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::state::Severity;

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
            let hue = (i as f32 / n as f32) * 360.0 + 210.0;
            let hsl = Hsl::new(hue, 0.70, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Chart series colours
// ---------------------------------------------------------------------------

/// Colours for one trial chart: the measurement line and its two mean guides.
#[derive(Debug, Clone, Copy)]
pub struct SeriesColors {
    pub line: Color32,
    pub early_mean: Color32,
    pub late_mean: Color32,
}

impl SeriesColors {
    /// `[time, errors]` chart colours, drawn from one shared palette.
    pub fn for_charts() -> [SeriesColors; 2] {
        let p = generate_palette(6);
        [
            SeriesColors {
                line: p[0],
                early_mean: p[1],
                late_mean: p[2],
            },
            SeriesColors {
                line: p[3],
                early_mean: p[4],
                late_mean: p[5],
            },
        ]
    }
}

/// Text colour for a headline.
pub fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Success => Color32::from_rgb(46, 160, 67),
        Severity::Info => Color32::LIGHT_BLUE,
        Severity::Warning => Color32::from_rgb(210, 153, 34),
        Severity::Error => Color32::RED,
    }
}
