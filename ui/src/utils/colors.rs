//! Shared colors of the UI and conversions for the color pickers.

use egui::Color32;
use qrstudio_business::Rgb;

/// Status line color once the render is ready.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Status line color when the render failed.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Status line color while waiting for the debounce or a running render.
pub const COLOR_AMBER: Color32 = Color32::from_rgb(255, 193, 7);

/// `#rrggbb`, lowercase.
pub fn hex(rgb: Rgb) -> String {
    let [r, g, b] = rgb;
    format!("#{r:02x}{g:02x}{b:02x}")
}
