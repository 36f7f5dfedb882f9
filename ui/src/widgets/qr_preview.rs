use egui::{Image, Ui, Vec2};
use qrstudio_business::{GenerationParameters, controller};

use crate::state::State;
use crate::utils::colors::{COLOR_AMBER, COLOR_GREEN, COLOR_RED};

/// Largest on-screen side of the preview (points).
const MAX_PREVIEW_SIZE: f32 = 320.0;

/// Shows the latest composite and a status line under it.
///
/// While a newer render runs the previous image stays up and the status line
/// turns amber; a failed render shows its error instead of the image.
pub fn qr_preview(state: &mut State, ui: &mut Ui) {
    if !state.ctx.state::<GenerationParameters>().is_renderable() {
        ui.weak("Enter some text to generate a QR code");
        return;
    }

    let status = controller::generation_status(&state.ctx);
    let output = controller::render_output(&state.ctx).cloned();
    let egui_ctx = ui.ctx().clone();

    if let Some(surface) = output.as_ref().and_then(|output| output.surface.as_ref()) {
        let texture = state.preview_texture(&egui_ctx, surface);
        let side = ui.available_width().clamp(64.0, MAX_PREVIEW_SIZE);
        ui.add(Image::new((texture.id(), Vec2::splat(side))).alt_text("QR code preview"));
    }

    if status.ready {
        let text = match output.as_ref().and_then(|output| output.symbol) {
            Some(symbol) => format!(
                "Ready · version {} · {m}×{m} modules",
                symbol.version,
                m = symbol.modules
            ),
            None => "Ready".to_owned(),
        };
        ui.colored_label(COLOR_GREEN, text);
    } else if status.is_failed() {
        let error = output
            .as_ref()
            .and_then(|output| output.error.as_deref())
            .unwrap_or("unknown error");
        ui.colored_label(COLOR_RED, format!("Could not render: {error}"));
    } else {
        ui.colored_label(COLOR_AMBER, "Rendering…");
    }
}
