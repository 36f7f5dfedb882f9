use egui::Ui;
use qrstudio_business::{GenerationParameters, Rgb, controller};
use qrstudio_states::StateCtx;

use crate::utils::colors::hex;

/// Foreground and background pickers plus the transparency toggle.
///
/// The background picker is hidden while the background is transparent; the
/// chosen color is kept and comes back when transparency is turned off.
pub fn color_controls(ctx: &mut StateCtx, ui: &mut Ui) {
    let params = ctx.state::<GenerationParameters>();
    let mut foreground = params.foreground;
    let mut background = params.background;
    let mut transparent = params.transparent_background;

    if color_row(ui, "Foreground", &mut foreground) {
        controller::edit_parameters(ctx, |params| params.foreground = foreground);
    }

    if ui
        .checkbox(&mut transparent, "Transparent background")
        .changed()
    {
        controller::edit_parameters(ctx, |params| {
            params.transparent_background = transparent;
        });
    }

    if !transparent && color_row(ui, "Background", &mut background) {
        controller::edit_parameters(ctx, |params| params.background = background);
    }
}

fn color_row(ui: &mut Ui, label: &str, rgb: &mut Rgb) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let changed = ui.color_edit_button_srgb(rgb).changed();
        ui.monospace(hex(*rgb));
        changed
    })
    .inner
}
