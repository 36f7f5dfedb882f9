//! Logo drop zone, current logo and its size slider.

use egui::{Frame, Slider, Ui};
use qrstudio_business::{
    GenerationParameters, MAX_LOGO_SIZE_PERCENT, MIN_LOGO_SIZE_PERCENT, controller,
};

use crate::state::State;

/// Side of the logo thumbnail on screen (points).
const THUMBNAIL_SIZE: f32 = 48.0;

/// Draws the logo controls. Returns `true` when "Choose file…" was clicked.
///
/// Removing the logo is applied directly; opening a file picker is left to
/// the caller since it is platform specific.
pub fn logo_panel(state: &mut State, ui: &mut Ui) -> bool {
    let params = state.ctx.state::<GenerationParameters>();
    let logo = params.logo.clone();
    let mut percent = params.logo_size_percent;
    let egui_ctx = ui.ctx().clone();
    let mut pick_requested = false;

    match logo {
        None => {
            let hovering = egui_ctx.input(|i| !i.raw.hovered_files.is_empty());
            Frame::group(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(if hovering {
                        "Release to use as logo"
                    } else {
                        "Drop an image here"
                    });
                    pick_requested = ui.button("Choose file…").clicked();
                });
            });
        }
        Some(logo) => {
            let mut remove = false;
            ui.horizontal(|ui| {
                if let Some(texture) = state.logo_texture(&egui_ctx, &logo) {
                    let size = texture.size_vec2();
                    let scale = THUMBNAIL_SIZE / size.x.max(size.y).max(1.0);
                    ui.add(
                        egui::Image::new((texture.id(), size * scale)).alt_text("Logo thumbnail"),
                    );
                } else if controller::logo_preview(&state.ctx)
                    .is_some_and(|preview| preview.failed_for(&logo))
                {
                    ui.weak("No preview");
                } else {
                    ui.spinner();
                }
                ui.label(format!("Logo: {}", logo.name()));
                remove = ui.button("Remove logo").clicked();
            });
            if remove {
                log::info!(target: "qrstudio::ui", "logo {} removed", logo.name());
                controller::edit_parameters(&mut state.ctx, |params| params.logo = None);
            }
        }
    }

    let has_logo = state.ctx.state::<GenerationParameters>().has_logo();
    let response = ui.add_enabled(
        has_logo,
        Slider::new(&mut percent, MIN_LOGO_SIZE_PERCENT..=MAX_LOGO_SIZE_PERCENT)
            .step_by(1.0)
            .text("Logo size")
            .suffix("%"),
    );
    if response.changed() {
        controller::edit_parameters(&mut state.ctx, |params| {
            params.logo_size_percent = percent;
        });
    }

    pick_requested
}
