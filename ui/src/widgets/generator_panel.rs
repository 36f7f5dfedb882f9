use egui::Ui;

use crate::state::{ExportMessage, State};
use crate::utils::colors::{COLOR_GREEN, COLOR_RED};
use crate::widgets::{
    color_controls, content_input, download_button, logo_panel, qr_preview, size_slider,
};

/// Requests from the panel that need platform services.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PanelActions {
    pub pick_logo: bool,
    pub download: bool,
}

/// The whole generator form, top to bottom.
pub fn generator_panel(state: &mut State, ui: &mut Ui) -> PanelActions {
    ui.heading("QR Studio");
    ui.add_space(4.0);

    content_input(&mut state.ctx, ui);
    ui.separator();

    color_controls(&mut state.ctx, ui);
    ui.separator();

    let pick_logo = logo_panel(state, ui);
    ui.separator();

    size_slider(&mut state.ctx, ui);
    ui.separator();

    qr_preview(state, ui);
    let download = download_button(&state.ctx, ui);

    match &state.export_message {
        Some(ExportMessage::Saved(to)) => {
            ui.colored_label(COLOR_GREEN, format!("Saved to {to}"));
        }
        Some(ExportMessage::Failed(err)) => {
            ui.colored_label(COLOR_RED, format!("Export failed: {err}"));
        }
        None => {}
    }

    PanelActions {
        pick_logo,
        download,
    }
}
