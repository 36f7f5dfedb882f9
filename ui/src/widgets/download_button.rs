use egui::Ui;
use qrstudio_business::{EXPORT_FILE_NAME, controller};
use qrstudio_states::StateCtx;

/// "Download PNG", shown only once the current parameters finished rendering.
/// Returns whether it was clicked.
pub fn download_button(ctx: &StateCtx, ui: &mut Ui) -> bool {
    if !controller::generation_status(ctx).ready {
        return false;
    }

    ui.button("Download PNG")
        .on_hover_text(format!("Save as {EXPORT_FILE_NAME}"))
        .clicked()
}
