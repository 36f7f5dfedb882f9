use egui::{TextEdit, Ui};
use qrstudio_business::{GenerationParameters, controller};
use qrstudio_states::StateCtx;

/// Single-line field for the encoded text.
pub fn content_input(ctx: &mut StateCtx, ui: &mut Ui) {
    let mut text = ctx.state::<GenerationParameters>().text.clone();

    ui.horizontal(|ui| {
        let label = ui.label("Content");
        let response = ui
            .add(
                TextEdit::singleline(&mut text)
                    .hint_text("Text or URL to encode")
                    .desired_width(f32::INFINITY),
            )
            .labelled_by(label.id);

        if response.changed() {
            log::trace!(target: "qrstudio::ui", "content edited, {} bytes", text.len());
            controller::edit_parameters(ctx, |params| params.text = text);
        }
    });
}
