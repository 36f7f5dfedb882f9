use egui::{Slider, Ui};
use qrstudio_business::{
    GenerationParameters, MAX_OUTPUT_DIMENSION, MIN_OUTPUT_DIMENSION, OUTPUT_DIMENSION_STEP,
    controller,
};
use qrstudio_states::StateCtx;

pub fn size_slider(ctx: &mut StateCtx, ui: &mut Ui) {
    let mut dimension = ctx.state::<GenerationParameters>().output_dimension;

    let response = ui.add(
        Slider::new(&mut dimension, MIN_OUTPUT_DIMENSION..=MAX_OUTPUT_DIMENSION)
            .step_by(f64::from(OUTPUT_DIMENSION_STEP))
            .text("Output size")
            .suffix(" px"),
    );

    if response.changed() {
        controller::edit_parameters(ctx, |params| params.output_dimension = dimension);
    }
}
