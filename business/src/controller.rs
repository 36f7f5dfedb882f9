//! Single update path for the generator.
//!
//! Widgets never write [`GenerationParameters`] directly. They call
//! [`edit_parameters`], which normalizes the edit, invalidates the current
//! render and re-arms the debounce. The frame loop calls [`tick`] once per
//! frame to apply results and dispatch renders whose quiet period is over.

use qrstudio_states::{StateCtx, TaskId, Time};

use crate::{
    GenerationParameters, GenerationStatus, GeneratorConfig, LogoPreview, LogoPreviewCommand,
    RenderCommand, RenderError, RenderOutput, RenderPhase, RenderSchedule,
};

/// Registers every state, compute and command of the generator.
pub fn install(ctx: &mut StateCtx, config: GeneratorConfig) {
    log::info!(
        target: "qrstudio::render",
        "generator installed (debounce {}ms, margin {})",
        config.debounce_ms,
        config.margin
    );
    ctx.add_state(Time::default());
    ctx.add_state(GenerationParameters::with_config(&config));
    ctx.add_state(config);
    ctx.add_state(RenderSchedule::default());
    ctx.record_compute(RenderOutput::default());
    ctx.record_compute(GenerationStatus::default());
    ctx.record_compute(LogoPreview::default());
    ctx.record_command(RenderCommand);
    ctx.record_command(LogoPreviewCommand);
    ctx.run_all_dirty();
}

/// Applies `edit` to the parameters.
///
/// Returns `false` when the edit changed nothing after clamping. Otherwise the
/// generation status is reset right away and a render is armed, or disarmed
/// when the text became empty.
pub fn edit_parameters(
    ctx: &mut StateCtx,
    edit: impl FnOnce(&mut GenerationParameters),
) -> bool {
    let mut next = ctx.state::<GenerationParameters>().clone();
    edit(&mut next);
    let next = next.normalize();
    if next == *ctx.state::<GenerationParameters>() {
        return false;
    }

    let renderable = next.is_renderable();
    let logo_changed = next.logo != ctx.state::<GenerationParameters>().logo;
    ctx.update::<GenerationParameters>(|params| *params = next);

    let now = *ctx.state::<Time>().as_ref();
    let quiet = ctx.state::<GeneratorConfig>().debounce();
    ctx.update::<RenderSchedule>(|schedule| {
        schedule.invalidate();
        if renderable {
            schedule.arm(now, quiet);
        } else {
            schedule.disarm();
        }
    });

    if !renderable && ctx.cancel::<RenderCommand>() {
        log::debug!(target: "qrstudio::render", "text cleared, running render cancelled");
    }
    if logo_changed {
        refresh_logo_preview(ctx);
    }

    ctx.run_all_dirty();
    true
}

fn refresh_logo_preview(ctx: &mut StateCtx) {
    let generation = ctx.state::<RenderSchedule>().generation();
    let Some(logo) = ctx.state::<GenerationParameters>().logo.clone() else {
        ctx.cancel::<LogoPreviewCommand>();
        ctx.updater().set(LogoPreview::cleared(generation));
        return;
    };

    if let Err(err) = ctx.dispatch::<LogoPreviewCommand>() {
        log::warn!(target: "qrstudio::render", "could not decode logo preview: {err}");
        ctx.updater().set(LogoPreview::failed(generation, logo, err));
    }
}

/// Per-frame step: apply render results, then dispatch a due render.
///
/// Returns the render dispatched this frame, if any.
pub fn tick(ctx: &mut StateCtx) -> Option<TaskId> {
    ctx.sync_computes();

    let now = *ctx.state::<Time>().as_ref();
    let due = if ctx.state::<RenderSchedule>().is_due(now) {
        ctx.state_mut::<RenderSchedule>().take_due(now)
    } else {
        None
    };

    let mut dispatched = None;
    if let Some(pending) = due {
        match ctx.dispatch::<RenderCommand>() {
            Ok(_) => {
                log::debug!(
                    target: "qrstudio::render",
                    "debounce elapsed, dispatched generation {}",
                    pending.task.generation()
                );
                dispatched = Some(pending.task);
            }
            Err(err) => {
                log::error!(target: "qrstudio::render", "could not dispatch render: {err}");
                let err = RenderError::ResourceHandle(err.to_string());
                ctx.updater()
                    .set(RenderOutput::failed(pending.task.generation(), &err));
            }
        }
    }

    ctx.run_all_dirty();
    dispatched
}

/// How long the frame loop may sleep before the next render is due.
pub fn time_until_due(ctx: &StateCtx) -> Option<std::time::Duration> {
    let now = *ctx.state::<Time>().as_ref();
    ctx.state::<RenderSchedule>().time_until_due(now)
}

pub fn generation_status(ctx: &StateCtx) -> GenerationStatus {
    ctx.cached::<GenerationStatus>().copied().unwrap_or_default()
}

pub fn render_output(ctx: &StateCtx) -> Option<&RenderOutput> {
    ctx.cached::<RenderOutput>()
}

pub fn logo_preview(ctx: &StateCtx) -> Option<&LogoPreview> {
    ctx.cached::<LogoPreview>()
}

/// `true` while the render of the current generation was dispatched but has
/// not reported a final result yet.
pub fn is_rendering(ctx: &StateCtx) -> bool {
    let schedule = ctx.state::<RenderSchedule>();
    let generation = schedule.generation();
    if schedule.dispatched_generation() != Some(generation) {
        return false;
    }
    render_output(ctx).is_none_or(|output| {
        output.generation < generation
            || !matches!(output.phase, RenderPhase::Ready | RenderPhase::Failed)
    })
}
