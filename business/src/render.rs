//! Render pipeline: encode, then composite the logo, one cycle per dispatch.
//!
//! - `RenderCommand` runs a cycle off the frame loop from a snapshot of
//!   `GenerationParameters` and the generation stamped by `RenderSchedule`.
//! - `RenderOutput` is the compute-shaped cache the command reports into. It
//!   has no dependencies and never computes anything itself.
//!
//! Results of an older generation are dropped by `RenderOutput::assign`, and a
//! newer dispatch cancels the previous command's token, so a superseded render
//! can never overwrite a newer one.

use std::any::Any;
use std::sync::Arc;

use qrstudio_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, Updater, snapshot_clone,
};
use tokio_util::sync::CancellationToken;

use crate::encoder::{QUIET_ZONE_MODULES, SymbolInfo, encode_into};
use crate::error::RenderError;
use crate::logo::{LogoPlacement, composite_logo, decode_logo};
use crate::surface::RenderedSurface;
use crate::{GenerationParameters, GeneratorConfig, RenderSchedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPhase {
    #[default]
    Idle,
    Encoding,
    Compositing,
    Ready,
    Failed,
}

impl RenderPhase {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Encoding | Self::Compositing)
    }
}

/// Latest reported state of the render pipeline.
#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    /// Parameter generation this output belongs to.
    pub generation: u64,
    pub phase: RenderPhase,
    /// Last finished composite. Kept while a newer cycle runs, dropped when a
    /// cycle fails.
    pub surface: Option<Arc<RenderedSurface>>,
    pub symbol: Option<SymbolInfo>,
    pub error: Option<String>,
}

impl RenderOutput {
    pub fn in_progress(generation: u64, phase: RenderPhase) -> Self {
        Self {
            generation,
            phase,
            ..Default::default()
        }
    }

    pub fn ready(generation: u64, surface: RenderedSurface, symbol: SymbolInfo) -> Self {
        Self {
            generation,
            phase: RenderPhase::Ready,
            surface: Some(Arc::new(surface)),
            symbol: Some(symbol),
            error: None,
        }
    }

    pub fn failed(generation: u64, error: &RenderError) -> Self {
        Self {
            generation,
            phase: RenderPhase::Failed,
            surface: None,
            symbol: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == RenderPhase::Ready && self.surface.is_some()
    }
}

impl Compute for RenderOutput {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::new()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // written by RenderCommand only
    }

    fn assign(&mut self, incoming: Self) {
        if incoming.generation < self.generation {
            log::debug!(
                target: "qrstudio::render",
                "dropping stale render output (generation {} < {})",
                incoming.generation,
                self.generation
            );
            return;
        }
        let previous = self.surface.take();
        let keep_previous = incoming.phase.is_running() && incoming.surface.is_none();
        *self = incoming;
        if keep_previous {
            self.surface = previous;
        }
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        snapshot_clone(self)
    }
}

/// Runs one cycle: clear and encode, then decode and draw the logo if any.
///
/// `on_phase` is told about every phase the cycle enters. Cancellation is
/// honoured while waiting for the logo decode and once more before returning.
pub async fn render_cycle(
    params: &GenerationParameters,
    margin: u32,
    on_phase: impl Fn(RenderPhase),
    cancel: &CancellationToken,
) -> Result<(RenderedSurface, SymbolInfo), RenderError> {
    on_phase(RenderPhase::Encoding);
    let mut surface = RenderedSurface::new(params.output_dimension);
    let symbol = encode_into(&params.text, &params.encode_options(margin), &mut surface)?;

    if let Some(logo) = &params.logo {
        on_phase(RenderPhase::Compositing);
        let handle = logo.acquire();
        let decoded = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RenderError::Cancelled),
            decoded = decode_logo(handle) => decoded?,
        };
        let placement = LogoPlacement::new(params.output_dimension, params.logo_size_percent);
        composite_logo(&mut surface, &decoded, placement);
    }

    if cancel.is_cancelled() {
        return Err(RenderError::Cancelled);
    }
    Ok((surface, symbol))
}

/// Renders the parameter snapshot taken when it was dispatched.
#[derive(Debug, Default)]
pub struct RenderCommand;

impl Command for RenderCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let params = snap.state::<GenerationParameters>().cloned();
        let generation = snap
            .state::<RenderSchedule>()
            .and_then(RenderSchedule::dispatched_generation);
        let margin = snap
            .state::<GeneratorConfig>()
            .map_or(QUIET_ZONE_MODULES, |config| config.margin);

        Box::pin(async move {
            let (Some(params), Some(generation)) = (params, generation) else {
                log::warn!(
                    target: "qrstudio::render",
                    "render dispatched without parameters or generation"
                );
                return;
            };

            log::debug!(
                target: "qrstudio::render",
                "render generation {generation}: {} chars at {}px, logo: {}",
                params.text.chars().count(),
                params.output_dimension,
                params.has_logo()
            );

            let report = |phase| updater.set(RenderOutput::in_progress(generation, phase));
            match render_cycle(&params, margin, report, &cancel).await {
                Ok((surface, symbol)) => {
                    log::info!(
                        target: "qrstudio::render",
                        "render generation {generation} ready (version {}, {} modules)",
                        symbol.version,
                        symbol.modules
                    );
                    updater.set(RenderOutput::ready(generation, surface, symbol));
                }
                Err(RenderError::Cancelled) => {
                    log::debug!(
                        target: "qrstudio::render",
                        "render generation {generation} cancelled"
                    );
                }
                Err(err) => {
                    log::error!(
                        target: "qrstudio::render",
                        "render generation {generation} failed: {err}"
                    );
                    updater.set(RenderOutput::failed(generation, &err));
                }
            }
        })
    }
}
