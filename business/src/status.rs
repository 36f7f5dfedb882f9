use std::any::Any;

use qrstudio_states::{Compute, ComputeDeps, Dep, Updater, snapshot_clone};

use crate::RenderSchedule;
use crate::render::{RenderOutput, RenderPhase};

/// Whether the current parameters have a finished render.
///
/// Only `ready` gates the export. It is true when the latest render output
/// belongs to the newest parameter generation, nothing is waiting on the
/// debounce, and the cycle ended in [`RenderPhase::Ready`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStatus {
    pub ready: bool,
    /// Phase of the current generation; `Idle` while the output is stale.
    pub phase: RenderPhase,
}

impl GenerationStatus {
    pub fn from_parts(schedule: &RenderSchedule, output: &RenderOutput) -> Self {
        let current = output.generation == schedule.generation() && schedule.pending().is_none();
        if !current {
            return Self::default();
        }
        Self {
            ready: output.is_ready(),
            phase: output.phase,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.phase == RenderPhase::Failed
    }
}

impl Compute for GenerationStatus {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::new()
            .state::<RenderSchedule>()
            .compute::<RenderOutput>()
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let schedule = deps.get_state_ref::<RenderSchedule>();
        let output = deps.get_compute_ref::<RenderOutput>();
        let next = Self::from_parts(schedule, output);
        if next != *self {
            log::trace!(target: "qrstudio::render", "generation status {self:?} -> {next:?}");
            updater.set(next);
        }
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        snapshot_clone(self)
    }
}
