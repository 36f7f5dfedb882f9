use std::any::Any;

use chrono::{DateTime, Utc};
use qrstudio_states::{State, TaskId, snapshot_clone};

use crate::render::RenderCommand;

/// A render armed by the debounce, waiting for its quiet period to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRender {
    pub task: TaskId,
    pub due_at: DateTime<Utc>,
}

/// Trailing-edge debounce for renders.
///
/// `generation` counts parameter changes. Arming stamps the pending render
/// with the current generation and replaces whatever was pending before, so
/// a burst of edits ends in a single render of the last snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSchedule {
    generation: u64,
    pending: Option<PendingRender>,
    dispatched: Option<u64>,
    renders_dispatched: u64,
}

impl RenderSchedule {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks the current parameters as changed; results of older generations
    /// are stale from now on.
    pub fn invalidate(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn arm(&mut self, now: DateTime<Utc>, quiet: chrono::Duration) -> TaskId {
        let task = TaskId::of::<RenderCommand>(self.generation);
        let replaced = self.pending.replace(PendingRender {
            task,
            due_at: now + quiet,
        });
        if let Some(replaced) = replaced {
            log::trace!(
                target: "qrstudio::render",
                "debounce re-armed, generation {} superseded by {}",
                replaced.task.generation(),
                self.generation
            );
        }
        task
    }

    pub fn disarm(&mut self) -> Option<PendingRender> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&PendingRender> {
        self.pending.as_ref()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.pending.is_some_and(|pending| now >= pending.due_at)
    }

    /// Takes the pending render once its deadline passed and records it as
    /// the one being dispatched.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Option<PendingRender> {
        if !self.is_due(now) {
            return None;
        }
        let pending = self.pending.take()?;
        self.dispatched = Some(pending.task.generation());
        self.renders_dispatched += 1;
        Some(pending)
    }

    /// `Duration::ZERO` when already due, `None` when nothing is pending.
    pub fn time_until_due(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        self.pending
            .map(|pending| (pending.due_at - now).to_std().unwrap_or_default())
    }

    /// Generation of the render handed to the last [`RenderCommand`].
    pub fn dispatched_generation(&self) -> Option<u64> {
        self.dispatched
    }

    pub fn dispatch_count(&self) -> u64 {
        self.renders_dispatched
    }
}

impl State for RenderSchedule {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        snapshot_clone(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone as _};

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn fires_only_after_quiet_period() {
        let mut schedule = RenderSchedule::default();
        schedule.invalidate();
        schedule.arm(t0(), Duration::milliseconds(100));

        assert!(!schedule.is_due(t0() + Duration::milliseconds(99)));
        assert_eq!(schedule.take_due(t0() + Duration::milliseconds(99)), None);

        let fired = schedule
            .take_due(t0() + Duration::milliseconds(100))
            .expect("due");
        assert_eq!(fired.task.generation(), 1);
        assert_eq!(schedule.dispatched_generation(), Some(1));
        assert!(schedule.pending().is_none());
        assert_eq!(schedule.dispatch_count(), 1);
    }

    #[test]
    fn rearming_replaces_the_pending_render() {
        let mut schedule = RenderSchedule::default();
        let quiet = Duration::milliseconds(100);
        for i in 0..5 {
            schedule.invalidate();
            schedule.arm(t0() + Duration::milliseconds(i * 30), quiet);
        }

        let pending = *schedule.pending().expect("armed");
        assert_eq!(pending.task.generation(), 5);
        assert_eq!(pending.due_at, t0() + Duration::milliseconds(220));

        assert_eq!(schedule.take_due(t0() + Duration::milliseconds(200)), None);
        assert!(schedule.take_due(t0() + Duration::milliseconds(220)).is_some());
        assert_eq!(schedule.dispatch_count(), 1);
    }

    #[test]
    fn disarm_cancels_outright() {
        let mut schedule = RenderSchedule::default();
        schedule.invalidate();
        schedule.arm(t0(), Duration::milliseconds(100));

        assert!(schedule.disarm().is_some());
        assert_eq!(schedule.take_due(t0() + Duration::seconds(10)), None);
        assert_eq!(schedule.dispatch_count(), 0);
        assert_eq!(schedule.dispatched_generation(), None);
    }

    #[test]
    fn time_until_due_saturates() {
        let mut schedule = RenderSchedule::default();
        assert_eq!(schedule.time_until_due(t0()), None);

        schedule.arm(t0(), Duration::milliseconds(100));
        assert_eq!(
            schedule.time_until_due(t0() + Duration::milliseconds(40)),
            Some(std::time::Duration::from_millis(60))
        );
        assert_eq!(
            schedule.time_until_due(t0() + Duration::seconds(1)),
            Some(std::time::Duration::ZERO)
        );
    }
}
