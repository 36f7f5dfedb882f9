//! Reactive state runtime shared by the business and UI crates.
//!
//! - [`State`]: plain inputs, written only from the frame loop.
//! - [`Compute`]: derived caches, re-run when a dependency turns dirty.
//! - [`Command`]: async side effects fed with a [`CommandSnapshot`].
//! - [`StateCtx`]: owns all of the above and is the single update path.

mod basic_state;
mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod runtime;
mod state;
mod state_sync_status;
mod task;
mod updater;

pub use basic_state::Time;
pub use command::{Command, CommandFuture, CommandSnapshot};
pub use compute::{Compute, ComputeDeps};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use state::{State, snapshot_clone};
pub use state_sync_status::StateSyncStatus;
pub use task::{TaskHandle, TaskId};
pub use updater::Updater;

#[cfg(test)]
mod state_runtime_test {
    use std::any::Any;
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Counter {
        value: i32,
    }

    impl State for Counter {
        fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
            snapshot_clone(self)
        }
    }

    #[derive(Debug, Clone, Default)]
    struct Doubled {
        value: i32,
    }

    impl Compute for Doubled {
        fn deps(&self) -> ComputeDeps {
            ComputeDeps::new().state::<Counter>()
        }

        fn compute(&self, deps: Dep<'_>, updater: Updater) {
            let counter = deps.get_state_ref::<Counter>();
            updater.set(Self {
                value: counter.value * 2,
            });
        }
    }

    #[derive(Debug, Clone, Default)]
    struct Versioned {
        version: u64,
    }

    impl Compute for Versioned {
        fn deps(&self) -> ComputeDeps {
            ComputeDeps::new()
        }

        fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}

        fn assign(&mut self, incoming: Self) {
            if incoming.version >= self.version {
                *self = incoming;
            }
        }

        fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
            snapshot_clone(self)
        }
    }

    #[derive(Default)]
    struct PublishCounter;

    impl Command for PublishCounter {
        fn run(
            &self,
            snap: CommandSnapshot,
            updater: Updater,
            _cancel: CancellationToken,
        ) -> CommandFuture {
            let value = snap.state::<Counter>().map_or(0, |c| c.value);
            Box::pin(async move {
                updater.set(Versioned {
                    version: u64::try_from(value).unwrap_or_default(),
                });
            })
        }
    }

    #[derive(Default)]
    struct WaitForCancel;

    impl Command for WaitForCancel {
        fn run(
            &self,
            _snap: CommandSnapshot,
            _updater: Updater,
            cancel: CancellationToken,
        ) -> CommandFuture {
            Box::pin(async move { cancel.cancelled().await })
        }
    }

    #[test]
    fn computes_follow_state_updates() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 3 });
        ctx.record_compute(Doubled::default());

        ctx.run_all_dirty();
        assert_eq!(ctx.cached::<Doubled>().map(|d| d.value), Some(6));

        ctx.update::<Counter>(|c| c.value = 10);
        assert_eq!(ctx.sync_status::<Counter>(), Some(StateSyncStatus::Dirty));

        ctx.run_all_dirty();
        assert_eq!(ctx.cached::<Doubled>().map(|d| d.value), Some(20));
        assert_eq!(ctx.sync_status::<Counter>(), Some(StateSyncStatus::Clean));
    }

    #[test]
    fn assign_can_reject_out_of_order_values() {
        let mut ctx = StateCtx::new();
        ctx.record_compute(Versioned::default());
        let updater = ctx.updater();

        updater.set(Versioned { version: 5 });
        updater.set(Versioned { version: 2 });
        ctx.sync_computes();

        assert_eq!(ctx.cached::<Versioned>().map(|v| v.version), Some(5));
    }

    #[test]
    fn missing_state_is_an_error() {
        let ctx = StateCtx::new();
        let err = ctx.try_state::<Counter>().unwrap_err();
        assert!(err.to_string().contains("Counter"), "{err}");
    }

    #[test]
    fn dispatching_unknown_command_fails() {
        let mut ctx = StateCtx::new();
        assert!(ctx.dispatch::<PublishCounter>().is_err());
    }

    #[test]
    fn dispatch_without_executor_tracks_no_task() {
        let mut ctx = StateCtx::new();
        ctx.record_command(WaitForCancel);

        let err = ctx.dispatch::<WaitForCancel>().unwrap_err();

        assert!(matches!(err, Error::SpawnFailed { .. }), "{err}");
        assert!(ctx.task::<WaitForCancel>().is_none());
        assert!(!ctx.cancel::<WaitForCancel>());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn command_results_arrive_through_sync() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter { value: 7 });
        ctx.record_compute(Versioned::default());
        ctx.record_command(PublishCounter);

        let task = ctx.dispatch::<PublishCounter>().expect("command is registered");
        assert_eq!(task.generation(), 1);

        for _ in 0..100 {
            ctx.sync_computes();
            if ctx.cached::<Versioned>().map(|v| v.version) == Some(7) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("command result never arrived");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn redispatch_cancels_previous_run() {
        let mut ctx = StateCtx::new();
        ctx.record_command(WaitForCancel);

        let first = ctx.dispatch::<WaitForCancel>().expect("registered");
        let first_token = ctx
            .task::<WaitForCancel>()
            .expect("task tracked")
            .cancellation_token();

        let second = ctx.dispatch::<WaitForCancel>().expect("registered");

        assert!(second.supersedes(&first));
        assert!(first_token.is_cancelled());
        assert!(ctx.cancel::<WaitForCancel>());
        assert!(!ctx.cancel::<WaitForCancel>());
    }
}
