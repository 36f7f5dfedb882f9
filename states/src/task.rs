//! Task identities and cancellation handles for dispatched commands.
//!
//! - `TaskId` pairs the `TypeId` of the command with a monotonically increasing
//!   generation, so a late result can be recognised as stale.
//! - `TaskHandle` wraps the `CancellationToken` handed to the running command.
//!   [`StateCtx`](crate::StateCtx) keeps one handle per command type and cancels
//!   it when the same command is dispatched again.
//!
//! ```ignore
//! let task_id = TaskId::of::<RenderCommand>(4);
//! let handle = TaskHandle::new(task_id, CancellationToken::new());
//!
//! // a newer dispatch supersedes it
//! handle.cancel();
//! ```

use std::any::{Any, TypeId};

use tokio_util::sync::CancellationToken;

/// Unique identifier for a scheduled or spawned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    pub fn of<T: Any>(generation: u64) -> Self {
        Self::new(TypeId::of::<T>(), generation)
    }

    /// Higher generations were scheduled more recently.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` when both ids belong to the same task type and `self` was
    /// scheduled after `other`.
    #[cfg(test)]
    pub(crate) fn supersedes(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.generation > other.generation
    }
}

/// Handle to a spawned command with cooperative cancellation.
///
/// Cancelling does not abort the task. The command observes the token at its
/// own suspension points (usually through `tokio::select!`).
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    #[cfg(test)]
    pub(crate) fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    #[cfg(test)]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
