use std::any::{Any, TypeId, type_name};

use flume::Sender;

use crate::Compute;

pub(crate) struct Update {
    pub(crate) id: TypeId,
    pub(crate) value: Box<dyn Any + Send>,
}

/// Write handle for computes and commands.
///
/// Values sent through an `Updater` are applied on the UI thread by
/// [`StateCtx::sync_computes`](crate::StateCtx::sync_computes).
#[derive(Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl std::fmt::Debug for Updater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("pending", &self.send.len())
            .finish()
    }
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>) -> Self {
        Self { send }
    }

    pub fn set<T: Compute>(&self, value: T) {
        let update = Update {
            id: TypeId::of::<T>(),
            value: Box::new(value),
        };
        if self.send.send(update).is_err() {
            log::debug!(
                target: "qrstudio::states",
                "context dropped, discarding update for {}",
                type_name::<T>()
            );
        }
    }
}
