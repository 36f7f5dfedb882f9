use std::any::Any;

/// Plain input data owned by a [`StateCtx`](crate::StateCtx).
///
/// States are written only from the UI thread, through
/// [`StateCtx::update`](crate::StateCtx::update) or
/// [`StateCtx::state_mut`](crate::StateCtx::state_mut). Both mark the state dirty
/// so dependent computes re-run on the next
/// [`StateCtx::run_all_dirty`](crate::StateCtx::run_all_dirty).
pub trait State: Any + Send {
    /// Clone handed to commands when they are dispatched.
    ///
    /// Returning `None` keeps the state out of command snapshots.
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }
}

/// Snapshot implementation for any `Clone` state or compute.
pub fn snapshot_clone<T: Any + Send + Clone>(value: &T) -> Option<Box<dyn Any + Send>> {
    Some(Box::new(value.clone()))
}
