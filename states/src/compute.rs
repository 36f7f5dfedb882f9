use std::any::{Any, TypeId};

use crate::{Dep, State, Updater};

/// The states and computes a [`Compute`] reads.
///
/// A compute re-runs whenever one of its dependencies was marked dirty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputeDeps {
    states: Vec<TypeId>,
    computes: Vec<TypeId>,
}

impl ComputeDeps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state<T: State>(mut self) -> Self {
        self.states.push(TypeId::of::<T>());
        self
    }

    pub fn compute<T: Compute>(mut self) -> Self {
        self.computes.push(TypeId::of::<T>());
        self
    }

    pub fn contains(&self, id: &TypeId) -> bool {
        self.states.contains(id) || self.computes.contains(id)
    }
}

/// A derived value cached inside a [`StateCtx`](crate::StateCtx).
///
/// `compute` never mutates the context directly: it publishes its result with
/// [`Updater::set`]. A compute with no dependencies and a no-op `compute` is a
/// pure cache that only commands write to.
pub trait Compute: Any + Send {
    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater);

    /// Applies a value published through [`Updater::set`].
    ///
    /// Override to reject out-of-order results.
    fn assign(&mut self, incoming: Self)
    where
        Self: Sized,
    {
        *self = incoming;
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }
}
