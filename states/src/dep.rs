use std::any::{TypeId, type_name};
use std::collections::BTreeMap;

use crate::ctx::Entry;
use crate::{Compute, State};

/// Read-only view over the context handed to [`Compute::compute`].
pub struct Dep<'a> {
    entries: &'a BTreeMap<TypeId, Entry>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(entries: &'a BTreeMap<TypeId, Entry>) -> Self {
        Self { entries }
    }

    pub fn try_state_ref<T: State>(&self) -> Option<&'a T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    pub fn try_compute_ref<T: Compute>(&self) -> Option<&'a T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    /// # Panics
    ///
    /// Panics if `T` was never registered. Computes only read what they
    /// declare in [`Compute::deps`], which is registered before them.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.try_state_ref::<T>()
            .unwrap_or_else(|| panic!("state {} is not registered", type_name::<T>()))
    }

    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn get_compute_ref<T: Compute>(&self) -> &'a T {
        self.try_compute_ref::<T>()
            .unwrap_or_else(|| panic!("compute {} is not registered", type_name::<T>()))
    }
}
