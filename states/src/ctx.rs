use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, BTreeSet};

use flume::{Receiver, Sender};
use tokio_util::sync::CancellationToken;

use crate::updater::Update;
use crate::{
    Command, CommandSnapshot, Compute, ComputeDeps, Dep, Error, State, StateSyncStatus,
    TaskHandle, TaskId, Updater, runtime,
};

type SnapshotFn = fn(&dyn Any) -> Option<Box<dyn Any + Send>>;
type DepsFn = fn(&dyn Any) -> Option<ComputeDeps>;
type RunFn = fn(&dyn Any, Dep<'_>, Updater);
type AssignFn = fn(&mut dyn Any, Box<dyn Any + Send>) -> bool;

#[derive(Clone, Copy)]
struct ComputeFns {
    deps: DepsFn,
    run: RunFn,
    assign: AssignFn,
}

pub(crate) struct Entry {
    pub(crate) value: Box<dyn Any + Send>,
    name: &'static str,
    status: StateSyncStatus,
    snapshot: SnapshotFn,
    compute: Option<ComputeFns>,
}

fn snapshot_state<T: State>(value: &dyn Any) -> Option<Box<dyn Any + Send>> {
    value.downcast_ref::<T>().and_then(|state| State::snapshot(state))
}

fn snapshot_compute<T: Compute>(value: &dyn Any) -> Option<Box<dyn Any + Send>> {
    value
        .downcast_ref::<T>()
        .and_then(|compute| Compute::snapshot(compute))
}

fn deps_of<T: Compute>(value: &dyn Any) -> Option<ComputeDeps> {
    value.downcast_ref::<T>().map(Compute::deps)
}

fn run_compute<T: Compute>(value: &dyn Any, deps: Dep<'_>, updater: Updater) {
    if let Some(compute) = value.downcast_ref::<T>() {
        compute.compute(deps, updater);
    }
}

fn assign_compute<T: Compute>(slot: &mut dyn Any, incoming: Box<dyn Any + Send>) -> bool {
    match (slot.downcast_mut::<T>(), incoming.downcast::<T>()) {
        (Some(slot), Ok(incoming)) => {
            slot.assign(*incoming);
            true
        }
        _ => false,
    }
}

/// Owner of every state, compute and command of the application.
///
/// The frame loop is the only writer. A typical frame:
///
/// 1. `sync_computes()` applies results published by computes and commands,
/// 2. widgets read through `state()` / `cached()` and write through `update()`,
/// 3. `run_all_dirty()` re-derives the computes whose inputs changed.
///
/// Commands are spawned explicitly with [`StateCtx::dispatch`].
pub struct StateCtx {
    entries: BTreeMap<TypeId, Entry>,
    compute_order: Vec<TypeId>,
    commands: BTreeMap<TypeId, Box<dyn Command>>,
    tasks: BTreeMap<TypeId, TaskHandle>,
    next_generation: u64,
    send: Sender<Update>,
    recv: Receiver<Update>,
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.entries.values().map(|entry| entry.name).collect();
        f.debug_struct("StateCtx")
            .field("entries", &names)
            .field("commands", &self.commands.len())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            entries: BTreeMap::new(),
            compute_order: Vec::new(),
            commands: BTreeMap::new(),
            tasks: BTreeMap::new(),
            next_generation: 0,
            send,
            recv,
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        let entry = Entry {
            value: Box::new(state),
            name: type_name::<T>(),
            status: StateSyncStatus::BeforeInit,
            snapshot: snapshot_state::<T>,
            compute: None,
        };
        if self.entries.insert(TypeId::of::<T>(), entry).is_some() {
            log::warn!(
                target: "qrstudio::states",
                "state {} registered twice, replacing",
                type_name::<T>()
            );
        }
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        let entry = Entry {
            value: Box::new(compute),
            name: type_name::<T>(),
            status: StateSyncStatus::BeforeInit,
            snapshot: snapshot_compute::<T>,
            compute: Some(ComputeFns {
                deps: deps_of::<T>,
                run: run_compute::<T>,
                assign: assign_compute::<T>,
            }),
        };
        self.entries.insert(id, entry);
        if !self.compute_order.contains(&id) {
            self.compute_order.push(id);
        }
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(TypeId::of::<T>(), Box::new(command));
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found::<T>("StateCtx::try_state"))
    }

    /// # Panics
    ///
    /// Panics if `T` was never registered with [`StateCtx::add_state`].
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutable access; marks the state dirty.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered with [`StateCtx::add_state`].
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let entry = self
            .entries
            .get_mut(&TypeId::of::<T>())
            .unwrap_or_else(|| panic!("state {} is not registered", type_name::<T>()));
        entry.status = StateSyncStatus::Dirty;
        entry
            .value
            .downcast_mut::<T>()
            .unwrap_or_else(|| panic!("state {} has a foreign value", type_name::<T>()))
    }

    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    #[cfg(test)]
    pub(crate) fn sync_status<T: Any>(&self) -> Option<StateSyncStatus> {
        self.entries
            .get(&TypeId::of::<T>())
            .map(|entry| entry.status)
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    /// Applies every value published through an [`Updater`]. Returns the
    /// number of computes assigned.
    pub fn sync_computes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(Update { id, value }) = self.recv.try_recv() {
            let Some(entry) = self.entries.get_mut(&id) else {
                log::warn!(target: "qrstudio::states", "update for unregistered compute");
                continue;
            };
            let Some(assign) = entry.compute.map(|fns| fns.assign) else {
                log::warn!(
                    target: "qrstudio::states",
                    "update for {} which is not a compute",
                    entry.name
                );
                continue;
            };
            if assign(&mut *entry.value, value) {
                entry.status = StateSyncStatus::Dirty;
                applied += 1;
            }
        }
        applied
    }

    /// Runs every compute whose dependencies changed, applying results as it
    /// goes until the graph settles.
    pub fn run_all_dirty(&mut self) {
        let updater = self.updater();
        for _ in 0..self.compute_order.len() + 2 {
            let dirty: BTreeSet<TypeId> = self
                .entries
                .iter()
                .filter(|(_, entry)| entry.status.needs_run())
                .map(|(id, _)| *id)
                .collect();
            if dirty.is_empty() {
                return;
            }

            let to_run: Vec<TypeId> = self
                .compute_order
                .iter()
                .filter(|id| {
                    self.entries.get(id).is_some_and(|entry| {
                        entry.status == StateSyncStatus::BeforeInit
                            || entry
                                .compute
                                .and_then(|fns| (fns.deps)(&*entry.value))
                                .is_some_and(|deps| dirty.iter().any(|d| deps.contains(d)))
                    })
                })
                .copied()
                .collect();

            for id in &dirty {
                if let Some(entry) = self.entries.get_mut(id) {
                    entry.status = StateSyncStatus::Clean;
                }
            }

            for id in &to_run {
                let Some(entry) = self.entries.get(id) else {
                    continue;
                };
                if let Some(fns) = entry.compute {
                    (fns.run)(&*entry.value, Dep::new(&self.entries), updater.clone());
                }
            }

            self.sync_computes();
        }
        log::warn!(
            target: "qrstudio::states",
            "computes did not settle, dependency cycle?"
        );
    }

    /// Spawns `T` right away with a fresh snapshot, cancelling the previous
    /// run of `T` if it is still going.
    ///
    /// Fails when `T` is not registered or no executor is available. In the
    /// latter case no task of `T` is tracked afterwards.
    pub fn dispatch<T: Command>(&mut self) -> Result<TaskId, Error> {
        let id = TypeId::of::<T>();
        let Some(command) = self.commands.get(&id) else {
            return Err(Error::command_not_found::<T>());
        };

        let token = CancellationToken::new();
        let future = command.run(self.snapshot(), self.updater(), token.clone());
        self.next_generation += 1;
        let task_id = TaskId::new(id, self.next_generation);

        if let Some(previous) = self.tasks.insert(id, TaskHandle::new(task_id, token)) {
            log::debug!(
                target: "qrstudio::states",
                "cancelling superseded task generation {}",
                previous.id().generation()
            );
            previous.cancel();
        }

        if runtime::spawn(future) {
            Ok(task_id)
        } else {
            self.tasks.remove(&id);
            Err(Error::SpawnFailed {
                name: type_name::<T>(),
            })
        }
    }

    /// Requests cancellation of the running `T`, if any.
    pub fn cancel<T: Command>(&mut self) -> bool {
        match self.tasks.remove(&TypeId::of::<T>()) {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn task<T: Command>(&self) -> Option<&TaskHandle> {
        self.tasks.get(&TypeId::of::<T>())
    }

    pub fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        for (id, entry) in &self.entries {
            if let Some(value) = (entry.snapshot)(&*entry.value) {
                snap.insert(*id, value);
            }
        }
        snap
    }
}
