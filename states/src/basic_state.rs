use chrono::{DateTime, Utc};

use crate::{State, snapshot_clone};

/// Virtual clock.
///
/// The UI writes the wall clock into it once per frame; tests move it by hand
/// so time-dependent behaviour stays deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    virt: DateTime<Utc>,
}

impl Time {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { virt: at }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl State for Time {
    fn snapshot(&self) -> Option<Box<dyn std::any::Any + Send>> {
        snapshot_clone(self)
    }
}

impl AsMut<DateTime<Utc>> for Time {
    fn as_mut(&mut self) -> &mut DateTime<Utc> {
        &mut self.virt
    }
}

impl AsRef<DateTime<Utc>> for Time {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.virt
    }
}
