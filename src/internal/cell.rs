//! Lazy initialization cell backing the singleton and scoped caches.
//!
//! One cell holds at most one type-erased instance. First resolution runs the
//! producer under the cell's synchronization so concurrent first-resolvers
//! never run it twice; every later resolution is a cache hit.

use crate::error::DiResult;
use crate::registration::AnyArc;

#[cfg(feature = "once-cell")]
pub(crate) struct InitCell {
    cell: once_cell::sync::OnceCell<AnyArc>,
}

#[cfg(feature = "once-cell")]
impl InitCell {
    pub(crate) fn new() -> Self {
        Self {
            cell: once_cell::sync::OnceCell::new(),
        }
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the cached instance, running `init` at most once to populate
    /// the cell. An `Err` from `init` leaves the cell empty.
    pub(crate) fn get_or_try_init<F>(&self, init: F) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        self.cell.get_or_try_init(init).cloned()
    }
}

#[cfg(not(feature = "once-cell"))]
pub(crate) struct InitCell {
    cell: std::sync::Mutex<Option<AnyArc>>,
}

#[cfg(not(feature = "once-cell"))]
impl InitCell {
    pub(crate) fn new() -> Self {
        Self {
            cell: std::sync::Mutex::new(None),
        }
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.cell.lock().unwrap().is_some()
    }

    /// Returns the cached instance, running `init` at most once to populate
    /// the cell. The lock is held across `init` so concurrent first
    /// resolutions serialize on this cell. An `Err` leaves the cell empty.
    pub(crate) fn get_or_try_init<F>(&self, init: F) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        let mut slot = self.cell.lock().unwrap();
        if let Some(existing) = slot.as_ref() {
            return Ok(existing.clone());
        }
        let value = init()?;
        *slot = Some(value.clone());
        Ok(value)
    }
}
