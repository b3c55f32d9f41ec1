//! In-memory roster persistence.
//!
//! Used for `--ephemeral` runs and in tests.  Clones share the same buffer,
//! so a test can keep one handle and inspect what the store committed.

use std::cell::RefCell;
use std::rc::Rc;

use lineup_core::{PersistError, RosterPersistence};

/// Shared in-memory snapshot buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Rc<RefCell<Option<String>>>,
    writes: Rc<RefCell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        let store = Self::default();
        *store.snapshot.borrow_mut() = Some(snapshot.into());
        store
    }

    /// The last committed snapshot.
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.borrow().clone()
    }

    /// Number of commits received.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl RosterPersistence for MemoryStore {
    fn read(&self) -> Result<Option<String>, PersistError> {
        Ok(self.snapshot())
    }

    fn write(&mut self, snapshot: &str) -> Result<(), PersistError> {
        *self.snapshot.borrow_mut() = Some(snapshot.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}
