use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::error::StoreError;
use crate::store::KeyValueStore;
use super::types::{Assignment, PreviousAssignment, ShiftCategory};

/// Last accepted assignment per shift category, kept in a key-value store.
///
/// Each category has its own lock; holding a `CategoryRecord` serialises
/// read-check-write cycles on that category only.
pub struct AssignmentMemory {
    store: Arc<dyn KeyValueStore>,
    locks: [Mutex<()>; 3],
}

/// Exclusive handle on one category's record
pub struct CategoryRecord<'a> {
    store: &'a dyn KeyValueStore,
    category: ShiftCategory,
    _guard: MutexGuard<'a, ()>,
}

impl AssignmentMemory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            locks: [Mutex::new(()), Mutex::new(()), Mutex::new(())],
        }
    }

    pub fn lock(&self, category: ShiftCategory) -> Result<CategoryRecord<'_>, StoreError> {
        let guard = self.locks[category.index()]
            .lock()
            .map_err(|_| StoreError::Poisoned)?;
        Ok(CategoryRecord {
            store: self.store.as_ref(),
            category,
            _guard: guard,
        })
    }

    /// Snapshot of a category's record, empty when none exists yet
    pub fn previous(&self, category: ShiftCategory) -> Result<PreviousAssignment, StoreError> {
        self.lock(category)?.previous()
    }

    /// Removes all three category records together
    pub fn clear_all(&self) -> Result<(), StoreError> {
        let _guards = ShiftCategory::ALL
            .iter()
            .map(|c| self.locks[c.index()].lock().map_err(|_| StoreError::Poisoned))
            .collect::<Result<Vec<_>, _>>()?;

        for category in ShiftCategory::ALL {
            self.store.remove(category.storage_key())?;
        }
        info!("cleared previous assignments for all shift categories");
        Ok(())
    }
}

impl CategoryRecord<'_> {
    pub fn previous(&self) -> Result<PreviousAssignment, StoreError> {
        match self.store.get(self.category.storage_key())? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(PreviousAssignment::new()),
        }
    }

    /// Overwrites the record with `assignment`
    pub fn replace(&self, assignment: &Assignment) -> Result<(), StoreError> {
        self.write(&assignment.to_record())
    }

    /// Puts back a record read earlier with `previous`
    pub fn write(&self, record: &PreviousAssignment) -> Result<(), StoreError> {
        let blob = serde_json::to_string(record)?;
        self.store.set(self.category.storage_key(), &blob)
    }
}
