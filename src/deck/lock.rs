use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

type Entries = HashMap<Uuid, Arc<AsyncMutex<()>>>;

/// One mutex per aggregate id, held for a whole read-modify-write cycle so
/// two writers of the same presentation or poll cannot overwrite each other.
///
/// An entry only lives while someone holds or waits for it. The last
/// [`AggregateGuard`] to drop removes it, so ids that never resolve to an
/// aggregate leave nothing behind.
#[derive(Debug, Default)]
pub struct AggregateLocks {
    locks: Mutex<Entries>,
}

/// Exclusive access to one aggregate id.
#[derive(Debug)]
pub struct AggregateGuard<'a> {
    id: Uuid,
    owner: &'a AggregateLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl AggregateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    // Never held across an await.
    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn acquire(&self, id: Uuid) -> AggregateGuard<'_> {
        let lock = Arc::clone(
            self.entries()
                .entry(id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        );
        AggregateGuard {
            id,
            owner: self,
            guard: Some(lock.lock_owned().await),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Drop for AggregateGuard<'_> {
    fn drop(&mut self) {
        // Release first so a waiter can take over before the count is checked.
        drop(self.guard.take());

        let mut entries = self.owner.entries();
        // Only the map's own handle left: nobody holds or waits for this id.
        let idle = entries
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            entries.remove(&self.id);
        }
    }
}
