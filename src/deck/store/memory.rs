use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Aggregate, Store, StoreError};

/// Process-local store. Listing is ordered by insertion time.
#[derive(Debug)]
pub struct InMemoryStore<A: Aggregate> {
    items: RwLock<HashMap<Uuid, (u64, A)>>,
    next_seq: AtomicU64,
}

impl<A: Aggregate> InMemoryStore<A> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

impl<A: Aggregate> Default for InMemoryStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> Store<A> for InMemoryStore<A> {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<A>, StoreError> {
        Ok(self.items.read().await.get(&id).map(|(_, a)| a.clone()))
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<A>, StoreError> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|(_, a)| a.short_code() == code)
            .min_by_key(|(seq, _)| *seq)
            .map(|(_, a)| a.clone()))
    }

    async fn list(&self, owner_id: Option<&str>) -> Result<Vec<A>, StoreError> {
        let items = self.items.read().await;
        let mut matching = items
            .values()
            .filter(|(_, a)| owner_id.is_none() || a.owner_id() == owner_id)
            .collect::<Vec<_>>();
        matching.sort_by_key(|(seq, _)| *seq);
        Ok(matching.into_iter().map(|(_, a)| a.clone()).collect())
    }

    async fn save(&self, aggregate: A) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        let id = aggregate.id();
        match items.get_mut(&id) {
            Some(entry) => entry.1 = aggregate,
            None => {
                let seq = self
                    .next_seq
                    .fetch_add(1, Ordering::Relaxed);
                items.insert(id, (seq, aggregate));
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.items.write().await.remove(&id).is_some())
    }
}
