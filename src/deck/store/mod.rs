pub mod memory;

pub use memory::InMemoryStore;

use std::{fmt::Debug, future::Future};

use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Persistence backend failure: {0}")]
    Backend(String),
}

/// A whole object persisted and replaced as one unit.
pub trait Aggregate: Clone + Send + Sync + Debug + 'static {
    fn id(&self) -> Uuid;
    fn short_code(&self) -> &str;
    fn owner_id(&self) -> Option<&str>;
}

/// Persistence collaborator. `save` overwrites the stored aggregate entirely,
/// so callers serialize their own read-modify-write cycles.
pub trait Store<A: Aggregate>: Send + Sync + 'static {
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = Result<Option<A>, StoreError>> + Send;

    fn get_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<A>, StoreError>> + Send;

    /// All aggregates, or only those owned by `owner_id` when given.
    fn list(
        &self,
        owner_id: Option<&str>,
    ) -> impl Future<Output = Result<Vec<A>, StoreError>> + Send;

    fn save(&self, aggregate: A) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Returns whether an aggregate was removed.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
