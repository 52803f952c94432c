use async_trait::async_trait;

use crate::args::{CreateArgs, DeleteArgs, FindUniqueArgs, UpdateArgs};
use crate::name::ModelName;

/// Record and argument shapes of one kind of collection.
///
/// A client may serve many collections with the same `ModelTypes`; the
/// collection itself is selected by [`ModelName`] at call time.
pub trait ModelTypes: Send + Sync + 'static {
    /// Stored record as returned by reads and writes.
    type Record: Send + 'static;
    /// Filter identifying at most one record.
    type WhereUnique: Send + 'static;
    /// Parameters of a multi-record read, forwarded untouched.
    type FindManyArgs: Send + 'static;
    /// Criteria of a count, forwarded untouched.
    type CountArgs: Send + 'static;
    /// Payload of an insert.
    type Create: Send + 'static;
    /// Payload of an update.
    type Update: Send + 'static;
}

/// Capability exposing the six persistence primitives for every collection
/// it knows about.
///
/// Absence on `find_unique` is `Ok(None)`. Whether `update`/`delete` of a
/// missing record is an error is part of each implementation's contract.
#[async_trait]
pub trait PersistenceClient<M: ModelTypes>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn count(&self, model: &ModelName, criteria: Option<M::CountArgs>) -> Result<u64, Self::Error>;

    async fn find_unique(
        &self,
        model: &ModelName,
        args: FindUniqueArgs<M::WhereUnique>,
    ) -> Result<Option<M::Record>, Self::Error>;

    async fn find_many(&self, model: &ModelName, args: M::FindManyArgs) -> Result<Vec<M::Record>, Self::Error>;

    async fn create(&self, model: &ModelName, args: CreateArgs<M::Create>) -> Result<M::Record, Self::Error>;

    async fn update(
        &self,
        model: &ModelName,
        args: UpdateArgs<M::WhereUnique, M::Update>,
    ) -> Result<M::Record, Self::Error>;

    async fn delete(&self, model: &ModelName, args: DeleteArgs<M::WhereUnique>) -> Result<M::Record, Self::Error>;
}

