//! Generic record persistence.
//!
//! Every resource (users, posts, comments, likes) is a [`Record`] and gets the
//! same fetch/create/update/delete capability through [`Repository`].
//! Entity-specific lookups live in extension traits next to each resource.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, FromRow};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::{PgQueryAs, PgRepository};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

/// A row type the generic repositories know how to persist.
pub trait Record: for<'r> FromRow<'r, PgRow> + Clone + Send + Sync + Unpin + 'static {
    /// Human readable name used in error messages.
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Column list, primary key first.
    const COLUMNS: &'static [&'static str];
    const ORDER_BY: &'static str = "created_at DESC";

    fn id(&self) -> Uuid;

    /// The user allowed to modify this record.
    fn owner_id(&self) -> Uuid;

    fn created_at(&self) -> OffsetDateTime;

    /// Binds every column, in `COLUMNS` order.
    fn bind_columns<'q>(&self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self>;

    /// Natural keys that must stay unique across the table, as (constraint, value).
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Records whose mutable fields can be updated from a partial patch.
pub trait Patchable: Record {
    type Patch: Send + 'static;

    /// Returns `self` with every set field of `patch` applied; unset fields keep
    /// their existing value.
    fn apply_patch(self, patch: Self::Patch, now: OffsetDateTime) -> Self;
}

/// Edit applied to the current row inside [`Repository::update`].
pub type Change<E> = Box<dyn FnOnce(E) -> E + Send>;

#[async_trait]
pub trait Repository<E: Record>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<E>, StoreError>;
    async fn fetch(&self, id: Uuid) -> Result<Option<E>, StoreError>;
    async fn create(&self, record: E) -> Result<E, StoreError>;
    /// Reads the row under a lock, applies `change` and writes it back.
    async fn update(&self, id: Uuid, change: Change<E>) -> Result<E, StoreError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Failure of a resource operation, independent of the delivery surface.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("validation failed")]
    Validation(crate::api::validation::FieldErrors),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub async fn fetch_required<E, R>(repo: &R, id: Uuid) -> Result<E, ResourceError>
where
    E: Record,
    R: Repository<E> + ?Sized,
{
    repo.fetch(id).await?.ok_or(ResourceError::NotFound(E::NAME))
}

/// Loads a record and checks that `actor` owns it.
pub async fn fetch_owned<E, R>(repo: &R, id: Uuid, actor: Uuid) -> Result<E, ResourceError>
where
    E: Record,
    R: Repository<E> + ?Sized,
{
    let record = fetch_required(repo, id).await?;
    if record.owner_id() != actor {
        return Err(ResourceError::Forbidden("you do not own this resource"));
    }
    Ok(record)
}

pub async fn update_owned<E, R>(
    repo: &R,
    id: Uuid,
    actor: Uuid,
    patch: E::Patch,
) -> Result<E, ResourceError>
where
    E: Patchable,
    R: Repository<E> + ?Sized,
{
    // Ownership never changes after creation, so checking it up front is safe.
    fetch_owned::<E, R>(repo, id, actor).await?;
    let now = OffsetDateTime::now_utc();
    match repo
        .update(id, Box::new(move |current: E| current.apply_patch(patch, now)))
        .await
    {
        Ok(record) => Ok(record),
        Err(StoreError::NotFound) => Err(ResourceError::NotFound(E::NAME)),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_owned<E, R>(repo: &R, id: Uuid, actor: Uuid) -> Result<(), ResourceError>
where
    E: Record,
    R: Repository<E> + ?Sized,
{
    fetch_owned::<E, R>(repo, id, actor).await?;
    if !repo.delete(id).await? {
        return Err(ResourceError::NotFound(E::NAME));
    }
    Ok(())
}
