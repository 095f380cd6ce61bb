use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgPool},
    query::QueryAs,
    Postgres,
};
use tracing::debug;
use uuid::Uuid;

use super::{Change, Record, Repository, StoreError};

pub type PgQueryAs<'q, E> = QueryAs<'q, Postgres, E, PgArguments>;

/// Postgres-backed [`Repository`] shared by every record type.
pub struct PgRepository<E> {
    pool: PgPool,
    _record: PhantomData<fn() -> E>,
}

impl<E> Clone for PgRepository<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<E> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps driver errors, turning unique violations into [`StoreError::Conflict`].
pub fn map_sqlx(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(db.constraint().unwrap_or("unique").to_string());
        }
    }
    StoreError::Database(err)
}

pub(crate) fn select_sql<E: Record>(filter: &str) -> String {
    format!(
        "SELECT {} FROM {} {} ORDER BY {}",
        E::COLUMNS.join(", "),
        E::TABLE,
        filter,
        E::ORDER_BY
    )
}

fn locked_select_sql<E: Record>() -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1 FOR UPDATE",
        E::COLUMNS.join(", "),
        E::TABLE,
        E::COLUMNS[0]
    )
}

/// `ILIKE` pattern matching `query` anywhere, with wildcards in the query
/// taken literally. Pair with `ESCAPE '\'`.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn insert_sql<E: Record>() -> String {
    let placeholders: Vec<String> = (1..=E::COLUMNS.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        E::TABLE,
        E::COLUMNS.join(", "),
        placeholders.join(", "),
        E::COLUMNS.join(", ")
    )
}

fn update_sql<E: Record>() -> String {
    let assignments: Vec<String> = E::COLUMNS
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, col)| format!("{col} = ${}", i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = $1 RETURNING {}",
        E::TABLE,
        assignments.join(", "),
        E::COLUMNS[0],
        E::COLUMNS.join(", ")
    )
}

#[async_trait]
impl<E: Record> Repository<E> for PgRepository<E> {
    async fn fetch_all(&self) -> Result<Vec<E>, StoreError> {
        let sql = select_sql::<E>("");
        sqlx::query_as::<_, E>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        let sql = select_sql::<E>(&format!("WHERE {} = $1", E::COLUMNS[0]));
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn create(&self, record: E) -> Result<E, StoreError> {
        let sql = insert_sql::<E>();
        let created = record
            .bind_columns(sqlx::query_as::<_, E>(&sql))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        debug!(table = E::TABLE, id = %created.id(), "record inserted");
        Ok(created)
    }

    async fn update(&self, id: Uuid, change: Change<E>) -> Result<E, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let sql = locked_select_sql::<E>();
        let Some(current) = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx)?
        else {
            return Err(StoreError::NotFound);
        };

        let sql = update_sql::<E>();
        let updated = change(current)
            .bind_columns(sqlx::query_as::<_, E>(&sql))
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        tx.commit().await.map_err(map_sqlx)?;
        debug!(table = E::TABLE, id = %id, "record updated");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", E::TABLE, E::COLUMNS[0]);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}
