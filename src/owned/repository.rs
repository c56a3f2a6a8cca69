use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::entity::OwnedEntity;
use crate::shared::AppError;

/// Storage operations scoped to a single owning user.
///
/// Every operation filters by `owner_id`; rows of other users are indistinguishable
/// from rows that do not exist.
#[async_trait]
pub trait OwnedRepository<E: OwnedEntity>: Send + Sync {
    /// All rows owned by `owner_id`, newest first
    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<E>, AppError>;

    /// Stores a new row for `owner_id` and returns it with its assigned id
    async fn create_for_owner(&self, owner_id: i64, draft: E::Draft) -> Result<E, AppError>;

    /// Removes row `id` if `owner_id` owns it, otherwise `AppError::NotFound`
    async fn delete_for_owner(&self, owner_id: i64, id: i64) -> Result<(), AppError>;
}

fn not_found<E: OwnedEntity>() -> AppError {
    AppError::NotFound(format!("{} not found", E::LABEL))
}

struct Table<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

/// In-memory implementation of OwnedRepository for development and testing
pub struct InMemoryOwnedRepository<E> {
    table: Mutex<Table<E>>,
}

impl<E: OwnedEntity> Default for InMemoryOwnedRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: OwnedEntity> InMemoryOwnedRepository<E> {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Total number of rows across all owners
    pub fn row_count(&self) -> usize {
        self.table.lock().map(|t| t.rows.len()).unwrap_or(0)
    }

    /// Checks if a row exists by id regardless of owner
    pub fn has_row(&self, id: i64) -> bool {
        self.table
            .lock()
            .map(|t| t.rows.contains_key(&id))
            .unwrap_or(false)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table<E>>, AppError> {
        self.table
            .lock()
            .map_err(|_| AppError::Internal(format!("{} table lock poisoned", E::TABLE)))
    }
}

#[async_trait]
impl<E: OwnedEntity> OwnedRepository<E> for InMemoryOwnedRepository<E> {
    #[instrument(skip(self), fields(table = E::TABLE))]
    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<E>, AppError> {
        let table = self.lock()?;
        let mut rows: Vec<E> = table
            .rows
            .values()
            .filter(|row| row.owner_id() == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.sort_key()
                .cmp(&a.sort_key())
                .then_with(|| b.id().cmp(&a.id()))
        });

        debug!(owner_id, count = rows.len(), "Listed rows from memory");
        Ok(rows)
    }

    #[instrument(skip(self, draft), fields(table = E::TABLE))]
    async fn create_for_owner(&self, owner_id: i64, draft: E::Draft) -> Result<E, AppError> {
        let mut table = self.lock()?;
        let id = table.next_id;
        table.next_id += 1;

        let row = E::from_draft(id, owner_id, draft, Utc::now());
        table.rows.insert(id, row.clone());

        debug!(owner_id, id, "Row created in memory");
        Ok(row)
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    async fn delete_for_owner(&self, owner_id: i64, id: i64) -> Result<(), AppError> {
        let mut table = self.lock()?;
        match table.rows.get(&id) {
            Some(row) if row.owner_id() == owner_id => {
                table.rows.remove(&id);
                debug!(owner_id, id, "Row deleted from memory");
                Ok(())
            }
            _ => {
                warn!(owner_id, id, "Row not found for owner in memory");
                Err(not_found::<E>())
            }
        }
    }
}

/// PostgreSQL implementation of OwnedRepository
pub struct PostgresOwnedRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: OwnedEntity> PostgresOwnedRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: OwnedEntity> OwnedRepository<E> for PostgresOwnedRepository<E> {
    #[instrument(skip(self), fields(table = E::TABLE))]
    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<E>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = $1 ORDER BY {} DESC, id DESC",
            E::COLUMNS,
            E::TABLE,
            E::ORDER_COLUMN
        );

        let rows = sqlx::query_as::<_, E>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, owner_id, "Failed to list rows from database");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(owner_id, count = rows.len(), "Listed rows from database");
        Ok(rows)
    }

    #[instrument(skip(self, draft), fields(table = E::TABLE))]
    async fn create_for_owner(&self, owner_id: i64, draft: E::Draft) -> Result<E, AppError> {
        let row = E::insert_query(owner_id, draft, Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, owner_id, "Failed to insert row into database");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(owner_id, id = row.id(), "Row created in database");
        Ok(row)
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    async fn delete_for_owner(&self, owner_id: i64, id: i64) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", E::TABLE);

        let result = sqlx::query(&sql)
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, owner_id, id, "Failed to delete row from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(owner_id, id, "Row not found for owner in database");
            return Err(not_found::<E>());
        }

        debug!(owner_id, id, "Row deleted from database");
        Ok(())
    }
}
