use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::Postgres;
use std::fmt::Debug;
use std::sync::Arc;

use super::repository::OwnedRepository;
use crate::shared::AppState;

/// A stored row that belongs to exactly one user and is only reachable through that user.
///
/// Implemented once per table; the repositories, handlers and routes in this module are
/// generic over it.
pub trait OwnedEntity:
    for<'r> sqlx::FromRow<'r, PgRow> + Clone + Debug + Send + Sync + Unpin + 'static
{
    /// Validated request body for creating a row
    type Draft: DeserializeOwned + Debug + Send + 'static;

    /// Response schema returned to clients
    type Response: Serialize + From<Self> + Send;

    /// Human readable name used in not-found messages, e.g. "Entry"
    const LABEL: &'static str;

    /// Route path under the API prefix, e.g. "/journal"
    const PATH: &'static str;

    const TABLE: &'static str;

    /// Comma-separated column list matching the `FromRow` impl
    const COLUMNS: &'static str;

    /// Column that orders listings, newest first
    const ORDER_COLUMN: &'static str;

    fn id(&self) -> i64;

    fn owner_id(&self) -> i64;

    /// Value of `ORDER_COLUMN` for in-memory ordering
    fn sort_key(&self) -> DateTime<Utc>;

    /// Builds a row from a draft once the store has assigned its id
    fn from_draft(id: i64, owner_id: i64, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// INSERT ... RETURNING statement for a draft, bound and ready to run
    fn insert_query(
        owner_id: i64,
        draft: Self::Draft,
        now: DateTime<Utc>,
    ) -> QueryAs<'static, Postgres, Self, PgArguments>;

    /// Picks this entity's repository out of the shared state
    fn repository(state: &AppState) -> &Arc<dyn OwnedRepository<Self>>;
}
