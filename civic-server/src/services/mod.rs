//! Workflows behind the API
//!
//! Handlers authenticate and gate on the role matrix; everything past that
//! (payload validation, ownership, department rules, multi-table writes)
//! lives here.

pub mod accounts;
pub mod posts;
pub mod tasks;
pub mod workers;

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::db::repository::RepoError;
use crate::utils::AppResult;

pub(crate) async fn acquire(pool: &SqlitePool) -> AppResult<PoolConnection<Sqlite>> {
    Ok(pool.acquire().await.map_err(RepoError::from)?)
}

/// Start a write transaction
///
/// `BEGIN IMMEDIATE` takes the write lock up front; concurrent writers
/// queue on the busy timeout.
pub(crate) async fn begin(pool: &SqlitePool) -> AppResult<Transaction<'static, Sqlite>> {
    Ok(pool
        .begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(RepoError::from)?)
}

pub(crate) async fn commit(tx: Transaction<'static, Sqlite>) -> AppResult<()> {
    Ok(tx.commit().await.map_err(RepoError::from)?)
}
