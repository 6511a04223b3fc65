//! Transaction scoped to one write request.

use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool};
use sqlx::Transaction;

/// Nothing is durable until [`UnitOfWork::commit`]; dropping it on any other
/// path (an early `?`, a missing row) rolls the transaction back.
///
/// Handlers begin one only after the request has been validated, so rejected
/// requests never hold a pool connection.
pub struct UnitOfWork(Transaction<'static, Sqlite>);

impl UnitOfWork {
    pub async fn begin(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        Ok(Self(pool.begin().await?))
    }

    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.0
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.0.commit().await
    }
}
