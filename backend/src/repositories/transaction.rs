//! Transaction helpers for multi-statement writes.

use crate::error::AppError;
use sqlx::postgres::PgTransaction;
use sqlx::PgPool;

/// Begin a new database transaction. Dropping the handle without calling
/// [`commit_transaction`] rolls it back.
pub async fn begin_transaction(db: &PgPool) -> Result<PgTransaction<'_>, AppError> {
    db.begin()
        .await
        .map_err(|e| AppError::InternalServerError(e.into()))
}

pub async fn commit_transaction(tx: PgTransaction<'_>) -> Result<(), AppError> {
    tx.commit()
        .await
        .map_err(|e| AppError::InternalServerError(e.into()))
}
