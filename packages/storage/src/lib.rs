// ABOUTME: Data layer and persistence for GiveLink
// ABOUTME: Storage errors, SQLite pool setup and embedded schema migrations

pub mod pool;

use thiserror::Error;

pub use pool::{connect, connect_in_memory, ping, MIGRATOR};

/// Storage errors shared by every store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Cannot change donation status from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Map `RowNotFound` onto a named `NotFound`, passing other errors through.
    pub fn not_found_as(resource: &'static str) -> impl Fn(sqlx::Error) -> StorageError {
        move |err| match err {
            sqlx::Error::RowNotFound => StorageError::NotFound(resource),
            other => StorageError::Sqlx(other),
        }
    }

    /// Map lock contention and foreign-key failures of a write onto `Conflict`,
    /// passing other errors through.
    pub fn conflict_on_contention(message: &'static str) -> impl Fn(sqlx::Error) -> StorageError {
        move |err| {
            let err = StorageError::Sqlx(err);
            if err.is_busy() || err.is_foreign_key_violation() {
                StorageError::Conflict(message.to_string())
            } else {
                err
            }
        }
    }

    /// True when SQLite refused the write because another connection holds or just released
    /// the write lock (SQLITE_BUSY and its extended codes).
    pub fn is_busy(&self) -> bool {
        match self {
            StorageError::Sqlx(sqlx::Error::Database(db_err)) => db_err
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(|code| code & 0xff == 5),
            _ => false,
        }
    }

    /// True when the error is a FOREIGN KEY constraint violation.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            StorageError::Sqlx(sqlx::Error::Database(db_err)) => db_err.is_foreign_key_violation(),
            _ => false,
        }
    }

    /// True when the error is a UNIQUE constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StorageError::Sqlx(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_foreign_key_failure_maps_to_conflict() {
        let pool = connect_in_memory().await.unwrap();

        let err = sqlx::query(
            "INSERT INTO requests (id, requestor_id, created_at, updated_at)
             VALUES ('req-1', 'rcv-missing', '2024-01-01', '2024-01-01')",
        )
        .execute(&pool)
        .await
        .map_err(StorageError::conflict_on_contention("Receiver is gone"))
        .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(ref msg) if msg == "Receiver is gone"));
    }

    #[tokio::test]
    async fn test_other_errors_pass_through_contention_mapping() {
        let pool = connect_in_memory().await.unwrap();

        let err = sqlx::query("SELECT * FROM no_such_table")
            .execute(&pool)
            .await
            .map_err(StorageError::conflict_on_contention("unused"))
            .unwrap_err();

        assert!(matches!(err, StorageError::Sqlx(_)));
        assert!(!err.is_busy());
        assert!(!err.is_foreign_key_violation());
    }
}
