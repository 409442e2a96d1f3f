//! Error types shared by the sqlx-backed storage implementations.

use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`SqlDaoError`] failures.
pub type SqlResult<T> = Result<T, SqlDaoError>;

/// Failures that can occur while talking to a relational backend.
#[derive(Debug, Error)]
pub enum SqlDaoError {
    /// The connection URL could not be parsed into connect options.
    #[error("invalid database url")]
    InvalidUrl {
        /// Parse failure reported by sqlx.
        #[source]
        source: sqlx::Error,
    },
    /// The pool could not open its first connection.
    #[error("failed to create connection pool")]
    Connect {
        /// Connection failure reported by sqlx.
        #[source]
        source: sqlx::Error,
    },
    /// A `CREATE ... IF NOT EXISTS` statement failed during startup.
    #[error("failed to ensure {object} `{name}`")]
    EnsureSchema {
        /// Kind of schema object, `table` or `index`.
        object: &'static str,
        /// Name of the schema object.
        name: &'static str,
        /// Statement failure.
        #[source]
        source: sqlx::Error,
    },
    /// The upsert statement failed.
    #[error("failed to save game `{title}`")]
    SaveGame {
        /// Title being saved.
        title: String,
        /// Statement failure.
        #[source]
        source: sqlx::Error,
    },
    /// The delete statement failed.
    #[error("failed to delete game `{title}`")]
    DeleteGame {
        /// Title being deleted.
        title: String,
        /// Statement failure.
        #[source]
        source: sqlx::Error,
    },
    /// The score lookup failed.
    #[error("failed to get score of game `{title}`")]
    GetScore {
        /// Title being looked up.
        title: String,
        /// Statement failure.
        #[source]
        source: sqlx::Error,
    },
    /// `SELECT 1` did not round-trip.
    #[error("database ping failed")]
    HealthPing {
        /// Statement failure.
        #[source]
        source: sqlx::Error,
    },
    /// The statement ran but matched no row.
    #[error("game `{title}` not found")]
    NotFound {
        /// Title that matched nothing.
        title: String,
    },
}

impl SqlDaoError {
    fn source_error(&self) -> Option<&sqlx::Error> {
        match self {
            SqlDaoError::InvalidUrl { source }
            | SqlDaoError::Connect { source }
            | SqlDaoError::EnsureSchema { source, .. }
            | SqlDaoError::SaveGame { source, .. }
            | SqlDaoError::DeleteGame { source, .. }
            | SqlDaoError::GetScore { source, .. }
            | SqlDaoError::HealthPing { source } => Some(source),
            SqlDaoError::NotFound { .. } => None,
        }
    }

    fn is_unique_violation(&self) -> bool {
        matches!(
            self.source_error(),
            Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation()
        )
    }

    fn title(&self) -> Option<&str> {
        match self {
            SqlDaoError::SaveGame { title, .. }
            | SqlDaoError::DeleteGame { title, .. }
            | SqlDaoError::GetScore { title, .. }
            | SqlDaoError::NotFound { title } => Some(title),
            _ => None,
        }
    }
}

impl From<SqlDaoError> for StorageError {
    fn from(err: SqlDaoError) -> Self {
        if let SqlDaoError::NotFound { title } = err {
            return StorageError::NotFound { title };
        }
        if err.is_unique_violation() {
            let title = err.title().unwrap_or_default().to_owned();
            return StorageError::AlreadyExists { title };
        }
        StorageError::unavailable(err.to_string(), err)
    }
}
