mod error;
/// PostgreSQL backend.
#[cfg(feature = "postgres-store")]
pub mod postgres;
/// SQLite backend.
#[cfg(feature = "sqlite-store")]
pub mod sqlite;
#[cfg(test)]
pub(crate) mod stub;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::dao::storage::{StorageError, StorageResult};

pub use error::SqlDaoError;

/// Upserts a game keyed on its title and yields the row id.
pub trait GameSaver: Send + Sync {
    /// Insert `title` with `score`, or overwrite the score if the title exists.
    fn save_game(&self, title: String, score: i64) -> BoxFuture<'static, StorageResult<i64>>;
}

/// Removes a game by title and yields the id it had.
pub trait GameDeleter: Send + Sync {
    /// Delete `title`; [`StorageError::NotFound`] when no row matches.
    fn delete_game(&self, title: String) -> BoxFuture<'static, StorageResult<i64>>;
}

/// Looks up the score stored for a title.
pub trait GameGetter: Send + Sync {
    /// Score stored for `title`; [`StorageError::NotFound`] when no row matches.
    fn get_game_score(&self, title: String) -> BoxFuture<'static, StorageResult<i64>>;
}

/// Full persistence surface installed in the application state.
pub trait GameStore: GameSaver + GameDeleter + GameGetter {
    /// Round-trip a trivial statement to prove the database answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Close the pool; called once at shutdown.
    fn close(&self) -> BoxFuture<'static, ()>;
}

/// Open the backend matching the URL scheme and make sure the schema exists.
pub async fn connect(url: &str) -> StorageResult<Arc<dyn GameStore>> {
    #[cfg(feature = "postgres-store")]
    {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            let store = postgres::PgGameStore::connect(url).await?;
            return Ok(Arc::new(store));
        }
    }

    #[cfg(feature = "sqlite-store")]
    {
        if url.starts_with("sqlite:") {
            let store = sqlite::SqliteGameStore::connect(url).await?;
            return Ok(Arc::new(store));
        }
    }

    let scheme = url.split(':').next().unwrap_or_default().to_owned();
    Err(StorageError::UnsupportedBackend { scheme })
}
