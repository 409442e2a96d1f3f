//! SQLite-backed game store, used for local runs and storage tests.

use std::str::FromStr;

use futures::future::BoxFuture;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::{debug, info};

use crate::dao::{
    game_store::{
        GameDeleter, GameGetter, GameSaver, GameStore,
        error::{SqlDaoError, SqlResult},
    },
    models::{GAME_TABLE_NAME, GAME_TITLE_INDEX_NAME, ensure_score, ensure_title},
    storage::StorageResult,
};

const CREATE_TABLE_QUERY: &str = r#"
    CREATE TABLE IF NOT EXISTS game(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        score INTEGER
    )
"#;
const CREATE_INDEX_QUERY: &str = "CREATE INDEX IF NOT EXISTS idx_game_title ON game(title)";

const SAVE_GAME_QUERY: &str = r#"
    INSERT INTO game(title, score) VALUES (?, ?)
    ON CONFLICT (title) DO UPDATE SET score = excluded.score
    RETURNING id
"#;
const DELETE_GAME_QUERY: &str = "DELETE FROM game WHERE title = ? RETURNING id";
const GET_SCORE_QUERY: &str = "SELECT score FROM game WHERE title = ?";

/// SQLite implementation of [`GameStore`].
#[derive(Clone)]
pub struct SqliteGameStore {
    pool: SqlitePool,
}

impl SqliteGameStore {
    /// Open (or create) the database behind `url` and ensure the schema exists.
    ///
    /// `sqlite::memory:` databases live as long as their single pooled connection, so the
    /// pool is pinned to one connection that never expires.
    pub async fn connect(url: &str) -> SqlResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|source| SqlDaoError::InvalidUrl { source })?
            .create_if_missing(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.max_connections(5);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|source| SqlDaoError::Connect { source })?;

        let store = Self { pool };
        if let Err(err) = store.ensure_schema().await {
            store.pool.close().await;
            return Err(err);
        }
        info!(in_memory, "opened SQLite game store");
        Ok(store)
    }

    async fn ensure_schema(&self) -> SqlResult<()> {
        sqlx::query(CREATE_TABLE_QUERY)
            .execute(&self.pool)
            .await
            .map_err(|source| SqlDaoError::EnsureSchema {
                object: "table",
                name: GAME_TABLE_NAME,
                source,
            })?;

        sqlx::query(CREATE_INDEX_QUERY)
            .execute(&self.pool)
            .await
            .map_err(|source| SqlDaoError::EnsureSchema {
                object: "index",
                name: GAME_TITLE_INDEX_NAME,
                source,
            })?;

        Ok(())
    }

    async fn save_game(&self, title: String, score: i64) -> SqlResult<i64> {
        let id: i64 = sqlx::query_scalar(SAVE_GAME_QUERY)
            .bind(&title)
            .bind(score)
            .fetch_one(&self.pool)
            .await
            .map_err(|source| SqlDaoError::SaveGame {
                title: title.clone(),
                source,
            })?;
        debug!(%title, id, "game upserted");
        Ok(id)
    }

    async fn delete_game(&self, title: String) -> SqlResult<i64> {
        let id: Option<i64> = sqlx::query_scalar(DELETE_GAME_QUERY)
            .bind(&title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| SqlDaoError::DeleteGame {
                title: title.clone(),
                source,
            })?;
        id.ok_or(SqlDaoError::NotFound { title })
    }

    async fn get_game_score(&self, title: String) -> SqlResult<i64> {
        let score: Option<Option<i64>> = sqlx::query_scalar(GET_SCORE_QUERY)
            .bind(&title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| SqlDaoError::GetScore {
                title: title.clone(),
                source,
            })?;
        match score {
            Some(score) => Ok(score.unwrap_or_default()),
            None => Err(SqlDaoError::NotFound { title }),
        }
    }

    async fn ping(&self) -> SqlResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|source| SqlDaoError::HealthPing { source })?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl GameSaver for SqliteGameStore {
    fn save_game(&self, title: String, score: i64) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move {
            ensure_title(&title)?;
            ensure_score(score)?;
            store.save_game(title, score).await.map_err(Into::into)
        })
    }
}

impl GameDeleter for SqliteGameStore {
    fn delete_game(&self, title: String) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move {
            ensure_title(&title)?;
            store.delete_game(title).await.map_err(Into::into)
        })
    }
}

impl GameGetter for SqliteGameStore {
    fn get_game_score(&self, title: String) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move {
            ensure_title(&title)?;
            store.get_game_score(title).await.map_err(Into::into)
        })
    }
}

impl GameStore for SqliteGameStore {
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn close(&self) -> BoxFuture<'static, ()> {
        let pool = self.pool.clone();
        Box::pin(async move { pool.close().await })
    }
}
