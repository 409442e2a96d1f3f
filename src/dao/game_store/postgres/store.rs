use std::str::FromStr;

use futures::future::BoxFuture;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::{debug, info};

use crate::dao::{
    game_store::{
        GameDeleter, GameGetter, GameSaver, GameStore,
        error::{SqlDaoError, SqlResult},
    },
    models::{GAME_TABLE_NAME, GAME_TITLE_INDEX_NAME, ensure_score, ensure_title},
    storage::{StorageError, StorageResult},
};

const MAX_CONNECTIONS: u32 = 10;

const CREATE_TABLE_QUERY: &str = r#"
    CREATE TABLE IF NOT EXISTS game(
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL UNIQUE,
        score INTEGER
    )
"#;
const CREATE_INDEX_QUERY: &str = "CREATE INDEX IF NOT EXISTS idx_game_title ON game(title)";

const SAVE_GAME_QUERY: &str = r#"
    INSERT INTO game(title, score) VALUES ($1, $2)
    ON CONFLICT (title) DO UPDATE SET score = EXCLUDED.score
    RETURNING id
"#;
const DELETE_GAME_QUERY: &str = "DELETE FROM game WHERE title = $1 RETURNING id";
const GET_SCORE_QUERY: &str = "SELECT score FROM game WHERE title = $1";

/// PostgreSQL-backed [`GameStore`] over a shared connection pool.
#[derive(Clone)]
pub struct PgGameStore {
    pool: PgPool,
}

impl PgGameStore {
    /// Open a pool against `url` and idempotently create the table and index.
    pub async fn connect(url: &str) -> SqlResult<Self> {
        let options =
            PgConnectOptions::from_str(url).map_err(|source| SqlDaoError::InvalidUrl { source })?;
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|source| SqlDaoError::Connect { source })?;

        let store = Self { pool };
        if let Err(err) = store.ensure_schema().await {
            store.pool.close().await;
            return Err(err);
        }
        info!("connected to PostgreSQL game store");
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

    /// Insert the game or overwrite the score of the existing row with that title.
    async fn save_game(&self, title: String, score: i32) -> SqlResult<i64> {
        let id: i32 = sqlx::query_scalar(SAVE_GAME_QUERY)
            .bind(&title)
            .bind(score)
            .fetch_one(&self.pool)
            .await
            .map_err(|source| SqlDaoError::SaveGame {
                title: title.clone(),
                source,
            })?;
        debug!(%title, id, "game upserted");
        Ok(i64::from(id))
    }

    async fn delete_game(&self, title: String) -> SqlResult<i64> {
        let id: Option<i32> = sqlx::query_scalar(DELETE_GAME_QUERY)
            .bind(&title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| SqlDaoError::DeleteGame {
                title: title.clone(),
                source,
            })?;
        id.map(i64::from)
            .ok_or(SqlDaoError::NotFound { title })
    }

    async fn get_game_score(&self, title: String) -> SqlResult<i64> {
        let score: Option<Option<i32>> = sqlx::query_scalar(GET_SCORE_QUERY)
            .bind(&title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|source| SqlDaoError::GetScore {
                title: title.clone(),
                source,
            })?;
        match score {
            Some(score) => Ok(score.map(i64::from).unwrap_or_default()),
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
}

impl GameSaver for PgGameStore {
    fn save_game(&self, title: String, score: i64) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move {
            ensure_title(&title)?;
            ensure_score(score)?;
            // `score` is an INTEGER column.
            let score = i32::try_from(score).map_err(|_| {
                StorageError::InvalidInput(format!("game score {score} does not fit the column"))
            })?;
            store.save_game(title, score).await.map_err(Into::into)
        })
    }
}

impl GameDeleter for PgGameStore {
    fn delete_game(&self, title: String) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move {
            ensure_title(&title)?;
            store.delete_game(title).await.map_err(Into::into)
        })
    }
}

impl GameGetter for PgGameStore {
    fn get_game_score(&self, title: String) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move {
            ensure_title(&title)?;
            store.get_game_score(title).await.map_err(Into::into)
        })
    }
}

impl GameStore for PgGameStore {
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn close(&self) -> BoxFuture<'static, ()> {
        let pool = self.pool.clone();
        Box::pin(async move { pool.close().await })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    const TEST_DATABASE_URL_ENV: &str = "GAME_SAVER_TEST_DATABASE_URL";

    /// Connect to the database named by the environment, or `None` when none is configured.
    async fn open() -> Option<PgGameStore> {
        let url = [TEST_DATABASE_URL_ENV, "DATABASE_URL"]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|url| url.starts_with("postgres://") || url.starts_with("postgresql://"));
        let Some(url) = url else {
            eprintln!("{TEST_DATABASE_URL_ENV} is not set; skipping PostgreSQL store test");
            return None;
        };
        Some(PgGameStore::connect(&url).await.unwrap())
    }

    /// Tests share one table, so every test works on titles nobody else uses.
    fn unique_title(prefix: &str) -> String {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!(
            "{prefix}-{}-{nanos}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::SeqCst)
        )
    }

    async fn rows_titled(store: &PgGameStore, title: &str) -> i64 {
        let rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM game WHERE title = $1")
            .bind(title)
            .fetch_one(&store.pool)
            .await
            .unwrap();
        rows.0
    }

    #[tokio::test]
    async fn schema_creation_is_idempotent() {
        let Some(store) = open().await else { return };
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();

        let index: (String,) = sqlx::query_as(
            "SELECT indexname::text FROM pg_indexes WHERE tablename = 'game' AND indexname = 'idx_game_title'",
        )
        .fetch_one(&store.pool)
        .await
        .unwrap();
        assert_eq!(index.0, GAME_TITLE_INDEX_NAME);
        GameStore::close(&store).await;
    }

    #[tokio::test]
    async fn saving_same_title_keeps_id_and_overwrites_score() {
        let Some(store) = open().await else { return };
        let title = unique_title("Chess");

        let first = GameSaver::save_game(&store, title.clone(), 7).await.unwrap();
        let second = GameSaver::save_game(&store, title.clone(), 9).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            GameGetter::get_game_score(&store, title.clone()).await.unwrap(),
            9
        );
        assert_eq!(rows_titled(&store, &title).await, 1);
        GameStore::close(&store).await;
    }

    #[tokio::test]
    async fn round_trip_save_get_delete() {
        let Some(store) = open().await else { return };
        let title = unique_title("Chess");

        let id = GameSaver::save_game(&store, title.clone(), 7).await.unwrap();
        assert_eq!(
            GameGetter::get_game_score(&store, title.clone()).await.unwrap(),
            7
        );

        GameSaver::save_game(&store, title.clone(), 9).await.unwrap();
        assert_eq!(
            GameGetter::get_game_score(&store, title.clone()).await.unwrap(),
            9
        );

        let deleted = GameDeleter::delete_game(&store, title.clone()).await.unwrap();
        assert_eq!(deleted, id);

        let err = GameGetter::get_game_score(&store, title.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { title: missing } if missing == title));

        let err = GameDeleter::delete_game(&store, title.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
        GameStore::close(&store).await;
    }

    #[tokio::test]
    async fn distinct_titles_get_distinct_ids() {
        let Some(store) = open().await else { return };
        let chess = GameSaver::save_game(&store, unique_title("Chess"), 7)
            .await
            .unwrap();
        let go = GameSaver::save_game(&store, unique_title("Go"), 3)
            .await
            .unwrap();
        assert_ne!(chess, go);
        GameStore::close(&store).await;
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_table() {
        let Some(store) = open().await else { return };
        let title = unique_title("Chess");

        for score in [-1, 11, i64::from(i32::MAX) + 1] {
            let err = GameSaver::save_game(&store, title.clone(), score)
                .await
                .unwrap_err();
            assert!(matches!(err, StorageError::InvalidInput(_)));
        }
        assert!(matches!(
            GameSaver::save_game(&store, String::new(), 5).await,
            Err(StorageError::InvalidInput(_))
        ));
        assert!(matches!(
            GameDeleter::delete_game(&store, String::new()).await,
            Err(StorageError::InvalidInput(_))
        ));
        assert!(matches!(
            GameGetter::get_game_score(&store, String::new()).await,
            Err(StorageError::InvalidInput(_))
        ));

        assert_eq!(rows_titled(&store, &title).await, 0);
        GameStore::close(&store).await;
    }

    #[tokio::test]
    async fn saved_games_survive_reconnect() {
        let Some(store) = open().await else { return };
        let title = unique_title("Chess");
        let id = GameSaver::save_game(&store, title.clone(), 7).await.unwrap();
        GameStore::close(&store).await;

        let Some(reopened) = open().await else { return };
        assert_eq!(
            GameGetter::get_game_score(&reopened, title.clone())
                .await
                .unwrap(),
            7
        );
        assert_eq!(
            GameSaver::save_game(&reopened, title.clone(), 2).await.unwrap(),
            id
        );
        GameDeleter::delete_game(&reopened, title).await.unwrap();
        GameStore::close(&reopened).await;
    }
}
