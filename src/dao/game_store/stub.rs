//! In-process [`GameStore`] double that records how often it was reached.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use futures::future::BoxFuture;

use crate::dao::{
    game_store::{GameDeleter, GameGetter, GameSaver, GameStore},
    storage::{StorageError, StorageResult},
};

#[derive(Default)]
struct StubInner {
    games: Mutex<HashMap<String, (i64, i64)>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    completed: AtomicUsize,
    fail_with: Mutex<Option<fn(String) -> StorageError>>,
    delay: Mutex<Option<Duration>>,
    healthy: Mutex<bool>,
}

/// Hash-map backed store with call counters and injectable failures.
#[derive(Clone, Default)]
pub(crate) struct StubGameStore {
    inner: Arc<StubInner>,
}

impl StubGameStore {
    pub(crate) fn new() -> Self {
        let store = Self::default();
        *store.inner.healthy.lock().unwrap() = true;
        store
    }

    /// Every subsequent call fails with the error built by `make`.
    pub(crate) fn failing(make: fn(String) -> StorageError) -> Self {
        let store = Self::new();
        *store.inner.fail_with.lock().unwrap() = Some(make);
        store
    }

    /// Every subsequent call sleeps for `delay` before touching the map.
    pub(crate) fn slow(delay: Duration) -> Self {
        let store = Self::new();
        *store.inner.delay.lock().unwrap() = Some(delay);
        store
    }

    pub(crate) fn set_healthy(&self, healthy: bool) {
        *self.inner.healthy.lock().unwrap() = healthy;
    }

    /// Number of storage operations that were started.
    pub(crate) fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Number of storage operations that ran to completion.
    pub(crate) fn completed(&self) -> usize {
        self.inner.completed.load(Ordering::SeqCst)
    }

    pub(crate) fn score_of(&self, title: &str) -> Option<i64> {
        self.inner
            .games
            .lock()
            .unwrap()
            .get(title)
            .map(|(_, score)| *score)
    }

    fn run<T: Send + 'static>(
        &self,
        title: String,
        op: impl FnOnce(&StubInner, String) -> StorageResult<T> + Send + 'static,
    ) -> BoxFuture<'static, StorageResult<T>> {
        let inner = self.inner.clone();
        inner.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            let delay = *inner.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let fail_with = *inner.fail_with.lock().unwrap();
            let result = match fail_with {
                Some(make) => Err(make(title)),
                None => op(inner.as_ref(), title),
            };
            inner.completed.fetch_add(1, Ordering::SeqCst);
            result
        })
    }
}

impl GameSaver for StubGameStore {
    fn save_game(&self, title: String, score: i64) -> BoxFuture<'static, StorageResult<i64>> {
        self.run(title, move |inner, title| {
            let mut games = inner.games.lock().unwrap();
            if let Some(entry) = games.get_mut(&title) {
                entry.1 = score;
                return Ok(entry.0);
            }
            let id = inner.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
            games.insert(title, (id, score));
            Ok(id)
        })
    }
}

impl GameDeleter for StubGameStore {
    fn delete_game(&self, title: String) -> BoxFuture<'static, StorageResult<i64>> {
        self.run(title, |inner, title| {
            let removed = inner.games.lock().unwrap().remove(&title);
            removed
                .map(|(id, _)| id)
                .ok_or(StorageError::NotFound { title })
        })
    }
}

impl GameGetter for StubGameStore {
    fn get_game_score(&self, title: String) -> BoxFuture<'static, StorageResult<i64>> {
        self.run(title, |inner, title| {
            let score = inner.games.lock().unwrap().get(&title).map(|(_, s)| *s);
            score.ok_or(StorageError::NotFound { title })
        })
    }
}

impl GameStore for StubGameStore {
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let healthy = *self.inner.healthy.lock().unwrap();
        Box::pin(async move {
            if healthy {
                Ok(())
            } else {
                Err(StorageError::unavailable(
                    "stub marked unhealthy".into(),
                    std::io::Error::other("down"),
                ))
            }
        })
    }

    fn close(&self) -> BoxFuture<'static, ()> {
        Box::pin(async {})
    }
}
