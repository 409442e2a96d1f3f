use std::sync::Arc;

use crate::dao::game_store::GameStore;

/// Handle cloned into every handler.
pub type SharedState = Arc<AppState>;

/// Process-wide handles injected into every route at wiring time.
pub struct AppState {
    game_store: Arc<dyn GameStore>,
}

impl AppState {
    /// Wrap the store opened at startup so handlers can share it cheaply.
    pub fn new(game_store: Arc<dyn GameStore>) -> SharedState {
        Arc::new(Self { game_store })
    }

    /// Borrow the installed game store.
    pub fn game_store(&self) -> &dyn GameStore {
        self.game_store.as_ref()
    }
}
