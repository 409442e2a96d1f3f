mod store;

pub use store::SqliteGameStore;
