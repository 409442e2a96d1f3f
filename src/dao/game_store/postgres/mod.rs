mod store;

pub use store::PgGameStore;
