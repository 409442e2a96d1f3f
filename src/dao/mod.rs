/// Game persistence backends and the capability traits they implement.
pub mod game_store;
/// Table naming and argument rules shared by the backends.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
