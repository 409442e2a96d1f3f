//! Library crate for game-saver, exposing modules for the binaries and tests.

/// JSON configuration file and environment overrides.
pub mod config;
/// Persistence: storage errors, game store traits and their sqlx backends.
pub mod dao;
/// Request and response payloads.
pub mod dto;
/// Error types for the service and HTTP layers.
pub mod error;
/// HTTP routes and middleware.
pub mod routes;
/// Business logic between the routes and the game store.
pub mod services;
/// Shared application state.
pub mod state;
