/// OpenAPI documentation generation.
pub mod documentation;
/// Save, delete and score lookup on top of the game store.
pub mod game_service;
/// Health check service.
pub mod health_service;
