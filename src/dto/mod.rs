/// Game request bodies, query string and score payload.
pub mod game;
/// Health check payload.
pub mod health;
/// Response envelope.
pub mod response;
