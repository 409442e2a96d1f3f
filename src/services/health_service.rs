use tracing::warn;

use crate::{dao::game_store::GameStore, dto::health::HealthResponse};

/// Ping the game store and report `degraded` when it does not answer.
pub async fn health_status(store: &dyn GameStore) -> HealthResponse {
    match store.health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            HealthResponse::degraded()
        }
    }
}
