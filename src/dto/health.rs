use serde::Serialize;
use utoipa::ToSchema;

/// Coarse service state reported by `/healthcheck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The game store answered.
    Ok,
    /// The process is up but the game store did not answer.
    Degraded,
}

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the game store answered its ping, `degraded` otherwise.
    pub status: HealthStatus,
}

impl HealthResponse {
    /// Everything answered.
    pub fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
        }
    }

    /// The process is up but the database did not answer.
    pub fn degraded() -> Self {
        Self {
            status: HealthStatus::Degraded,
        }
    }
}
