use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Body of `POST /game`.
#[serde_as]
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SaveGameRequest {
    /// Unique title acting as the natural key of the game.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub title: String,
    /// Score between 0 and 10 inclusive.
    #[validate(required, range(min = 0, max = 10))]
    pub score: Option<i64>,
}

/// Body of `DELETE /game`.
#[serde_as]
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DeleteGameRequest {
    /// Title of the game to delete. Missing and `null` both read as empty.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub title: String,
}

/// Query string of `GET /game`.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct GetScoreQuery {
    /// Title of the game to look up.
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub title: String,
}

/// Payload carried in the `data` field of a successful score lookup.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreData {
    /// Last score saved for the title.
    pub score: i64,
}
