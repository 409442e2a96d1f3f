use std::fmt::Display;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::post,
};
use tracing::warn;

use crate::{
    dto::{
        game::{DeleteGameRequest, GetScoreQuery, SaveGameRequest, ScoreData},
        response::{ApiResponse, NoData, StatusResponse},
    },
    error::{AppError, GameOperation},
    services::game_service,
    state::SharedState,
};

/// Routes handling save, delete and score lookup of games.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/game",
        post(save_game).delete(delete_game).get(get_game_score),
    )
}

/// Insert a game or overwrite the score of the game with the same title.
#[utoipa::path(
    post,
    path = "/game",
    tag = "game",
    request_body = SaveGameRequest,
    responses(
        (status = 200, description = "Game saved", body = ApiResponse<NoData>),
        (status = 400, description = "Malformed body or invalid fields", body = ApiResponse<NoData>),
        (status = 409, description = "Title already taken", body = ApiResponse<NoData>),
        (status = 500, description = "Storage failure", body = ApiResponse<NoData>)
    )
)]
pub async fn save_game(
    State(state): State<SharedState>,
    payload: Result<Json<SaveGameRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| decode_failure(GameOperation::Save, rejection))?;
    game_service::save_game(state.game_store(), request).await?;
    Ok(Json(StatusResponse::ok()))
}

/// Delete the game with the given title.
#[utoipa::path(
    delete,
    path = "/game",
    tag = "game",
    request_body = DeleteGameRequest,
    responses(
        (status = 200, description = "Game deleted", body = ApiResponse<NoData>),
        (status = 400, description = "Malformed body or missing title", body = ApiResponse<NoData>),
        (status = 404, description = "No game with that title", body = ApiResponse<NoData>),
        (status = 500, description = "Storage failure", body = ApiResponse<NoData>)
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    payload: Result<Json<DeleteGameRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| decode_failure(GameOperation::Delete, rejection))?;
    game_service::delete_game(state.game_store(), request).await?;
    Ok(Json(StatusResponse::ok()))
}

/// Return the score stored for the given title.
#[utoipa::path(
    get,
    path = "/game",
    tag = "game",
    params(GetScoreQuery),
    responses(
        (status = 200, description = "Stored score", body = ApiResponse<ScoreData>),
        (status = 400, description = "Missing title", body = ApiResponse<NoData>),
        (status = 404, description = "No game with that title", body = ApiResponse<NoData>),
        (status = 500, description = "Storage failure", body = ApiResponse<NoData>)
    )
)]
pub async fn get_game_score(
    State(state): State<SharedState>,
    query: Result<Query<GetScoreQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ScoreData>>, AppError> {
    let Query(query) =
        query.map_err(|rejection| decode_failure(GameOperation::GetScore, rejection))?;
    let score = game_service::get_game_score(state.game_store(), query).await?;
    Ok(Json(ApiResponse::ok_with(ScoreData { score })))
}

fn decode_failure(operation: GameOperation, rejection: impl Display) -> AppError {
    warn!(op = %operation, error = %rejection, "failed to decode request");
    AppError::decode(rejection)
}
