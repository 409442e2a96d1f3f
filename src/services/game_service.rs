use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::{
    dao::{
        game_store::{GameDeleter, GameGetter, GameSaver},
        storage::StorageError,
    },
    dto::game::{DeleteGameRequest, GetScoreQuery, SaveGameRequest},
    error::{GameOperation, ServiceError},
};

/// Validate the request and upsert the game, returning its row id.
#[instrument(skip_all, fields(op = %GameOperation::Save, title = %request.title))]
pub async fn save_game<S>(saver: &S, request: SaveGameRequest) -> Result<i64, ServiceError>
where
    S: GameSaver + ?Sized,
{
    validate(&request)?;
    let SaveGameRequest { title, score } = request;
    // `required` has already rejected a missing score.
    let score = score.unwrap_or_default();

    let id = saver
        .save_game(title, score)
        .await
        .map_err(|source| storage_failure(GameOperation::Save, source))?;

    info!(id, score, "game saved");
    Ok(id)
}

/// Validate the request and delete the game, returning the id it had.
#[instrument(skip_all, fields(op = %GameOperation::Delete, title = %request.title))]
pub async fn delete_game<S>(deleter: &S, request: DeleteGameRequest) -> Result<i64, ServiceError>
where
    S: GameDeleter + ?Sized,
{
    validate(&request)?;

    let id = deleter
        .delete_game(request.title)
        .await
        .map_err(|source| storage_failure(GameOperation::Delete, source))?;

    info!(id, "game deleted");
    Ok(id)
}

/// Validate the query and fetch the stored score.
#[instrument(skip_all, fields(op = %GameOperation::GetScore, title = %query.title))]
pub async fn get_game_score<S>(getter: &S, query: GetScoreQuery) -> Result<i64, ServiceError>
where
    S: GameGetter + ?Sized,
{
    validate(&query)?;

    let score = getter
        .get_game_score(query.title)
        .await
        .map_err(|source| storage_failure(GameOperation::GetScore, source))?;

    info!(score, "game score retrieved");
    Ok(score)
}

fn validate(request: &impl Validate) -> Result<(), ServiceError> {
    request.validate().map_err(|errors| {
        warn!(%errors, "invalid request");
        ServiceError::from(errors)
    })
}

fn storage_failure(operation: GameOperation, source: StorageError) -> ServiceError {
    let err = ServiceError::storage(operation, source);
    match &err {
        ServiceError::AlreadyExists { .. } => info!("game already exists"),
        ServiceError::NotFound { .. } => warn!(error = %err, "game not found"),
        _ => error!(error = %err, "storage operation failed"),
    }
    err
}
