use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the game saver API.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::save_game,
        crate::routes::game::delete_game,
        crate::routes::game::get_game_score,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::game::SaveGameRequest,
            crate::dto::game::DeleteGameRequest,
            crate::dto::game::ScoreData,
            crate::dto::response::ResponseStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Save, delete and score lookup of games"),
    )
)]
pub struct ApiDoc;
