pub mod games;
pub mod health;
pub mod preferences;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

use crate::{error::GameError, AppState};

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/games", post(games::create_game))
        .route(
            "/games/{game_id}",
            get(games::get_game).delete(games::delete_game),
        )
        .route("/games/{game_id}/moves", post(games::make_move))
        .route("/games/{game_id}/restart", post(games::restart_game))
        .route("/games/{game_id}/save", get(games::save_game))
        .route("/games/{game_id}/restore", post(games::restore_game))
        .route("/games/{game_id}/score", post(games::submit_score))
        .route(
            "/preferences",
            get(preferences::get_preferences).patch(preferences::update_preferences),
        )
}

impl From<GameError> for StatusCode {
    fn from(err: GameError) -> Self {
        match err {
            GameError::OutOfRange { .. } => StatusCode::BAD_REQUEST,
            GameError::Deserialization(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}
