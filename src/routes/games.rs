use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::GameError,
    models::{BestScore, GameSnapshot, GameStatus, MoveOutcome},
    AppState, GameSession,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct GameResponse {
    pub game_id: Uuid,
    pub state: GameSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveResponse {
    pub game_id: Uuid,
    pub outcome: MoveOutcome,
    /// Set when this move solved the puzzle in fewer moves than the best score
    pub new_record: bool,
    pub state: GameSnapshot,
}

/// Base64 save state, as produced by `BoardEngine::to_base64`
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedGame {
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub recorded: bool,
    pub best: Option<BestScore>,
}

/// Run `f` against a session while holding its map entry.
///
/// The entry guard must not live across an `.await`, so callers keep all
/// engine work inside `f`.
fn with_session<T>(
    state: &AppState,
    game_id: Uuid,
    f: impl FnOnce(&mut GameSession) -> T,
) -> Result<T, StatusCode> {
    let mut session = state.sessions.get_mut(&game_id).ok_or_else(|| {
        tracing::debug!("Unknown game {}", game_id);
        StatusCode::NOT_FOUND
    })?;
    session.touch();
    Ok(f(&mut *session))
}

/// Start a new game session
pub async fn create_game(State(state): State<Arc<AppState>>) -> (StatusCode, Json<GameResponse>) {
    let game_id = Uuid::new_v4();
    let session = GameSession::new();
    let snapshot = session.engine.snapshot();

    state.sessions.insert(game_id, session);
    tracing::info!("Created game {} ({} active)", game_id, state.sessions.len());

    (
        StatusCode::CREATED,
        Json(GameResponse {
            game_id,
            state: snapshot,
        }),
    )
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, StatusCode> {
    let snapshot = with_session(&state, game_id, |session| session.engine.snapshot())?;
    Ok(Json(GameResponse {
        game_id,
        state: snapshot,
    }))
}

pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> StatusCode {
    match state.sessions.remove(&game_id) {
        Some(_) => {
            tracing::info!("Removed game {}", game_id);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Move the coin at the given cell. Coordinates outside the grid are a bad
/// request; a cell that cannot move is a normal `rejected` outcome.
pub async fn make_move(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
    Json(payload): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, StatusCode> {
    let (outcome, snapshot) = with_session(&state, game_id, |session| {
        session.engine.query_cell(payload.x, payload.y)?;
        let outcome = session.engine.play(payload.x, payload.y);
        Ok::<_, GameError>((outcome, session.engine.snapshot()))
    })?
    .map_err(|e| {
        tracing::debug!("Bad move request for game {}: {}", game_id, e);
        StatusCode::from(e)
    })?;

    let new_record = outcome == MoveOutcome::Solved
        && state
            .preferences
            .read()
            .await
            .is_new_record(snapshot.move_count);

    if outcome.is_accepted() && snapshot.status != GameStatus::Active {
        tracing::info!("Game {} finished: {:?}", game_id, snapshot.status);
    }

    Ok(Json(MoveResponse {
        game_id,
        outcome,
        new_record,
        state: snapshot,
    }))
}

pub async fn restart_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameResponse>, StatusCode> {
    let snapshot = with_session(&state, game_id, |session| {
        session.engine.initialize();
        session.engine.snapshot()
    })?;
    tracing::info!("Restarted game {}", game_id);

    Ok(Json(GameResponse {
        game_id,
        state: snapshot,
    }))
}

pub async fn save_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<SavedGame>, StatusCode> {
    let encoded = with_session(&state, game_id, |session| session.engine.to_base64())?;
    Ok(Json(SavedGame { state: encoded }))
}

/// Replace the session's state with a saved one. A malformed save leaves
/// the running game untouched.
pub async fn restore_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
    Json(payload): Json<SavedGame>,
) -> Result<Json<GameResponse>, StatusCode> {
    let snapshot = with_session(&state, game_id, |session| {
        session
            .engine
            .from_base64(&payload.state)
            .map(|()| session.engine.snapshot())
    })?
    .map_err(|e| {
        tracing::warn!("Rejected save state for game {}: {}", game_id, e);
        StatusCode::from(GameError::from(e))
    })?;
    tracing::info!("Restored game {} at move {}", game_id, snapshot.move_count);

    Ok(Json(GameResponse {
        game_id,
        state: snapshot,
    }))
}

/// Record the player's name against a solved game if it beats the best score
pub async fn submit_score(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, StatusCode> {
    let (solved, moves) = with_session(&state, game_id, |session| {
        (session.engine.is_solved(), session.engine.move_count())
    })?;

    if !solved {
        return Err(StatusCode::CONFLICT);
    }

    let mut preferences = state.preferences.write().await;
    let mut updated = preferences.clone();
    let recorded = updated.record_best(&payload.name, moves, Utc::now());

    if recorded {
        state.store.save(&updated).await.map_err(|e| {
            tracing::error!("Failed to save best score: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        *preferences = updated;
        tracing::info!("New best score: {} moves by {}", moves, payload.name.trim());
    }

    Ok(Json(ScoreResponse {
        recorded,
        best: preferences.best.clone(),
    }))
}
