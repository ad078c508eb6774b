use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::{models::Preferences, AppState};

#[derive(Debug, Deserialize)]
pub struct PreferencesUpdate {
    pub sound_on: Option<bool>,
    pub first_run: Option<bool>,
}

pub async fn get_preferences(State(state): State<Arc<AppState>>) -> Json<Preferences> {
    Json(state.preferences.read().await.clone())
}

/// Update the client-owned flags. The best score can only change through a solved game.
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<Preferences>, StatusCode> {
    let mut preferences = state.preferences.write().await;
    let mut updated = preferences.clone();

    if let Some(sound_on) = update.sound_on {
        updated.sound_on = sound_on;
    }
    if let Some(first_run) = update.first_run {
        updated.first_run = first_run;
    }

    if updated != *preferences {
        state.store.save(&updated).await.map_err(|e| {
            tracing::error!("Failed to save preferences: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        *preferences = updated;
        tracing::debug!("Preferences updated: {:?}", *preferences);
    }

    Ok(Json(preferences.clone()))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{send, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_default_preferences() {
        let (app, _) = test_app();
        let (status, body) = send(&app, Method::GET, "/api/preferences", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sound_on"], true);
        assert_eq!(body["first_run"], true);
        assert!(body["best"].is_null());
    }

    #[tokio::test]
    async fn test_update_is_persisted() {
        let (app, state) = test_app();

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/preferences",
            Some(json!({"sound_on": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sound_on"], false);
        assert_eq!(body["first_run"], true);

        send(&app, Method::PATCH, "/api/preferences", Some(json!({"first_run": false}))).await;

        let stored = state.store.load().await.unwrap();
        assert!(!stored.sound_on);
        assert!(!stored.first_run);
    }
}
