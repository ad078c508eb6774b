mod config;
mod error;
mod game;
mod models;
mod routes;
mod store;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use axum::Router;
use config::Config;
use dashmap::DashMap;
use game::BoardEngine;
use models::Preferences;
use store::{FileStore, MemoryStore, PreferencesStore};
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// A running game and its bookkeeping
#[derive(Debug)]
pub struct GameSession {
    pub engine: BoardEngine,
    pub created_at: Instant,
    pub last_active: Instant,
}

impl GameSession {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            engine: BoardEngine::new(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_active) > timeout
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    /// Each engine is only touched while its entry is locked
    pub sessions: DashMap<Uuid, GameSession>,
    pub preferences: RwLock<Preferences>,
    pub store: Arc<dyn PreferencesStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn PreferencesStore>, preferences: Preferences) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
            preferences: RwLock::new(preferences),
            store,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coin_jump=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Coin Jump server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Open preferences store
    let store: Arc<dyn PreferencesStore> = match &config.storage.preferences_path {
        Some(path) => {
            tracing::info!("Preferences file: {}", path);
            Arc::new(FileStore::new(path))
        }
        None => {
            tracing::warn!("No preferences path configured, preferences will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let preferences = match store.load().await {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::warn!("Failed to load preferences: {}. Using defaults.", e);
            Preferences::default()
        }
    };
    if let Some(best) = &preferences.best {
        tracing::info!("Best score: {} moves by {}", best.moves, best.name);
    }

    let state = Arc::new(AppState::new(config.clone(), store, preferences));

    // Spawn background task to drop idle game sessions
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        session_cleanup_task(cleanup_state).await;
    });

    let app = build_app(state, &config.server.frontend_dir);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Game API: http://{}/api/games", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_app(state: Arc<AppState>, frontend_dir: &str) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Serve frontend static files
    let frontend_service = ServeDir::new(frontend_dir);

    routes::create_routes()
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Remove sessions that have been idle longer than the configured timeout.
/// Returns how many were removed.
fn remove_idle_sessions(state: &AppState, now: Instant) -> usize {
    let timeout = state.config.session_idle_timeout();
    let before = state.sessions.len();

    state.sessions.retain(|game_id, session| {
        let idle = session.is_idle(now, timeout);
        if idle {
            tracing::info!(
                "Removed idle game {} (started {:?} ago, {} moves)",
                game_id,
                now.saturating_duration_since(session.created_at),
                session.engine.move_count()
            );
        }
        !idle
    });

    before.saturating_sub(state.sessions.len())
}

/// Background task that periodically drops idle game sessions
async fn session_cleanup_task(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(state.config.cleanup_interval());

    loop {
        interval.tick().await;

        let removed = remove_idle_sessions(&state, Instant::now());
        if removed > 0 {
            tracing::debug!(
                "Session cleanup removed {} games, {} active",
                removed,
                state.sessions.len()
            );
        }
    }
}
