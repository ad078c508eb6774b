use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, time::Duration};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// `None` keeps preferences in memory only
    pub preferences_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Seconds without activity before a session is dropped
    pub session_idle_timeout: u64,
    /// Seconds between idle-session sweeps
    pub cleanup_interval: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            frontend_dir: env::var("FRONTEND_DIR")
                .unwrap_or_else(|_| "../frontend".to_string()),
        };

        let preferences_path = match env::var("PREFERENCES_PATH") {
            Ok(path) if path.trim().is_empty() => None,
            Ok(path) => Some(path),
            Err(_) => Some("./preferences.json".to_string()),
        };
        let storage = StorageConfig { preferences_path };

        let game = GameConfig {
            session_idle_timeout: env::var("SESSION_IDLE_TIMEOUT")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .context("SESSION_IDLE_TIMEOUT must be a number of seconds")?,
            cleanup_interval: env::var("SESSION_CLEANUP_INTERVAL")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
        };

        Ok(Config {
            server,
            storage,
            game,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.game.session_idle_timeout)
    }

    pub fn cleanup_interval(&self) -> Duration {
        // tokio::time::interval panics on a zero period
        Duration::from_secs(self.game.cleanup_interval.max(1))
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for tests: in-memory preferences, short timeouts
    pub fn for_tests() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                frontend_dir: "../frontend".to_string(),
            },
            storage: StorageConfig {
                preferences_path: None,
            },
            game: GameConfig {
                session_idle_timeout: 60,
                cleanup_interval: 1,
            },
        }
    }
}
