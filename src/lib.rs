//! Notekeeper
//!
//! A small self-hosted notes application:
//! - SQLite entity store for users and slug-addressed notes
//! - Password login with JWT session cookies
//! - Server-rendered HTML pages for the full CRUD flow
//!
//! Every note belongs to the user who created it; object-scoped routes
//! answer 404 to anyone else, and anonymous callers are redirected to
//! the login page with a `next` parameter.

pub mod auth;
pub mod notes;
pub mod store;
pub mod web;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub database: DatabaseYamlConfig,
    pub auth: AuthConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Database configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseYamlConfig {
    /// Path to the SQLite database file. `:memory:` gives a volatile store.
    pub path: String,
}

impl Default for DatabaseYamlConfig {
    fn default() -> Self {
        Self {
            path: "notekeeper.db".into(),
        }
    }
}

/// Authentication configuration.
///
/// The JWT secret defaults to a development value so the app runs out of
/// the box; startup logs a warning when the default is still in use.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT signing secret (HS256, minimum 32 characters)
    pub jwt_secret: String,
    /// JWT token lifetime in seconds (default: 28800 = 8h)
    pub jwt_expiry_secs: u64,
    /// Bcrypt cost factor for password hashing (default: 12)
    pub bcrypt_cost: u32,
}

/// Development-only signing secret. Never use in a deployed instance.
pub const DEV_JWT_SECRET: &str = "notekeeper-dev-secret-change-me-32ch";

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiry_secs: 28800,
            bcrypt_cost: 12,
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let mut auth = yaml.auth;
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            auth.jwt_secret = secret;
        }
        if let Some(expiry) = std::env::var("JWT_EXPIRY_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            auth.jwt_expiry_secs = expiry;
        }

        Ok(Self {
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            database_path: std::env::var("DATABASE_PATH").unwrap_or(yaml.database.path),
            auth,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

// ============================================================================
// Server startup
// ============================================================================

/// Open the store, build the router, and serve until shutdown.
pub async fn start_server(config: Config) -> Result<()> {
    if config.auth.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("Using the built-in development JWT secret; set JWT_SECRET in production");
    }

    let store = Arc::new(
        store::Store::open(&config.database_path)
            .with_context(|| format!("failed to open database at {}", config.database_path))?,
    );

    let port = config.server_port;
    let state = Arc::new(web::handlers::ServerState {
        store,
        auth: config.auth,
    });
    let app = web::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")
}

// ============================================================================
// Tests
// ============================================================================
