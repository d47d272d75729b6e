// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Default history window for range queries (days).
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

/// Longest history window a request or `HISTORY_DAYS` may ask for.
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Which remote store backs the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStoreKind {
    Firestore,
    /// In-process store, for local development without GCP.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Remote store backend
    pub remote_store: RemoteStoreKind,
    /// Where the local mirror document is persisted
    pub mirror_path: PathBuf,
    /// Default history window in days
    pub history_days: u32,
    /// Base URL of the OpenAI-compatible advisor API
    pub advisor_api_url: String,
    /// Model name sent to the advisor API
    pub advisor_model: String,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Advisor API key; the advisor is disabled when absent
    pub advisor_api_key: Option<String>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            remote_store: RemoteStoreKind::Memory,
            mirror_path: PathBuf::from("data/test-mirror.json"),
            history_days: DEFAULT_HISTORY_DAYS,
            advisor_api_url: "http://localhost:9999/v1".to_string(),
            advisor_model: "test-model".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            advisor_api_key: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let remote_store = match env::var("REMOTE_STORE").as_deref() {
            Ok("memory") => RemoteStoreKind::Memory,
            Ok("firestore") | Err(_) => RemoteStoreKind::Firestore,
            Ok(_) => return Err(ConfigError::Invalid("REMOTE_STORE")),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            remote_store,
            mirror_path: env::var("MIRROR_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/mirror.json")),
            history_days: match env::var("HISTORY_DAYS") {
                Ok(raw) => raw
                    .parse::<u32>()
                    .ok()
                    .filter(|days| (1..=MAX_HISTORY_DAYS).contains(days))
                    .ok_or(ConfigError::Invalid("HISTORY_DAYS"))?,
                Err(_) => DEFAULT_HISTORY_DAYS,
            },
            advisor_api_url: env::var("ADVISOR_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            advisor_model: env::var("ADVISOR_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            advisor_api_key: env::var("ADVISOR_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Single test touching the environment, so no cross-test races.
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("REMOTE_STORE", "memory");
        env::set_var("ADVISOR_API_KEY", "  ");
        env::remove_var("HISTORY_DAYS");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.remote_store, RemoteStoreKind::Memory);
        assert_eq!(config.history_days, DEFAULT_HISTORY_DAYS);
        assert!(config.advisor_api_key.is_none());
        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");

        env::set_var("REMOTE_STORE", "postgres");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("REMOTE_STORE"))
        ));
        env::remove_var("REMOTE_STORE");

        for bad in ["0", "366", "week"] {
            env::set_var("HISTORY_DAYS", bad);
            assert!(matches!(
                Config::from_env(),
                Err(ConfigError::Invalid("HISTORY_DAYS"))
            ));
        }
        env::set_var("HISTORY_DAYS", "30");
        assert_eq!(Config::from_env().expect("Config should load").history_days, 30);
        env::remove_var("HISTORY_DAYS");
    }
}
