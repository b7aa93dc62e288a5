// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables or a
//! Firebase web-config JSON file.
//!
//! Connection parameters are read once at startup, before any store call.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Backend connection parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase Web API key (public)
    pub firebase_api_key: String,
    /// Realtime Database URL, e.g. `https://<project>.firebaseio.com`
    pub firebase_database_url: String,
    /// Firebase project ID
    pub firebase_project_id: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            firebase_api_key: "test-api-key".to_string(),
            firebase_database_url: "http://localhost:9000".to_string(),
            firebase_project_id: "demo-dogout".to_string(),
        }
    }
}

/// Web-config JSON as downloaded from the Firebase console.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirebaseWebConfig {
    api_key: String,
    #[serde(rename = "databaseURL")]
    database_url: String,
    project_id: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// If `FIREBASE_CONFIG_FILE` is set, that file is read; otherwise the
    /// individual `FIREBASE_*` variables are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        if let Ok(path) = env::var("FIREBASE_CONFIG_FILE") {
            tracing::info!(path = %path, "Loading Firebase config file");
            return Self::from_json_file(path);
        }

        Ok(Self {
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            firebase_database_url: env::var("FIREBASE_DATABASE_URL")
                .map_err(|_| ConfigError::Missing("FIREBASE_DATABASE_URL"))?,
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .map_err(|_| ConfigError::Missing("FIREBASE_PROJECT_ID"))?,
        })
    }

    /// Load a Firebase web-config JSON file (`apiKey`, `databaseURL`, `projectId`).
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::File(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(&raw)
    }

    /// Parse a Firebase web-config JSON document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let web: FirebaseWebConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::File(e.to_string()))?;
        Ok(Self {
            firebase_api_key: web.api_key,
            firebase_database_url: web.database_url,
            firebase_project_id: web.project_id,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid config file: {0}")]
    File(String),
}
