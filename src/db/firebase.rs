// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase REST client implementing [`RecordStore`].
//!
//! Handles:
//! - Account creation, sign-in and email verification (Identity Toolkit)
//! - Session refresh (Secure Token service)
//! - User records under `users/{id}` (Realtime Database REST API)
//!
//! For local development, set FIREBASE_AUTH_EMULATOR_HOST and
//! FIREBASE_DATABASE_EMULATOR_HOST to talk to the emulator suite.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::db::{collections, RecordStore};
use crate::error::StoreError;
use crate::models::{AuthSession, JsonRecord, UserId, UserRecord};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";

/// Firebase Authentication + Realtime Database client.
#[derive(Clone)]
pub struct FirebaseDb {
    http: reqwest::Client,
    api_key: String,
    identity_url: String,
    token_url: String,
    database_url: String,
    /// Database namespace, only sent to the emulator.
    namespace: Option<String>,
}

impl FirebaseDb {
    /// Create a client from loaded configuration.
    pub fn new(config: &Config) -> Self {
        let (identity_url, token_url) = match std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            Ok(host) => {
                tracing::info!(host = %host, "Using Firebase Auth emulator");
                (
                    format!("http://{}/identitytoolkit.googleapis.com/v1", host),
                    format!("http://{}/securetoken.googleapis.com/v1/token", host),
                )
            }
            Err(_) => (
                IDENTITY_TOOLKIT_URL.to_string(),
                SECURE_TOKEN_URL.to_string(),
            ),
        };

        let (database_url, namespace) = match std::env::var("FIREBASE_DATABASE_EMULATOR_HOST") {
            Ok(host) => {
                tracing::info!(host = %host, "Using Realtime Database emulator");
                (
                    format!("http://{}", host),
                    Some(config.firebase_project_id.clone()),
                )
            }
            Err(_) => (
                config.firebase_database_url.trim_end_matches('/').to_string(),
                None,
            ),
        };

        tracing::info!(
            project = %config.firebase_project_id,
            database = %database_url,
            "Firebase client initialized"
        );

        Self {
            http: reqwest::Client::new(),
            api_key: config.firebase_api_key.clone(),
            identity_url,
            token_url,
            database_url,
            namespace,
        }
    }

    // ─── Authentication ──────────────────────────────────────────

    /// POST to an Identity Toolkit `accounts:*` endpoint.
    async fn accounts_call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &Value,
    ) -> Result<T, StoreError> {
        let url = format!("{}/accounts:{}", self.identity_url, method);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{} request failed: {}", method, e)))?;

        check_auth_response(response).await
    }

    async fn sign_in(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let response: SignInResponse = self.accounts_call(method, &body).await?;
        Ok(response.into())
    }

    /// Ask Firebase to send the address-verification email.
    async fn send_email_verification(&self, session: &AuthSession) -> Result<(), StoreError> {
        let body = serde_json::json!({
            "requestType": "VERIFY_EMAIL",
            "idToken": session.access_token,
        });
        let _: Value = self.accounts_call("sendOobCode", &body).await?;
        Ok(())
    }

    // ─── Database ────────────────────────────────────────────────

    fn user_url(&self, id: &UserId) -> String {
        format!(
            "{}/{}/{}.json",
            self.database_url,
            collections::USERS,
            urlencoding::encode(id.as_str())
        )
    }

    fn collection_url(&self) -> String {
        format!("{}/{}.json", self.database_url, collections::USERS)
    }

    /// Query parameters common to every database request.
    fn db_params(&self, session: &AuthSession) -> Vec<(&'static str, String)> {
        let mut params = vec![("auth", session.access_token.clone())];
        if let Some(ns) = &self.namespace {
            params.push(("ns", ns.clone()));
        }
        params
    }

    async fn put_user(&self, session: &AuthSession, record: &UserRecord) -> Result<(), StoreError> {
        let body = record
            .to_value()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let response = self
            .http
            .put(self.user_url(&record.id))
            .query(&self.db_params(session))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        check_db_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FirebaseDb {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        phone: &str,
        password: &str,
    ) -> Result<UserId, StoreError> {
        let session = self.sign_in("signUp", email, password).await?;

        // Registration still succeeds without the verification email
        if let Err(e) = self.send_email_verification(&session).await {
            tracing::warn!(user_id = %session.user_id, error = %e, "Verification email not sent");
        }

        let record = UserRecord::new(
            session.user_id.clone(),
            username.to_string(),
            email.to_string(),
            phone.to_string(),
        );
        self.put_user(&session, &record)
            .await
            .map_err(|e| record_write_failed(&record.id, e))?;

        tracing::info!(user_id = %record.id, "Registered new user");
        Ok(record.id)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        self.sign_in("signInWithPassword", email, password).await
    }

    async fn fetch_user_by_email(
        &self,
        session: &AuthSession,
        email: &str,
    ) -> Result<UserRecord, StoreError> {
        let mut params = self.db_params(session);
        params.push(("orderBy", "\"email_address\"".to_string()));
        params.push((
            "equalTo",
            serde_json::to_string(email).map_err(|e| StoreError::Unavailable(e.to_string()))?,
        ));

        let response = self
            .http
            .get(self.collection_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let body = check_db_response(response).await?;
        first_user(body)
    }

    async fn replace_user(
        &self,
        session: &AuthSession,
        record: &UserRecord,
    ) -> Result<(), StoreError> {
        self.put_user(session, record).await?;
        tracing::debug!(user_id = %record.id, dogs = record.dogs.len(), "Replaced user record");
        Ok(())
    }

    async fn refresh_session(&self, session: &AuthSession) -> Result<AuthSession, StoreError> {
        let response = self
            .http
            .post(&self.token_url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Token refresh request failed: {}", e)))?;

        let refreshed: RefreshResponse = check_auth_response(response).await?;
        Ok(refreshed.into())
    }
}

// ─── Wire types ──────────────────────────────────────────────

/// Identity Toolkit sign-up / sign-in response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub local_id: String,
    pub id_token: String,
    pub refresh_token: String,
}

impl From<SignInResponse> for AuthSession {
    fn from(r: SignInResponse) -> Self {
        AuthSession {
            user_id: UserId::from(r.local_id),
            access_token: r.id_token,
            refresh_token: r.refresh_token,
        }
    }
}

/// Secure Token refresh response.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub user_id: String,
    pub id_token: String,
    pub refresh_token: String,
}

impl From<RefreshResponse> for AuthSession {
    fn from(r: RefreshResponse) -> Self {
        AuthSession {
            user_id: UserId::from(r.user_id),
            access_token: r.id_token,
            refresh_token: r.refresh_token,
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map an Identity Toolkit / Secure Token error message to a store error.
///
/// Messages look like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be...`.
pub fn classify_auth_error(message: &str) -> StoreError {
    let code = message.split_whitespace().next().unwrap_or_default();
    match code {
        "EMAIL_EXISTS" => StoreError::Conflict,
        "EMAIL_NOT_FOUND"
        | "INVALID_PASSWORD"
        | "INVALID_LOGIN_CREDENTIALS"
        | "USER_DISABLED"
        | "USER_NOT_FOUND"
        | "TOKEN_EXPIRED"
        | "INVALID_REFRESH_TOKEN"
        | "INVALID_ID_TOKEN" => StoreError::InvalidCredentials,
        _ => StoreError::Unavailable(message.to_string()),
    }
}

/// Check an auth response and parse its JSON body.
async fn check_auth_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StoreError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => classify_auth_error(&envelope.error.message),
            Err(_) => StoreError::Unavailable(format!("HTTP {}: {}", status, body)),
        });
    }

    response
        .json()
        .await
        .map_err(|e| StoreError::Unavailable(format!("JSON parse error: {}", e)))
}

/// Check a database response and return its JSON body.
async fn check_db_response(response: reqwest::Response) -> Result<Value, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match status.as_u16() {
            401 | 403 => StoreError::InvalidCredentials,
            404 => StoreError::NotFound,
            _ => StoreError::Unavailable(format!("HTTP {}: {}", status, body)),
        });
    }

    response
        .json()
        .await
        .map_err(|e| StoreError::Unavailable(format!("JSON parse error: {}", e)))
}

/// The auth account exists but its user record was never written.
///
/// Signing up again reports a conflict and login finds no record, so the
/// account has to be removed from the console before the email can be reused.
fn record_write_failed(user_id: &UserId, err: StoreError) -> StoreError {
    tracing::warn!(
        user_id = %user_id,
        error = %err,
        "Account created without a user record"
    );
    StoreError::Unavailable(format!(
        "account {} was created but its user record was not stored: {}",
        user_id, err
    ))
}

/// Pick the user out of a `users` query result (`{id: record}` or `null`).
fn first_user(body: Value) -> Result<UserRecord, StoreError> {
    let matches: Map<String, Value> = match body {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(StoreError::Unavailable(format!(
                "unexpected query result: {}",
                other
            )))
        }
    };

    let (_, raw) = matches.into_iter().next().ok_or(StoreError::NotFound)?;
    UserRecord::from_value(raw).map_err(|e| StoreError::Unavailable(e.to_string()))
}
