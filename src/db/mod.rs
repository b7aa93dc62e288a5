// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record store layer.
//!
//! [`RecordStore`] is the whole surface the app needs from its backend.
//! [`FirebaseDb`] talks to Firebase Authentication and the Realtime Database;
//! [`MemoryStore`] keeps everything in process for tests and offline use.

pub mod firebase;
pub mod memory;

pub use firebase::FirebaseDb;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{AuthSession, UserId, UserRecord};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Persistent user/dog storage with its own authentication.
///
/// Callers validate every field before calling in; implementations do not
/// retry and impose no timeout policy of their own.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create an account and its initial (dog-less) user record.
    ///
    /// Fails with [`StoreError::Conflict`] if the email is already registered.
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        phone: &str,
        password: &str,
    ) -> Result<UserId, StoreError>;

    /// Sign in. Fails with [`StoreError::InvalidCredentials`] on mismatch.
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, StoreError>;

    /// Fetch the full record, dogs included, for an email address.
    async fn fetch_user_by_email(
        &self,
        session: &AuthSession,
        email: &str,
    ) -> Result<UserRecord, StoreError>;

    /// Overwrite the stored record for `record.id` wholesale.
    ///
    /// Last writer wins: there is no merge and no concurrency check.
    async fn replace_user(
        &self,
        session: &AuthSession,
        record: &UserRecord,
    ) -> Result<(), StoreError>;

    /// Trade the refresh token for a new session.
    async fn refresh_session(&self, session: &AuthSession) -> Result<AuthSession, StoreError>;
}
