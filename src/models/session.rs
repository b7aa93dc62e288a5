// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated session issued by the record store.

use std::fmt;

use crate::models::user::UserId;

/// Tokens for an authenticated user.
///
/// The access token is short-lived; `refresh_token` trades for a new pair.
/// Once a refresh fails the session is dead.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: UserId,
    pub access_token: String,
    pub refresh_token: String,
}

// Tokens stay out of logs and panic messages.
impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
