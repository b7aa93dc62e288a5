// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process record store.
//!
//! Behaves like the hosted store for everything the app observes: accounts
//! keyed by email, salted password digests, bearer tokens scoped to one user,
//! and whole-record overwrites. Used by tests and for offline runs.
//!
//! Each user keeps at most a fixed number of live sessions; logging in again
//! past that revokes the oldest one.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use subtle::ConstantTimeEq;

use crate::db::RecordStore;
use crate::error::StoreError;
use crate::models::{AuthSession, UserId, UserRecord};

const TOKEN_BYTES: usize = 32;
const SALT_BYTES: usize = 16;
/// Live sessions kept per user; the oldest is revoked past this.
const MAX_SESSIONS_PER_USER: usize = 8;

/// Stored login for one email address.
struct Account {
    user_id: UserId,
    salt: [u8; SALT_BYTES],
    digest: [u8; 32],
}

fn password_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Store backed by concurrent in-memory maps.
pub struct MemoryStore {
    rng: SystemRandom,
    accounts: DashMap<String, Account>,
    users: DashMap<UserId, UserRecord>,
    access_tokens: DashMap<String, UserId>,
    refresh_tokens: DashMap<String, UserId>,
    /// (access, refresh) pairs per user, oldest first
    sessions: DashMap<UserId, VecDeque<(String, String)>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
            accounts: DashMap::new(),
            users: DashMap::new(),
            access_tokens: DashMap::new(),
            refresh_tokens: DashMap::new(),
            sessions: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate a transport outage: every call fails with `Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Expire a session's access token, as the hosted store does after an hour.
    pub fn expire_access_token(&self, session: &AuthSession) {
        self.access_tokens.remove(&session.access_token);
    }

    /// Stored copy of a user record, bypassing authentication.
    pub fn stored_user(&self, id: &UserId) -> Option<UserRecord> {
        self.users.get(id).map(|r| r.value().clone())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        }
    }

    fn random_bytes<const N: usize>(&self) -> Result<[u8; N], StoreError> {
        let mut bytes = [0u8; N];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| StoreError::Unavailable("RNG failure".to_string()))?;
        Ok(bytes)
    }

    fn issue_session(&self, user_id: UserId) -> Result<AuthSession, StoreError> {
        let access_token = hex::encode(self.random_bytes::<TOKEN_BYTES>()?);
        let refresh_token = hex::encode(self.random_bytes::<TOKEN_BYTES>()?);
        self.access_tokens.insert(access_token.clone(), user_id.clone());
        self.refresh_tokens.insert(refresh_token.clone(), user_id.clone());

        let mut live = self.sessions.entry(user_id.clone()).or_default();
        live.push_back((access_token.clone(), refresh_token.clone()));
        while live.len() > MAX_SESSIONS_PER_USER {
            if let Some((access, refresh)) = live.pop_front() {
                self.access_tokens.remove(&access);
                self.refresh_tokens.remove(&refresh);
            }
        }
        drop(live);

        Ok(AuthSession {
            user_id,
            access_token,
            refresh_token,
        })
    }

    /// Resolve the user an access token belongs to.
    fn authorize(&self, session: &AuthSession) -> Result<UserId, StoreError> {
        match self.access_tokens.get(&session.access_token) {
            Some(owner) if *owner == session.user_id => Ok(owner.clone()),
            _ => Err(StoreError::InvalidCredentials),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        phone: &str,
        password: &str,
    ) -> Result<UserId, StoreError> {
        self.ensure_available()?;
        let user_id = UserId::from(hex::encode(self.random_bytes::<16>()?));
        let salt = self.random_bytes::<SALT_BYTES>()?;

        match self.accounts.entry(email.to_string()) {
            Entry::Occupied(_) => return Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(Account {
                    user_id: user_id.clone(),
                    salt,
                    digest: password_digest(&salt, password),
                });
            }
        }

        let record = UserRecord::new(
            user_id.clone(),
            username.to_string(),
            email.to_string(),
            phone.to_string(),
        );
        self.users.insert(user_id.clone(), record);

        tracing::debug!(user_id = %user_id, "Created user in memory store");
        Ok(user_id)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        self.ensure_available()?;
        let user_id = {
            let account = self
                .accounts
                .get(email)
                .ok_or(StoreError::InvalidCredentials)?;
            let digest = password_digest(&account.salt, password);
            if !bool::from(digest[..].ct_eq(&account.digest[..])) {
                return Err(StoreError::InvalidCredentials);
            }
            account.user_id.clone()
        };
        self.issue_session(user_id)
    }

    async fn fetch_user_by_email(
        &self,
        session: &AuthSession,
        email: &str,
    ) -> Result<UserRecord, StoreError> {
        self.ensure_available()?;
        self.authorize(session)?;
        self.users
            .iter()
            .find(|entry| entry.value().email_address == email)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn replace_user(
        &self,
        session: &AuthSession,
        record: &UserRecord,
    ) -> Result<(), StoreError> {
        self.ensure_available()?;
        let owner = self.authorize(session)?;
        if owner != record.id {
            return Err(StoreError::InvalidCredentials);
        }
        self.users.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn refresh_session(&self, session: &AuthSession) -> Result<AuthSession, StoreError> {
        self.ensure_available()?;
        let (_, owner) = self
            .refresh_tokens
            .remove(&session.refresh_token)
            .ok_or(StoreError::InvalidCredentials)?;
        if owner != session.user_id {
            return Err(StoreError::InvalidCredentials);
        }
        self.access_tokens.remove(&session.access_token);
        if let Some(mut live) = self.sessions.get_mut(&owner) {
            live.retain(|(_, refresh)| *refresh != session.refresh_token);
        }
        self.issue_session(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn registered(store: &MemoryStore) -> UserId {
        store
            .create_user("Benson", "test@gmail.com", "509792751", "abcd1234")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        registered(&store).await;
        let err = store
            .create_user("Other", "test@gmail.com", "123456789", "zzzz9999")
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Conflict);
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_authenticate_checks_password() {
        let store = MemoryStore::new();
        let user_id = registered(&store).await;

        let session = store.authenticate("test@gmail.com", "abcd1234").await.unwrap();
        assert_eq!(session.user_id, user_id);
        assert_ne!(session.access_token, session.refresh_token);

        assert_eq!(
            store.authenticate("test@gmail.com", "wrong-pass").await,
            Err(StoreError::InvalidCredentials)
        );
        assert_eq!(
            store.authenticate("nobody@gmail.com", "abcd1234").await,
            Err(StoreError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_session_cannot_overwrite_other_user() {
        let store = MemoryStore::new();
        registered(&store).await;
        let other = store
            .create_user("Eve", "eve@gmail.com", "111111111", "evepass1")
            .await
            .unwrap();
        let session = store.authenticate("test@gmail.com", "abcd1234").await.unwrap();

        let mut victim = store.stored_user(&other).unwrap();
        victim.username = "pwned".to_string();
        assert_eq!(
            store.replace_user(&session, &victim).await,
            Err(StoreError::InvalidCredentials)
        );
        assert_eq!(store.stored_user(&other).unwrap().username, "Eve");
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let store = MemoryStore::new();
        registered(&store).await;
        let session = store.authenticate("test@gmail.com", "abcd1234").await.unwrap();
        store.expire_access_token(&session);

        assert_eq!(
            store.fetch_user_by_email(&session, "test@gmail.com").await,
            Err(StoreError::InvalidCredentials)
        );

        let renewed = store.refresh_session(&session).await.unwrap();
        assert!(store
            .fetch_user_by_email(&renewed, "test@gmail.com")
            .await
            .is_ok());

        // Refresh tokens are single use
        assert_eq!(
            store.refresh_session(&session).await,
            Err(StoreError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_oldest_session_revoked_past_limit() {
        let store = MemoryStore::new();
        registered(&store).await;

        let first = store.authenticate("test@gmail.com", "abcd1234").await.unwrap();
        let mut latest = first.clone();
        for _ in 0..MAX_SESSIONS_PER_USER {
            latest = store.authenticate("test@gmail.com", "abcd1234").await.unwrap();
        }

        assert_eq!(store.access_tokens.len(), MAX_SESSIONS_PER_USER);
        assert_eq!(store.refresh_tokens.len(), MAX_SESSIONS_PER_USER);
        assert_eq!(
            store.fetch_user_by_email(&first, "test@gmail.com").await,
            Err(StoreError::InvalidCredentials)
        );
        assert_eq!(
            store.refresh_session(&first).await,
            Err(StoreError::InvalidCredentials)
        );
        assert!(store
            .fetch_user_by_email(&latest, "test@gmail.com")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_refresh_does_not_grow_token_maps() {
        let store = MemoryStore::new();
        registered(&store).await;
        let mut session = store.authenticate("test@gmail.com", "abcd1234").await.unwrap();
        for _ in 0..3 {
            session = store.refresh_session(&session).await.unwrap();
        }
        assert_eq!(store.access_tokens.len(), 1);
        assert_eq!(store.refresh_tokens.len(), 1);
        assert_eq!(store.sessions.get(&session.user_id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_store_is_unavailable() {
        let store = MemoryStore::new();
        store.set_available(false);
        assert!(matches!(
            store.authenticate("test@gmail.com", "abcd1234").await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
