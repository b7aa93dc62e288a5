// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and session lifecycle.
//!
//! A user record is created at registration, fetched at login, and then
//! mutated for the life of the session. Every mutation is flushed to the
//! store straight away; there is no local-only pending state.

use chrono::{DateTime, Utc};

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::models::{AuthSession, DogId, DogRecord, UserId, UserRecord};
use crate::validation::{DogForm, LoginForm, RegistrationForm};

/// A logged-in user and their record as last flushed.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    session: AuthSession,
    user: UserRecord,
}

impl ActiveSession {
    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    pub fn auth(&self) -> &AuthSession {
        &self.session
    }

    pub fn dogs(&self) -> &[DogRecord] {
        &self.user.dogs
    }
}

/// Registration, login and dog bookkeeping on top of a record store.
pub struct AccountService<S> {
    store: S,
}

impl<S: RecordStore> AccountService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate the registration form and create the account.
    pub async fn register(&self, form: &RegistrationForm) -> Result<UserId> {
        let registration = form.validate()?;
        let user_id = self
            .store
            .create_user(
                &registration.username,
                &registration.email,
                &registration.phone,
                &registration.password,
            )
            .await?;
        tracing::info!(user_id = %user_id, "Registration complete");
        Ok(user_id)
    }

    /// Validate the login form, sign in, and load the user's record.
    pub async fn login(&self, form: &LoginForm) -> Result<ActiveSession> {
        let credentials = form.validate()?;
        let session = self
            .store
            .authenticate(&credentials.email, &credentials.password)
            .await?;
        let user = self
            .store
            .fetch_user_by_email(&session, &credentials.email)
            .await?;
        tracing::info!(user_id = %user.id, dogs = user.dogs.len(), "Logged in");
        Ok(ActiveSession { session, user })
    }

    /// Exchange the refresh token for a new session.
    pub async fn refresh(&self, active: &mut ActiveSession) -> Result<()> {
        active.session = self.store.refresh_session(&active.session).await?;
        tracing::debug!(user_id = %active.user.id, "Session refreshed");
        Ok(())
    }

    /// Create a dog from the form and append it to the user's dogs.
    pub async fn add_dog(&self, active: &mut ActiveSession, form: &DogForm) -> Result<DogId> {
        let draft = form.validate()?;
        let dog = DogRecord::new(draft, form.sex)?;
        let dog_id = dog.id.clone();
        active.user.add_dog(dog).map_err(|dup| {
            AppError::Internal(anyhow::anyhow!("Generated duplicate dog id {}", dup.id))
        })?;

        self.flush(active).await?;
        tracing::info!(user_id = %active.user.id, dog_id = %dog_id, "Dog added");
        Ok(dog_id)
    }

    /// Remove a dog by id and return it.
    pub async fn remove_dog(
        &self,
        active: &mut ActiveSession,
        dog_id: &DogId,
    ) -> Result<DogRecord> {
        let dog = active
            .user
            .remove_dog(dog_id)
            .ok_or_else(|| AppError::NotFound(format!("Dog {} not found", dog_id)))?;

        self.flush(active).await?;
        tracing::info!(user_id = %active.user.id, dog_id = %dog_id, "Dog removed");
        Ok(dog)
    }

    /// Mark every listed dog as walked at `now`.
    ///
    /// Unknown ids reject the whole call before anything changes.
    pub async fn take_out(
        &self,
        active: &mut ActiveSession,
        dog_ids: &[DogId],
        now: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(missing) = dog_ids.iter().find(|id| active.user.dog(id).is_none()) {
            return Err(AppError::NotFound(format!("Dog {} not found", missing)));
        }

        for id in dog_ids {
            if let Some(dog) = active.user.dog_mut(id) {
                dog.mark_walked(now);
            }
        }

        self.flush(active).await?;
        tracing::info!(
            user_id = %active.user.id,
            count = dog_ids.len(),
            "Dogs taken out"
        );
        Ok(())
    }

    /// Write the in-memory record back to the store.
    ///
    /// On failure the local change is kept and the record is left diverged
    /// from the store; the caller decides whether to retry or log back in.
    async fn flush(&self, active: &ActiveSession) -> Result<()> {
        let errors = active.user.check();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if let Err(e) = self.store.replace_user(&active.session, &active.user).await {
            tracing::warn!(
                user_id = %active.user.id,
                error = %e,
                "Failed to flush user record; local copy has diverged"
            );
            return Err(e.into());
        }
        Ok(())
    }
}
