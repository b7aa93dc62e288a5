// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase integration tests.
//!
//! These tests require the Firebase Auth and Realtime Database emulators:
//!
//!   firebase emulators:start --only auth,database --project demo-dogout
//!   FIREBASE_AUTH_EMULATOR_HOST=127.0.0.1:9099 \
//!   FIREBASE_DATABASE_EMULATOR_HOST=127.0.0.1:9000 cargo test --test firebase_integration
//!
//! The database rules must index `users` on `email_address`.

use dogout::db::RecordStore;
use dogout::error::StoreError;
use dogout::models::Sex;

mod common;
use common::{dog, noon, test_db, unique_email};

#[tokio::test]
async fn test_create_and_fetch_user() {
    require_emulator!();
    let db = test_db();
    let email = unique_email();

    let user_id = db
        .create_user("Benson", &email, "509792751", "abcd1234")
        .await
        .unwrap();
    let session = db.authenticate(&email, "abcd1234").await.unwrap();
    assert_eq!(session.user_id, user_id);

    let user = db.fetch_user_by_email(&session, &email).await.unwrap();
    assert_eq!(user.id, user_id);
    assert_eq!(user.username, "Benson");
    assert_eq!(user.email_address, email);
    assert!(user.dogs.is_empty());
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    require_emulator!();
    let db = test_db();
    let email = unique_email();

    db.create_user("Benson", &email, "509792751", "abcd1234")
        .await
        .unwrap();
    let err = db
        .create_user("Benson", &email, "509792751", "abcd1234")
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::Conflict);
}

#[tokio::test]
async fn test_wrong_password() {
    require_emulator!();
    let db = test_db();
    let email = unique_email();

    db.create_user("Benson", &email, "509792751", "abcd1234")
        .await
        .unwrap();
    let err = db.authenticate(&email, "not-the-password").await.unwrap_err();
    assert_eq!(err, StoreError::InvalidCredentials);
}

#[tokio::test]
async fn test_replace_user_round_trip() {
    require_emulator!();
    let db = test_db();
    let email = unique_email();

    db.create_user("Benson", &email, "509792751", "abcd1234")
        .await
        .unwrap();
    let session = db.authenticate(&email, "abcd1234").await.unwrap();
    let mut user = db.fetch_user_by_email(&session, &email).await.unwrap();

    user.dogs.push(dog("d1", Sex::Female, Some(noon())));
    user.dogs.push(dog("d2", Sex::Male, None));
    db.replace_user(&session, &user).await.unwrap();
    db.replace_user(&session, &user).await.unwrap();

    let fetched = db.fetch_user_by_email(&session, &email).await.unwrap();
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn test_refresh_session() {
    require_emulator!();
    let db = test_db();
    let email = unique_email();

    db.create_user("Benson", &email, "509792751", "abcd1234")
        .await
        .unwrap();
    let session = db.authenticate(&email, "abcd1234").await.unwrap();
    let refreshed = db.refresh_session(&session).await.unwrap();
    assert_eq!(refreshed.user_id, session.user_id);
    assert!(db.fetch_user_by_email(&refreshed, &email).await.is_ok());
}
