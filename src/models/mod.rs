// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod dog;
pub mod record;
pub mod session;
pub mod user;

pub use dog::{DogId, DogRecord, Sex};
pub use record::JsonRecord;
pub use session::AuthSession;
pub use user::{UserId, UserRecord};
