// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - account and session logic.

pub mod account;

pub use account::{AccountService, ActiveSession};
