// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DogOut: keep track of when each of your dogs was last taken out.
//!
//! This crate provides the domain model, form validation, record encoding
//! and store access behind the DogOut app. Users and their dogs live in a
//! hosted record store (Firebase) behind the [`db::RecordStore`] trait.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
pub mod validation;

pub use error::{AppError, Result};
