// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for validation, record encoding, and the record store.

use std::fmt;

/// Form input that a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Email,
    Phone,
    Password,
    DogName,
    DogRace,
    DogAge,
}

impl Field {
    /// Human label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Email => "email address",
            Field::Phone => "phone number",
            Field::Password => "password",
            Field::DogName => "dog name",
            Field::DogRace => "dog race",
            Field::DogAge => "dog age",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single rejected form field.
///
/// Validation errors are data, not failures: forms collect every one of
/// them so they can be shown together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty {0}")]
    EmptyField(Field),

    #[error("{}", invalid_message(.0))]
    InvalidFormat(Field),

    #[error("{}", mismatch_message(.0))]
    Mismatch(Field),
}

fn invalid_message(field: &Field) -> String {
    match field {
        Field::Password => "Invalid password pattern".to_string(),
        _ => format!("Invalid {}", field),
    }
}

fn mismatch_message(field: &Field) -> &'static str {
    match field {
        Field::Password => "Passwords don't match",
        _ => "Fields don't match",
    }
}

impl ValidationError {
    /// The field this error is about.
    pub fn field(&self) -> Field {
        match *self {
            ValidationError::EmptyField(f)
            | ValidationError::InvalidFormat(f)
            | ValidationError::Mismatch(f) => f,
        }
    }
}

/// Record (de)serialization failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Schema error: {0}")]
pub struct SchemaError(pub String);

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError(err.to_string())
    }
}

/// Failures reported by a [`crate::db::RecordStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Email address is already registered")]
    Conflict,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Record not found")]
    NotFound,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Application error type returned by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", join_validation(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn join_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationError>> for AppError {
    fn from(errors: Vec<ValidationError>) -> Self {
        AppError::Validation(errors)
    }
}

impl AppError {
    /// Validation errors carried by this error, if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            AppError::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Whether the store rejected the session or credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AppError::Store(StoreError::InvalidCredentials))
    }
}

/// Result type alias for account operations.
pub type Result<T> = std::result::Result<T, AppError>;
