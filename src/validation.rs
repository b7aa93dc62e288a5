// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Form input validation.
//!
//! Field validators turn raw text into typed values or a single
//! [`ValidationError`]. Form-level `validate()` runs every field validator
//! and returns all errors in field order, never stopping at the first.

use validator::ValidateEmail;

use crate::error::{Field, ValidationError};
use crate::models::{DogRecord, Sex};

const PHONE_DIGITS: usize = 9;
const MIN_PASSWORD_LEN: usize = 8;

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Username must not be blank. Returned unchanged.
pub fn validate_username(text: &str) -> Result<String, ValidationError> {
    if is_blank(text) {
        return Err(ValidationError::EmptyField(Field::Username));
    }
    Ok(text.to_string())
}

/// Check email syntax and return the canonical address.
///
/// Canonical form trims surrounding whitespace and lowercases the domain.
pub fn validate_email(text: &str) -> Result<String, ValidationError> {
    if is_blank(text) {
        return Err(ValidationError::EmptyField(Field::Email));
    }
    let trimmed = text.trim();
    if !trimmed.validate_email() {
        return Err(ValidationError::InvalidFormat(Field::Email));
    }
    // validate_email guarantees exactly one separating '@'
    match trimmed.rsplit_once('@') {
        Some((local, domain)) => Ok(format!("{}@{}", local, domain.to_lowercase())),
        None => Err(ValidationError::InvalidFormat(Field::Email)),
    }
}

/// Phone number must be exactly nine ASCII digits. Returned unchanged.
pub fn validate_phone(text: &str) -> Result<String, ValidationError> {
    if is_blank(text) {
        return Err(ValidationError::EmptyField(Field::Phone));
    }
    if text.len() != PHONE_DIGITS || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat(Field::Phone));
    }
    Ok(text.to_string())
}

fn is_password_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "@#$%^&+=".contains(c)
}

/// Registration password: present, repeated identically, and at least eight
/// characters from `[A-Za-z0-9@#$%^&+=]`.
pub fn validate_password(text: &str, repeat: &str) -> Result<String, ValidationError> {
    if is_blank(text) {
        return Err(ValidationError::EmptyField(Field::Password));
    }
    if text != repeat {
        return Err(ValidationError::Mismatch(Field::Password));
    }
    if text.chars().count() < MIN_PASSWORD_LEN || !text.chars().all(is_password_char) {
        return Err(ValidationError::InvalidFormat(Field::Password));
    }
    Ok(text.to_string())
}

/// Login password: only checked for presence.
pub fn validate_login_password(text: &str) -> Result<String, ValidationError> {
    if is_blank(text) {
        return Err(ValidationError::EmptyField(Field::Password));
    }
    Ok(text.to_string())
}

/// Validated dog details, ready to become a [`DogRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogDraft {
    pub name: String,
    pub race: String,
    pub age: u32,
}

fn parse_age(text: &str) -> Result<u32, ValidationError> {
    match text.trim().parse::<u32>() {
        Ok(age) if age > 0 => Ok(age),
        _ => Err(ValidationError::InvalidFormat(Field::DogAge)),
    }
}

/// Validate dog fields, reporting the first blank field in name/race/age order.
pub fn validate_dog_fields(
    name: &str,
    race: &str,
    age_text: &str,
) -> Result<DogDraft, ValidationError> {
    for (text, field) in [
        (name, Field::DogName),
        (race, Field::DogRace),
        (age_text, Field::DogAge),
    ] {
        if is_blank(text) {
            return Err(ValidationError::EmptyField(field));
        }
    }
    Ok(DogDraft {
        name: name.to_string(),
        race: race.to_string(),
        age: parse_age(age_text)?,
    })
}

/// Re-check a stored dog against the form rules.
pub fn check_dog(dog: &DogRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if is_blank(&dog.name) {
        errors.push(ValidationError::EmptyField(Field::DogName));
    }
    if is_blank(&dog.race) {
        errors.push(ValidationError::EmptyField(Field::DogRace));
    }
    if dog.age == 0 {
        errors.push(ValidationError::InvalidFormat(Field::DogAge));
    }
    errors
}

/// Push the error or keep the value.
fn collect<T>(result: Result<T, ValidationError>, errors: &mut Vec<ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

// ─── Forms ───────────────────────────────────────────────────

/// Raw registration form input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password_repeat: String,
}

/// Registration details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl RegistrationForm {
    /// Validate every field; errors come back in username, email, phone,
    /// password order.
    pub fn validate(&self) -> Result<Registration, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let username = collect(validate_username(&self.username), &mut errors);
        let email = collect(validate_email(&self.email), &mut errors);
        let phone = collect(validate_phone(&self.phone), &mut errors);
        let password = collect(
            validate_password(&self.password, &self.password_repeat),
            &mut errors,
        );

        match (username, email, phone, password) {
            (Some(username), Some(email), Some(phone), Some(password)) => Ok(Registration {
                username,
                email,
                phone,
                password,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw login form input.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let email = collect(validate_email(&self.email), &mut errors);
        let password = collect(validate_login_password(&self.password), &mut errors);

        match (email, password) {
            (Some(email), Some(password)) => Ok(Credentials { email, password }),
            _ => Err(errors),
        }
    }
}

/// Raw "add dog" form input. Sex comes from a toggle, so it is already typed.
#[derive(Debug, Clone)]
pub struct DogForm {
    pub name: String,
    pub race: String,
    pub age: String,
    pub sex: Sex,
}

impl DogForm {
    pub fn validate(&self) -> Result<DogDraft, Vec<ValidationError>> {
        validate_dog_fields(&self.name, &self.race, &self.age).map_err(|e| vec![e])
    }
}
