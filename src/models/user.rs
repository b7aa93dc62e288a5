// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{Field, ValidationError};
use crate::models::dog::{DogId, DogRecord};
use crate::validation::{check_dog, validate_email, validate_phone, validate_username};

/// Store-assigned user identifier (also used as the document key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User profile stored at `users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Owned dogs, in the order they were added.
    /// The Realtime Database drops empty arrays, so a missing key is empty.
    #[serde(default)]
    pub dogs: Vec<DogRecord>,
    /// Canonical email address
    pub email_address: String,
    pub id: UserId,
    /// Exactly nine ASCII digits
    pub phone_number: String,
    pub username: String,
}

impl UserRecord {
    /// Create a fresh record for a newly registered user.
    pub fn new(id: UserId, username: String, email_address: String, phone_number: String) -> Self {
        Self {
            dogs: Vec::new(),
            email_address,
            id,
            phone_number,
            username,
        }
    }

    pub fn dog(&self, id: &DogId) -> Option<&DogRecord> {
        self.dogs.iter().find(|d| &d.id == id)
    }

    pub fn dog_mut(&mut self, id: &DogId) -> Option<&mut DogRecord> {
        self.dogs.iter_mut().find(|d| &d.id == id)
    }

    /// Append a dog. Returns the dog back if its id is already taken.
    pub fn add_dog(&mut self, dog: DogRecord) -> Result<(), DogRecord> {
        if self.dog(&dog.id).is_some() {
            return Err(dog);
        }
        self.dogs.push(dog);
        Ok(())
    }

    /// Remove a dog by id, returning it if present.
    pub fn remove_dog(&mut self, id: &DogId) -> Option<DogRecord> {
        let index = self.dogs.iter().position(|d| &d.id == id)?;
        Some(self.dogs.remove(index))
    }

    /// Id of the first dog that shares its id with an earlier one.
    pub fn duplicate_dog_id(&self) -> Option<&DogId> {
        let mut seen = HashSet::new();
        self.dogs.iter().map(|d| &d.id).find(|id| !seen.insert(*id))
    }

    /// Re-run the field validators over stored values.
    ///
    /// Returns every violation so nothing invalid is flushed to the store.
    pub fn check(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Err(e) = validate_username(&self.username) {
            errors.push(e);
        }
        match validate_email(&self.email_address) {
            Ok(canonical) if canonical != self.email_address => {
                errors.push(ValidationError::InvalidFormat(Field::Email))
            }
            Ok(_) => {}
            Err(e) => errors.push(e),
        }
        if let Err(e) = validate_phone(&self.phone_number) {
            errors.push(e);
        }
        for dog in &self.dogs {
            errors.extend(check_dog(dog));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dog::Sex;

    fn dog(id: &str) -> DogRecord {
        DogRecord {
            age: 2,
            id: DogId::from(id),
            last_walked_at: None,
            name: "Growler".to_string(),
            race: "Shepherd".to_string(),
            sex: Sex::Male,
        }
    }

    fn user() -> UserRecord {
        UserRecord::new(
            UserId::from("123"),
            "Benson".to_string(),
            "test@gmail.com".to_string(),
            "509792751".to_string(),
        )
    }

    #[test]
    fn test_add_dog_rejects_duplicate_id() {
        let mut u = user();
        assert!(u.add_dog(dog("1")).is_ok());
        assert!(u.add_dog(dog("2")).is_ok());
        let rejected = u.add_dog(dog("1")).unwrap_err();
        assert_eq!(rejected.id, DogId::from("1"));
        assert_eq!(u.dogs.len(), 2);
        assert_eq!(u.duplicate_dog_id(), None);
    }

    #[test]
    fn test_remove_dog_keeps_order() {
        let mut u = user();
        for id in ["1", "2", "3"] {
            u.add_dog(dog(id)).unwrap();
        }
        let removed = u.remove_dog(&DogId::from("2")).unwrap();
        assert_eq!(removed.id, DogId::from("2"));
        let ids: Vec<&str> = u.dogs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(u.remove_dog(&DogId::from("2")).is_none());
    }

    #[test]
    fn test_check_collects_all_violations() {
        let mut u = user();
        assert!(u.check().is_empty());

        u.username = String::new();
        u.phone_number = "12".to_string();
        let mut bad = dog("1");
        bad.age = 0;
        u.dogs.push(bad);

        assert_eq!(u.check().len(), 3);
    }
}
