// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dog model owned by a user record.

use chrono::{DateTime, SubsecRound, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time_utils::describe_last_walk;
use crate::validation::DogDraft;

/// Client-generated dog identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DogId(String);

impl DogId {
    /// Generate a random 128-bit identifier, hex encoded.
    pub fn generate() -> anyhow::Result<Self> {
        let mut bytes = [0u8; 16];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| anyhow::anyhow!("System RNG failure"))?;
        Ok(Self(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DogId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for DogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Dog sex, stored as its lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Subject pronoun used in walk status sentences.
    pub fn pronoun(self) -> &'static str {
        match self {
            Sex::Female => "She",
            Sex::Male => "He",
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Sex::Female),
            "male" | "m" => Ok(Sex::Male),
            other => Err(format!("unknown sex '{}'", other)),
        }
    }
}

/// Dog record stored inside its owner's user document.
///
/// Fields are declared in key order; see [`crate::models::JsonRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DogRecord {
    /// Age in whole years (always positive)
    pub age: u32,
    /// Client-generated identifier
    pub id: DogId,
    /// Last walk time; `None` means never walked (stored as `0`)
    #[serde(default, with = "epoch_seconds")]
    pub last_walked_at: Option<DateTime<Utc>>,
    /// Dog's name
    pub name: String,
    /// Breed label, free text
    pub race: String,
    pub sex: Sex,
}

impl DogRecord {
    /// Create a never-walked dog from validated form input.
    pub fn new(draft: DogDraft, sex: Sex) -> anyhow::Result<Self> {
        Ok(Self {
            age: draft.age,
            id: DogId::generate()?,
            last_walked_at: None,
            name: draft.name,
            race: draft.race,
            sex,
        })
    }

    /// Record a walk at `now`. Never moves the timestamp backwards.
    ///
    /// Stored in whole seconds, the same resolution the record is encoded at.
    pub fn mark_walked(&mut self, now: DateTime<Utc>) {
        let now = now.trunc_subsecs(0);
        self.last_walked_at = Some(match self.last_walked_at {
            Some(previous) if previous > now => previous,
            _ => now,
        });
    }

    /// Sentence describing how long ago this dog was walked.
    pub fn walk_status(&self, now: DateTime<Utc>) -> String {
        describe_last_walk(self.sex, self.last_walked_at, now)
    }
}

/// Serde adapter for walk timestamps: epoch seconds, `0` for "never".
mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.map(|t| t.timestamp()).unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<i64>::deserialize(deserializer)? {
            None | Some(0) => Ok(None),
            Some(secs) => DateTime::from_timestamp(secs, 0)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", secs))),
        }
    }
}
