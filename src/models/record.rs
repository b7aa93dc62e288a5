// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Canonical JSON encoding for stored records.
//!
//! Records go through `serde_json::Value`, whose object map is ordered by key,
//! so output always has sorted field names. Canonical text is the pretty form
//! with two-space indentation.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::models::{DogRecord, UserRecord};

/// A record with a canonical JSON form.
pub trait JsonRecord: Serialize + DeserializeOwned {
    /// Invariants that the type system cannot express.
    fn check_shape(&self) -> Result<(), SchemaError> {
        Ok(())
    }

    /// Encode as a JSON value with sorted keys.
    fn to_value(&self) -> Result<Value, SchemaError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode from a JSON value.
    fn from_value(value: Value) -> Result<Self, SchemaError> {
        let record: Self = serde_json::from_value(value)?;
        record.check_shape()?;
        Ok(record)
    }

    /// Encode as canonical JSON text.
    fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    /// Decode from JSON text.
    fn from_json(raw: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }
}

impl JsonRecord for DogRecord {
    fn check_shape(&self) -> Result<(), SchemaError> {
        if self.age == 0 {
            return Err(SchemaError(format!("dog {} has non-positive age", self.id)));
        }
        Ok(())
    }
}

impl JsonRecord for UserRecord {
    fn check_shape(&self) -> Result<(), SchemaError> {
        if let Some(id) = self.duplicate_dog_id() {
            return Err(SchemaError(format!("duplicate dog id: {}", id)));
        }
        self.dogs.iter().try_for_each(DogRecord::check_shape)
    }
}
