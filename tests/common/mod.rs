// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, TimeZone, Utc};
use dogout::config::Config;
use dogout::db::{FirebaseDb, MemoryStore};
use dogout::models::{DogId, DogRecord, Sex};
use dogout::services::AccountService;
use dogout::validation::{DogForm, LoginForm, RegistrationForm};

/// Check if the Firebase emulators are available via environment variables.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIREBASE_AUTH_EMULATOR_HOST").is_ok()
        && std::env::var("FIREBASE_DATABASE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIREBASE_*_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a client against the emulator suite.
#[allow(dead_code)]
pub fn test_db() -> FirebaseDb {
    FirebaseDb::new(&Config::default())
}

/// Create an account service over an empty in-memory store.
#[allow(dead_code)]
pub fn test_service() -> AccountService<MemoryStore> {
    AccountService::new(MemoryStore::new())
}

/// Email unique to this test run, for isolation in a shared emulator.
#[allow(dead_code)]
pub fn unique_email() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("walker{}@example.com", nanos)
}

#[allow(dead_code)]
pub fn registration_form(email: &str) -> RegistrationForm {
    RegistrationForm {
        username: "Benson".to_string(),
        email: email.to_string(),
        phone: "509792751".to_string(),
        password: "abcd1234".to_string(),
        password_repeat: "abcd1234".to_string(),
    }
}

#[allow(dead_code)]
pub fn login_form(email: &str) -> LoginForm {
    LoginForm {
        email: email.to_string(),
        password: "abcd1234".to_string(),
    }
}

#[allow(dead_code)]
pub fn dog_form(name: &str, sex: Sex) -> DogForm {
    DogForm {
        name: name.to_string(),
        race: "Husky".to_string(),
        age: "4".to_string(),
        sex,
    }
}

#[allow(dead_code)]
pub fn dog(id: &str, sex: Sex, last_walked_at: Option<DateTime<Utc>>) -> DogRecord {
    DogRecord {
        age: 4,
        id: DogId::from(id),
        last_walked_at,
        name: "Bernie".to_string(),
        race: "Husky".to_string(),
        sex,
    }
}

/// Fixed reference time for elapsed-time checks.
#[allow(dead_code)]
pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}
