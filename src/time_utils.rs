// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::Sex;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `"1 minute"`, `"2 minutes"`; only values above one take the plural.
fn units(value: i64, unit: &str) -> String {
    if value > 1 {
        format!("{} {}s", value, unit)
    } else {
        format!("{} {}", value, unit)
    }
}

/// Describe how recently a dog was walked, e.g. "She was last out 2 minutes ago".
///
/// `None` means the dog has never been walked. A walk time after `now`
/// (clock skew between devices) counts as just now.
pub fn describe_last_walk(
    sex: Sex,
    last_walked_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    let pronoun = sex.pronoun();
    let Some(walked_at) = last_walked_at else {
        return format!("{} was never out yet!", pronoun);
    };

    let delta = (now - walked_at).num_seconds().max(0);
    let hours = delta / 3600;
    let minutes = (delta % 3600) / 60;

    let phrase = match (hours, minutes) {
        (0, 0) => "was just taken out!".to_string(),
        (0, m) => format!("was last out {} ago", units(m, "minute")),
        (h, m) => format!(
            "was last out {} and {} ago",
            units(h, "hour"),
            units(m, "minute")
        ),
    };
    format!("{} {}", pronoun, phrase)
}
