//! Defaulting and coercion of raw stored records into [`Company`] values.
//!
//! Storage holds loosely typed JSON: records written by older clients may
//! lack fields, carry numbers as strings, or hold a non-array log. Every
//! read goes through [`normalize`], which merges the raw fields over
//! [`Company::base`] so that a company is either absent or complete.
//!
//! # Coercion rules
//!
//! | Field kind | Accepted | Otherwise |
//! |------------|----------|-----------|
//! | counters, money | JSON numbers and numeric strings; fractions truncated, negatives clamped to 0 | default |
//! | `level` | as counters, then raised to at least 1 | 1 |
//! | timestamps | as counters (epoch ms) | 0 |
//! | `owner` | non-empty string | the lookup key |
//! | `name`, `password` | strings | empty |
//! | `log` | arrays; non-string entries stringified, truncated to [`LOG_CAPACITY`] | empty |

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::company::{Company, STARTING_LEVEL};
use crate::log::LOG_CAPACITY;

/// Normalize a raw stored record for `owner`.
///
/// Returns `None` when the record is absent (or JSON `null`). Any other
/// value yields a fully defaulted [`Company`]; a present value that is not
/// a JSON object yields the base company.
///
/// `normalize` is idempotent: normalizing the serialized output of a
/// previous normalization returns the same company.
pub fn normalize(raw: Option<&Value>, owner: &str) -> Option<Company> {
    let raw = raw?;
    if raw.is_null() {
        return None;
    }

    let base = Company::base(owner);
    let Value::Object(fields) = raw else {
        return Some(base);
    };

    let owner = fields
        .get("owner")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map_or(base.owner, str::to_owned);

    Some(Company {
        owner,
        name: string_field(fields, "name", base.name),
        password: string_field(fields, "password", base.password),
        money: coerce_u64(fields.get("money")).unwrap_or(base.money),
        guards: u32_field(fields, "guards", base.guards),
        operatives: u32_field(fields, "operatives", base.operatives),
        security: u32_field(fields, "security", base.security),
        intel: u32_field(fields, "intel", base.intel),
        heat: u32_field(fields, "heat", base.heat),
        level: u32_field(fields, "level", base.level).max(STARTING_LEVEL),
        xp: u32_field(fields, "xp", base.xp),
        next_heist_at: timestamp_field(fields, "nextHeistAt", base.next_heist_at),
        last_daily_at: timestamp_field(fields, "lastDailyAt", base.last_daily_at),
        log: log_field(fields.get("log")),
    })
}

/// Normalize every record of a raw `owner -> record` collection.
///
/// Entries that normalize to `None` are dropped.
pub fn normalize_collection(raw: &Map<String, Value>) -> BTreeMap<String, Company> {
    raw.iter()
        .filter_map(|(owner, value)| {
            normalize(Some(value), owner).map(|company| (owner.clone(), company))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn string_field(fields: &Map<String, Value>, key: &str, default: String) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map_or(default, str::to_owned)
}

fn u32_field(fields: &Map<String, Value>, key: &str, default: u32) -> u32 {
    coerce_u64(fields.get(key)).map_or(default, |v| u32::try_from(v).unwrap_or(u32::MAX))
}

fn timestamp_field(fields: &Map<String, Value>, key: &str, default: i64) -> i64 {
    coerce_u64(fields.get(key)).map_or(default, |v| i64::try_from(v).unwrap_or(i64::MAX))
}

fn log_field(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .take(LOG_CAPACITY)
        .map(|entry| match entry {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

/// Parse a JSON number or numeric string into a non-negative integer.
///
/// Returns `None` when the value is missing or not numeric.
fn coerce_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|_| 0))
            .or_else(|| n.as_f64().and_then(float_to_u64)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(float_to_u64),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_u64(f: f64) -> Option<u64> {
    if !f.is_finite() {
        return None;
    }
    if f <= 0.0 {
        return Some(0);
    }
    // `as` saturates at u64::MAX for out-of-range floats.
    Some(f.trunc() as u64)
}
