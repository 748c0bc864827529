//! The company record: one per player, keyed by the owner's login name.
//!
//! Field names are serialized in camelCase so the persisted layout is
//! `companies[owner] -> { owner, name, password, money, ..., nextHeistAt,
//! lastDailyAt, log }` for both storage backends.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Money a freshly created company starts with.
pub const STARTING_MONEY: u64 = 100;

/// Level a freshly created company starts at (also the minimum level).
pub const STARTING_LEVEL: u32 = 1;

// ---------------------------------------------------------------------------
// Company
// ---------------------------------------------------------------------------

/// Per-player game state.
///
/// A value of this type is always fully defaulted: partial records coming
/// out of storage go through [`normalize`](crate::normalize::normalize)
/// before they become a `Company`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Company {
    /// Login name of the owning player. Never changes after creation.
    pub owner: String,
    /// Display name.
    pub name: String,
    /// Plaintext company password. Not a security credential.
    pub password: String,
    /// Primary resource.
    #[ts(type = "number")]
    pub money: u64,
    /// Defensive headcount.
    pub guards: u32,
    /// Offensive headcount, required for missions and heists.
    pub operatives: u32,
    /// Static defense rating.
    pub security: u32,
    /// Consumed by espionage and heists.
    pub intel: u32,
    /// Risk accumulator; lowers mission odds.
    pub heat: u32,
    /// Current level (at least 1).
    pub level: u32,
    /// Experience toward the next level.
    pub xp: u32,
    /// Epoch milliseconds before which no heist may start.
    #[ts(type = "number")]
    pub next_heist_at: i64,
    /// Epoch milliseconds of the last claimed daily bonus.
    #[ts(type = "number")]
    pub last_daily_at: i64,
    /// Activity log, most recent entry first.
    pub log: Vec<String>,
}

impl Company {
    /// The default record for `owner`: 100 money, level 1, everything else
    /// zero or empty.
    pub fn base(owner: &str) -> Self {
        Self {
            owner: owner.to_owned(),
            name: String::new(),
            password: String::new(),
            money: STARTING_MONEY,
            guards: 0,
            operatives: 0,
            security: 0,
            intel: 0,
            heat: 0,
            level: STARTING_LEVEL,
            xp: 0,
            next_heist_at: 0,
            last_daily_at: 0,
            log: Vec::new(),
        }
    }
}

/// Construct the default company for `owner`.
pub fn base_company(owner: &str) -> Company {
    Company::base(owner)
}
