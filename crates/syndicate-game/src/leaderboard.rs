//! Net worth and the leaderboard projection.
//!
//! Read-only: nothing here mutates a company.

use std::collections::BTreeMap;

use serde::Serialize;
use syndicate_types::Company;

use crate::actions::display_name;

/// Net worth contribution of each guard.
pub const GUARD_WORTH: u64 = 30;

/// Net worth contribution of each operative.
pub const OPERATIVE_WORTH: u64 = 45;

/// Net worth contribution of each security point.
pub const SECURITY_WORTH: u64 = 25;

/// Net worth contribution of each level.
pub const LEVEL_WORTH: u64 = 100;

/// `money + guards*30 + operatives*45 + security*25 + level*100`.
pub fn net_worth(company: &Company) -> u64 {
    company
        .money
        .saturating_add(u64::from(company.guards).saturating_mul(GUARD_WORTH))
        .saturating_add(u64::from(company.operatives).saturating_mul(OPERATIVE_WORTH))
        .saturating_add(u64::from(company.security).saturating_mul(SECURITY_WORTH))
        .saturating_add(u64::from(company.level).saturating_mul(LEVEL_WORTH))
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    /// Owner key.
    pub owner: String,
    /// Display name (owner when unnamed).
    pub name: String,
    /// Computed net worth.
    pub net_worth: u64,
    /// Whether this row is the viewer's own company.
    pub is_self: bool,
}

/// Rank every company by net worth, highest first.
///
/// Ties are broken by owner key so the order is stable across clients.
pub fn leaderboard(
    companies: &BTreeMap<String, Company>,
    viewer: Option<&str>,
) -> Vec<LeaderboardEntry> {
    let mut rows: Vec<(&String, &Company, u64)> = companies
        .iter()
        .map(|(owner, company)| (owner, company, net_worth(company)))
        .collect();
    rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));

    rows.into_iter()
        .enumerate()
        .map(|(i, (owner, company, worth))| LeaderboardEntry {
            rank: i.saturating_add(1),
            owner: owner.clone(),
            name: display_name(company).to_owned(),
            net_worth: worth,
            is_self: viewer == Some(owner.as_str()),
        })
        .collect()
}
