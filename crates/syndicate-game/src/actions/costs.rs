//! Prices, rewards, and cooldowns for each action.
//!
//! All money and XP values are integers. The only floating point in the
//! engine lives in the mission and heist probability formulas.

use syndicate_types::Company;

use crate::error::Rejection;

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// Price of hiring one guard.
pub const GUARD_COST: u64 = 50;

/// Price of training one operative.
pub const OPERATIVE_COST: u64 = 80;

/// Price of one security upgrade.
pub const SECURITY_UPGRADE_COST: u64 = 120;

/// Price of laying low.
pub const LAY_LOW_COST: u64 = 30;

/// Most a successful sabotage can take from its target.
pub const SABOTAGE_MAX_STEAL: u64 = 40;

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

/// Flat part of collected income.
pub const INCOME_BASE: u64 = 20;

/// Income added per company level.
pub const INCOME_PER_LEVEL: u64 = 5;

/// Money paid by the daily bonus.
pub const DAILY_BONUS_MONEY: u64 = 150;

/// Intel granted by the daily bonus.
pub const DAILY_BONUS_INTEL: u32 = 1;

/// Security gained per upgrade.
pub const SECURITY_PER_UPGRADE: u32 = 2;

// ---------------------------------------------------------------------------
// XP awards
// ---------------------------------------------------------------------------

/// XP for claiming the daily bonus.
pub const XP_DAILY: u32 = 15;

/// XP for collecting income.
pub const XP_INCOME: u32 = 5;

/// XP for hiring a guard.
pub const XP_HIRE_GUARD: u32 = 8;

/// XP for training an operative.
pub const XP_TRAIN_OPERATIVE: u32 = 10;

/// XP for upgrading security.
pub const XP_UPGRADE_SECURITY: u32 = 12;

/// XP for a successful mission.
pub const XP_MISSION_SUCCESS: u32 = 18;

/// XP for a failed mission.
pub const XP_MISSION_FAILURE: u32 = 6;

/// XP for a successful heist.
pub const XP_HEIST_SUCCESS: u32 = 25;

/// XP for a failed heist.
pub const XP_HEIST_FAILURE: u32 = 8;

// ---------------------------------------------------------------------------
// Heat
// ---------------------------------------------------------------------------

/// Heat from collecting income.
pub const HEAT_INCOME: u32 = 1;

/// Heat from a successful mission.
pub const HEAT_MISSION_SUCCESS: u32 = 4;

/// Heat from a failed mission.
pub const HEAT_MISSION_FAILURE: u32 = 8;

/// Heat from a successful heist.
pub const HEAT_HEIST_SUCCESS: u32 = 10;

/// Heat from a failed heist.
pub const HEAT_HEIST_FAILURE: u32 = 12;

/// Heat shed by laying low.
pub const LAY_LOW_HEAT_REDUCTION: u32 = 10;

// ---------------------------------------------------------------------------
// Cooldowns (milliseconds)
// ---------------------------------------------------------------------------

/// Time between daily bonus claims.
pub const DAILY_COOLDOWN_MS: i64 = 12 * 60 * 60 * 1_000;

/// Time between heists.
pub const HEIST_COOLDOWN_MS: i64 = 60 * 1_000;

/// Check that `company` can pay `cost`.
pub fn require_money(company: &Company, cost: u64) -> Result<(), Rejection> {
    if company.money < cost {
        return Err(Rejection::InsufficientMoney {
            needed: cost,
            available: company.money,
        });
    }
    Ok(())
}

/// Income paid at `level`: `20 + level * 5`.
pub const fn income_for_level(level: u32) -> u64 {
    // u32 -> u64 is lossless; `From` is not const.
    INCOME_BASE.saturating_add(INCOME_PER_LEVEL.saturating_mul(level as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_grows_with_level() {
        assert_eq!(income_for_level(1), 25);
        assert_eq!(income_for_level(4), 40);
    }

    #[test]
    fn require_money_boundary() {
        let mut c = Company::base("x");
        c.money = 49;
        assert!(require_money(&c, GUARD_COST).is_err());
        c.money = 50;
        assert!(require_money(&c, GUARD_COST).is_ok());
    }
}
