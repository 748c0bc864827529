//! Experience and level-up mechanics.
//!
//! # Level-Up Formula
//!
//! XP required to advance from level N to level N+1 is `N * 40`. Each
//! level-up consumes its threshold, raises the level by one, pays a
//! [`LEVEL_UP_BONUS`] and writes a log line. A single large grant can
//! cross several thresholds; they are processed in order.

use syndicate_types::Company;

/// XP needed per current level to advance.
pub const XP_PER_LEVEL: u32 = 40;

/// Money paid out on every level-up.
pub const LEVEL_UP_BONUS: u64 = 60;

/// XP required to advance from `level` to `level + 1`.
pub const fn xp_threshold(level: u32) -> u32 {
    level.saturating_mul(XP_PER_LEVEL)
}

/// Add `amount` XP to `company`, applying every level-up it triggers.
///
/// Returns the levels reached, in order. An empty vector means no
/// level-up occurred.
pub fn grant_xp(company: &mut Company, amount: u32, now_ms: i64) -> Vec<u32> {
    company.xp = company.xp.saturating_add(amount);

    let mut reached = Vec::new();
    loop {
        // Level is at least 1 after normalization, so the threshold is
        // never zero and the loop terminates.
        let threshold = xp_threshold(company.level.max(1));
        if company.xp < threshold {
            break;
        }
        company.xp = company.xp.saturating_sub(threshold);
        company.level = company.level.saturating_add(1);
        company.money = company.money.saturating_add(LEVEL_UP_BONUS);
        company.push_log(
            now_ms,
            &format!("Level up! Reached level {} (+${LEVEL_UP_BONUS}).", company.level),
        );
        reached.push(company.level);
    }

    if !reached.is_empty() {
        tracing::debug!(owner = %company.owner, levels = ?reached, "level-up");
    }
    reached
}
