//! Deterministic economy actions.
//!
//! Each function clones the caller's company, applies its effect, writes a
//! log line, grants XP (which may append level-up lines on top), and
//! returns the [`Transition`].

use syndicate_types::{Company, Notice};

use super::Transition;
use super::costs::{
    DAILY_BONUS_INTEL, DAILY_BONUS_MONEY, DAILY_COOLDOWN_MS, GUARD_COST, HEAT_INCOME,
    LAY_LOW_COST, LAY_LOW_HEAT_REDUCTION, OPERATIVE_COST, SECURITY_PER_UPGRADE,
    SECURITY_UPGRADE_COST, XP_DAILY, XP_HIRE_GUARD, XP_INCOME, XP_TRAIN_OPERATIVE,
    XP_UPGRADE_SECURITY, income_for_level, require_money,
};
use crate::error::Rejection;
use crate::leveling::grant_xp;

/// Claim the daily bonus: +150 money, +1 intel, +15 XP.
///
/// Allowed once `now_ms` is at least 12 hours past `last_daily_at`.
pub fn claim_daily(company: &Company, now_ms: i64) -> Result<Transition, Rejection> {
    let ready_at = company.last_daily_at.saturating_add(DAILY_COOLDOWN_MS);
    if now_ms < ready_at {
        return Err(Rejection::DailyNotReady {
            remaining_ms: ready_at.saturating_sub(now_ms),
        });
    }

    let mut next = company.clone();
    next.money = next.money.saturating_add(DAILY_BONUS_MONEY);
    next.intel = next.intel.saturating_add(DAILY_BONUS_INTEL);
    next.last_daily_at = now_ms;
    next.push_log(
        now_ms,
        &format!("Claimed daily bonus (+${DAILY_BONUS_MONEY}, +{DAILY_BONUS_INTEL} intel)."),
    );
    let levels = grant_xp(&mut next, XP_DAILY, now_ms);

    Ok(Transition::own(
        next,
        Notice::ok(format!(
            "Daily bonus claimed (+${DAILY_BONUS_MONEY}, +{DAILY_BONUS_INTEL} intel)."
        )),
        levels,
    ))
}

/// Collect income: `+(20 + level * 5)` money, +1 heat, +5 XP.
///
/// Always succeeds for an existing company. Income uses the level before
/// the XP grant.
pub fn collect_income(company: &Company, now_ms: i64) -> Transition {
    let income = income_for_level(company.level);

    let mut next = company.clone();
    next.money = next.money.saturating_add(income);
    next.heat = next.heat.saturating_add(HEAT_INCOME);
    next.push_log(now_ms, &format!("Collected income (+${income})."));
    let levels = grant_xp(&mut next, XP_INCOME, now_ms);

    Transition::own(next, Notice::ok(format!("Collected income (+${income}).")), levels)
}

/// Hire a guard: -50 money, +1 guard, +1 security, +8 XP.
pub fn hire_guard(company: &Company, now_ms: i64) -> Result<Transition, Rejection> {
    require_money(company, GUARD_COST)?;

    let mut next = company.clone();
    next.money = next.money.saturating_sub(GUARD_COST);
    next.guards = next.guards.saturating_add(1);
    next.security = next.security.saturating_add(1);
    next.push_log(now_ms, &format!("Hired a guard (-${GUARD_COST})."));
    let levels = grant_xp(&mut next, XP_HIRE_GUARD, now_ms);

    Ok(Transition::own(next, Notice::ok("Guard hired."), levels))
}

/// Train an operative: -80 money, +1 operative, +10 XP.
pub fn train_operative(company: &Company, now_ms: i64) -> Result<Transition, Rejection> {
    require_money(company, OPERATIVE_COST)?;

    let mut next = company.clone();
    next.money = next.money.saturating_sub(OPERATIVE_COST);
    next.operatives = next.operatives.saturating_add(1);
    next.push_log(now_ms, &format!("Trained an operative (-${OPERATIVE_COST})."));
    let levels = grant_xp(&mut next, XP_TRAIN_OPERATIVE, now_ms);

    Ok(Transition::own(next, Notice::ok("Operative trained."), levels))
}

/// Upgrade security: -120 money, +2 security, +12 XP.
pub fn upgrade_security(company: &Company, now_ms: i64) -> Result<Transition, Rejection> {
    require_money(company, SECURITY_UPGRADE_COST)?;

    let mut next = company.clone();
    next.money = next.money.saturating_sub(SECURITY_UPGRADE_COST);
    next.security = next.security.saturating_add(SECURITY_PER_UPGRADE);
    next.push_log(
        now_ms,
        &format!("Upgraded security (+{SECURITY_PER_UPGRADE}, -${SECURITY_UPGRADE_COST})."),
    );
    let levels = grant_xp(&mut next, XP_UPGRADE_SECURITY, now_ms);

    Ok(Transition::own(next, Notice::ok("Security upgraded."), levels))
}

/// Lay low: -30 money, -10 heat (floored at zero). No XP.
pub fn lay_low(company: &Company, now_ms: i64) -> Result<Transition, Rejection> {
    require_money(company, LAY_LOW_COST)?;

    let mut next = company.clone();
    next.money = next.money.saturating_sub(LAY_LOW_COST);
    next.heat = next.heat.saturating_sub(LAY_LOW_HEAT_REDUCTION);
    next.push_log(now_ms, &format!("Laid low (-${LAY_LOW_COST}, heat now {}).", next.heat));

    Ok(Transition::own(
        next,
        Notice::ok(format!("Laid low (-{LAY_LOW_HEAT_REDUCTION} heat).")),
        Vec::new(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 60 * 60 * 1_000;

    fn company_with_money(money: u64) -> Company {
        let mut c = Company::base("ada");
        c.money = money;
        c
    }

    // -----------------------------------------------------------------------
    // Daily bonus
    // -----------------------------------------------------------------------

    #[test]
    fn daily_bonus_cooldown_cycle() {
        let t0 = 1_700_000_000_000;
        let c = Company::base("ada");

        let first = claim_daily(&c, t0).unwrap();
        assert_eq!(first.company.money, 250);
        assert_eq!(first.company.intel, 1);
        assert_eq!(first.company.xp, 15);
        assert_eq!(first.company.last_daily_at, t0);

        let early = claim_daily(&first.company, t0 + HOUR_MS);
        assert_eq!(
            early,
            Err(Rejection::DailyNotReady {
                remaining_ms: 11 * HOUR_MS
            })
        );

        let later = claim_daily(&first.company, t0 + 13 * HOUR_MS).unwrap();
        assert_eq!(later.company.last_daily_at, t0 + 13 * HOUR_MS);
        assert_eq!(later.company.money, 400);
    }

    #[test]
    fn daily_bonus_at_exact_boundary() {
        let mut c = Company::base("ada");
        c.last_daily_at = 1_000;
        assert!(claim_daily(&c, 1_000 + 12 * HOUR_MS).is_ok());
        assert!(claim_daily(&c, 1_000 + 12 * HOUR_MS - 1).is_err());
    }

    // -----------------------------------------------------------------------
    // Income
    // -----------------------------------------------------------------------

    #[test]
    fn income_depends_only_on_level() {
        for (level, money) in [(1, 0), (3, 999), (7, 12)] {
            let mut c = company_with_money(money);
            c.level = level;
            c.xp = 0;
            let t = collect_income(&c, 0);
            assert_eq!(t.company.money, money + 20 + 5 * u64::from(level));
            assert_eq!(t.company.heat, c.heat + 1);
            assert_eq!(t.company.xp, 5);
        }
    }

    #[test]
    fn income_logs_before_level_up() {
        let mut c = Company::base("ada");
        c.xp = 38;
        let t = collect_income(&c, 0);
        assert_eq!(t.levels_reached, vec![2]);
        // +25 income, +60 level bonus.
        assert_eq!(t.company.money, 185);
        assert!(t.company.log[0].contains("Level up"));
        assert!(t.company.log[1].contains("Collected income"));
    }

    // -----------------------------------------------------------------------
    // Purchases
    // -----------------------------------------------------------------------

    #[test]
    fn hire_guard_needs_fifty() {
        let poor = company_with_money(40);
        assert_eq!(
            hire_guard(&poor, 0),
            Err(Rejection::InsufficientMoney {
                needed: 50,
                available: 40
            })
        );

        let t = hire_guard(&company_with_money(50), 0).unwrap();
        assert_eq!(t.company.money, 0);
        assert_eq!(t.company.guards, 1);
        assert_eq!(t.company.security, 1);
        assert_eq!(t.company.xp, 8);
        assert_eq!(t.notice, Notice::ok("Guard hired."));
    }

    #[test]
    fn train_operative_costs_eighty() {
        assert!(train_operative(&company_with_money(79), 0).is_err());
        let t = train_operative(&company_with_money(100), 0).unwrap();
        assert_eq!(t.company.money, 20);
        assert_eq!(t.company.operatives, 1);
        assert_eq!(t.company.xp, 10);
    }

    #[test]
    fn upgrade_security_adds_two() {
        assert!(upgrade_security(&company_with_money(119), 0).is_err());
        let t = upgrade_security(&company_with_money(120), 0).unwrap();
        assert_eq!(t.company.money, 0);
        assert_eq!(t.company.security, 2);
        assert_eq!(t.company.xp, 12);
    }

    #[test]
    fn lay_low_floors_heat() {
        let mut c = company_with_money(30);
        c.heat = 4;
        let t = lay_low(&c, 0).unwrap();
        assert_eq!(t.company.money, 0);
        assert_eq!(t.company.heat, 0);
        assert_eq!(t.company.xp, 0);

        let mut hot = company_with_money(100);
        hot.heat = 25;
        assert_eq!(lay_low(&hot, 0).unwrap().company.heat, 15);

        assert!(lay_low(&company_with_money(29), 0).is_err());
    }

    #[test]
    fn rejection_leaves_input_untouched() {
        let c = company_with_money(10);
        let before = c.clone();
        let _ = hire_guard(&c, 0);
        let _ = upgrade_security(&c, 0);
        assert_eq!(c, before);
    }
}
