//! Heist mechanics for stealing money from a rival company.
//!
//! The resolution flow:
//! 1. Validate prerequisites (not self, operatives, cooldown, target known)
//! 2. Compute attacker and defender power from stats plus a random bonus
//! 3. Roll for success against the clamped power ratio
//! 4. Always: start the 60s cooldown and consume one intel
//! 5. On success: steal from the target, credit the attacker, log both sides
//! 6. On failure: lose an operative, log the attacker side only
//!
//! The target's numbers come from the caller's collection snapshot, which
//! may be stale. The theft itself is applied to the stored target record
//! by the session through a separate read-modify-write; the attacker's
//! own write and the victim's write are not synchronized.

use std::collections::BTreeMap;

use rand::Rng;
use syndicate_types::{Company, Notice};

use super::costs::{
    HEAT_HEIST_FAILURE, HEAT_HEIST_SUCCESS, HEIST_COOLDOWN_MS, XP_HEIST_FAILURE, XP_HEIST_SUCCESS,
};
use super::{TargetEffect, Transition, display_name};
use crate::error::Rejection;
use crate::leveling::grant_xp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Floor of the success chance (never impossible).
pub const MIN_SUCCESS_CHANCE: f64 = 0.15;

/// Ceiling of the success chance (never guaranteed).
pub const MAX_SUCCESS_CHANCE: f64 = 0.9;

/// Smallest amount a successful heist takes.
pub const MIN_STEAL: u64 = 30;

/// Largest amount a successful heist takes.
pub const MAX_STEAL: u64 = 300;

/// Exclusive upper bound of the attacker's random bonus.
pub const ATTACKER_BONUS_MAX: f64 = 5.0;

/// Exclusive upper bound of the defender's random bonus.
pub const DEFENDER_BONUS_MAX: f64 = 6.0;

// ---------------------------------------------------------------------------
// HeistRolls
// ---------------------------------------------------------------------------

/// Pre-drawn random values for one heist attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeistRolls {
    /// Uniform in `[0, 5)`, added to attacker power.
    pub attacker_bonus: f64,
    /// Uniform in `[0, 6)`, added to defender power.
    pub defender_bonus: f64,
    /// Uniform in `[0, 1)`; the heist succeeds when below the chance.
    pub success_roll: f64,
}

impl HeistRolls {
    /// Draw a full set of rolls from `rng`.
    pub fn draw(rng: &mut impl Rng) -> Self {
        Self {
            attacker_bonus: rng.random_range(0.0..ATTACKER_BONUS_MAX),
            defender_bonus: rng.random_range(0.0..DEFENDER_BONUS_MAX),
            success_roll: rng.random::<f64>(),
        }
    }
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Attacker power: `operatives * 2 + guards + intel * 2 + bonus`.
pub fn attacker_power(attacker: &Company, bonus: f64) -> f64 {
    let base = attacker
        .operatives
        .saturating_mul(2)
        .saturating_add(attacker.guards)
        .saturating_add(attacker.intel.saturating_mul(2));
    f64::from(base) + bonus
}

/// Defender power: `guards * 2 + security + bonus`.
pub fn defender_power(defender: &Company, bonus: f64) -> f64 {
    let base = defender
        .guards
        .saturating_mul(2)
        .saturating_add(defender.security);
    f64::from(base) + bonus
}

/// Success chance `attacker / (attacker + defender)` clamped to
/// `[0.15, 0.9]`.
///
/// When both powers are zero the ratio is undefined and the floor is used.
pub fn success_chance(attacker: f64, defender: f64) -> f64 {
    let total = attacker + defender;
    if total <= 0.0 || !total.is_finite() {
        return MIN_SUCCESS_CHANCE;
    }
    (attacker / total).clamp(MIN_SUCCESS_CHANCE, MAX_SUCCESS_CHANCE)
}

/// Amount taken from a target holding `target_money`:
/// `floor(target_money * 0.25)` clamped to `[30, 300]`.
///
/// The floor applies even when the target holds less than 30; the target's
/// balance is then floored at zero while the attacker still receives the
/// full amount.
pub const fn steal_amount(target_money: u64) -> u64 {
    let quarter = target_money / 4;
    if quarter < MIN_STEAL {
        MIN_STEAL
    } else if quarter > MAX_STEAL {
        MAX_STEAL
    } else {
        quarter
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate the prerequisites for a heist and return the target's snapshot.
pub fn validate_heist<'a>(
    attacker: &Company,
    target_owner: &str,
    companies: &'a BTreeMap<String, Company>,
    now_ms: i64,
) -> Result<&'a Company, Rejection> {
    if target_owner == attacker.owner {
        return Err(Rejection::SelfTarget);
    }
    if attacker.operatives < 1 {
        return Err(Rejection::NoOperatives);
    }
    if now_ms < attacker.next_heist_at {
        return Err(Rejection::HeistCooldown {
            remaining_ms: attacker.next_heist_at.saturating_sub(now_ms),
        });
    }
    companies
        .get(target_owner)
        .ok_or_else(|| Rejection::TargetNotFound {
            owner: target_owner.to_owned(),
        })
}

/// Resolve a heist against `target_owner` with the given rolls.
///
/// On success the returned [`Transition`] carries a [`TargetEffect`] that
/// the caller must apply to the target's stored record.
pub fn run_heist(
    attacker: &Company,
    target_owner: &str,
    companies: &BTreeMap<String, Company>,
    rolls: &HeistRolls,
    now_ms: i64,
) -> Result<Transition, Rejection> {
    let target = validate_heist(attacker, target_owner, companies, now_ms)?;
    let target_name = display_name(target).to_owned();

    let chance = success_chance(
        attacker_power(attacker, rolls.attacker_bonus),
        defender_power(target, rolls.defender_bonus),
    );

    let mut next = attacker.clone();
    next.next_heist_at = now_ms.saturating_add(HEIST_COOLDOWN_MS);
    next.intel = next.intel.saturating_sub(1);

    if rolls.success_roll < chance {
        let stolen = steal_amount(target.money);
        next.money = next.money.saturating_add(stolen);
        next.heat = next.heat.saturating_add(HEAT_HEIST_SUCCESS);
        next.push_log(now_ms, &format!("Heist on {target_name} succeeded (+${stolen})."));
        let levels = grant_xp(&mut next, XP_HEIST_SUCCESS, now_ms);

        let effect = TargetEffect {
            owner: target_owner.to_owned(),
            stolen,
            attacker_name: display_name(&next).to_owned(),
        };
        tracing::info!(
            attacker = %attacker.owner,
            target = target_owner,
            stolen,
            chance,
            "heist succeeded"
        );
        Ok(Transition {
            company: next,
            notice: Notice::ok(format!("Heist succeeded! You stole ${stolen} from {target_name}.")),
            levels_reached: levels,
            target_effect: Some(effect),
        })
    } else {
        next.operatives = next.operatives.saturating_sub(1);
        next.heat = next.heat.saturating_add(HEAT_HEIST_FAILURE);
        next.push_log(
            now_ms,
            &format!("Heist on {target_name} failed. Lost an operative."),
        );
        let levels = grant_xp(&mut next, XP_HEIST_FAILURE, now_ms);

        tracing::info!(
            attacker = %attacker.owner,
            target = target_owner,
            chance,
            "heist failed"
        );
        Ok(Transition::own(
            next,
            Notice::err(format!("Heist on {target_name} failed. You lost 1 operative.")),
            levels,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
