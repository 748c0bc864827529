//! Missions: a probabilistic payout gated on having operatives.
//!
//! Success probability is `min(0.9, 0.55 + level * 0.03 - heat * 0.004)`.
//! There is no lower clamp: a hot enough company always fails.

use rand::Rng;
use syndicate_types::{Company, Notice};

use super::Transition;
use super::costs::{HEAT_MISSION_FAILURE, HEAT_MISSION_SUCCESS, XP_MISSION_FAILURE, XP_MISSION_SUCCESS};
use crate::error::Rejection;
use crate::leveling::grant_xp;

/// Upper bound on mission success probability.
pub const MAX_SUCCESS_PROBABILITY: f64 = 0.9;

/// Chance that a successful mission also yields one intel.
pub const INTEL_FIND_CHANCE: f64 = 0.6;

/// Payout range on success (lower inclusive, upper exclusive).
pub const PAYOUT_RANGE: core::ops::Range<u64> = 40..160;

/// Loss range on failure (lower inclusive, upper exclusive).
pub const LOSS_RANGE: core::ops::Range<u64> = 20..55;

const BASE_SUCCESS: f64 = 0.55;
const LEVEL_BONUS: f64 = 0.03;
const HEAT_PENALTY: f64 = 0.004;

/// Pre-drawn random values for one mission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionRolls {
    /// Uniform in `[0, 1)`; the mission succeeds when below the probability.
    pub success_roll: f64,
    /// Money gained on success, drawn from [`PAYOUT_RANGE`].
    pub payout: u64,
    /// Uniform in `[0, 1)`; intel is found when below [`INTEL_FIND_CHANCE`].
    pub intel_roll: f64,
    /// Money lost on failure, drawn from [`LOSS_RANGE`].
    pub loss: u64,
}

impl MissionRolls {
    /// Draw a full set of rolls from `rng`.
    pub fn draw(rng: &mut impl Rng) -> Self {
        Self {
            success_roll: rng.random::<f64>(),
            payout: rng.random_range(PAYOUT_RANGE),
            intel_roll: rng.random::<f64>(),
            loss: rng.random_range(LOSS_RANGE),
        }
    }
}

/// Probability that a mission succeeds at the given level and heat.
pub fn success_probability(level: u32, heat: u32) -> f64 {
    let p = BASE_SUCCESS + f64::from(level) * LEVEL_BONUS - f64::from(heat) * HEAT_PENALTY;
    p.min(MAX_SUCCESS_PROBABILITY)
}

/// Run a mission with the given rolls.
///
/// Success: `+payout` money, maybe +1 intel, +4 heat, +18 XP.
/// Failure: `-loss` money (floored at zero), +8 heat, +6 XP.
pub fn run_mission(
    company: &Company,
    rolls: &MissionRolls,
    now_ms: i64,
) -> Result<Transition, Rejection> {
    if company.operatives < 1 {
        return Err(Rejection::NoOperatives);
    }

    let probability = success_probability(company.level, company.heat);
    let mut next = company.clone();

    if rolls.success_roll < probability {
        let found_intel = rolls.intel_roll < INTEL_FIND_CHANCE;
        next.money = next.money.saturating_add(rolls.payout);
        if found_intel {
            next.intel = next.intel.saturating_add(1);
        }
        next.heat = next.heat.saturating_add(HEAT_MISSION_SUCCESS);

        let text = if found_intel {
            format!("Mission succeeded (+${}, +1 intel).", rolls.payout)
        } else {
            format!("Mission succeeded (+${}).", rolls.payout)
        };
        next.push_log(now_ms, &text);
        let levels = grant_xp(&mut next, XP_MISSION_SUCCESS, now_ms);
        Ok(Transition::own(next, Notice::ok(text), levels))
    } else {
        let lost = rolls.loss.min(next.money);
        next.money = next.money.saturating_sub(lost);
        next.heat = next.heat.saturating_add(HEAT_MISSION_FAILURE);

        let text = format!("Mission failed (-${lost}).");
        next.push_log(now_ms, &text);
        let levels = grant_xp(&mut next, XP_MISSION_FAILURE, now_ms);
        Ok(Transition::own(next, Notice::err(text), levels))
    }
}
