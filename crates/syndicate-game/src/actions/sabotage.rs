//! Sabotage: guess a rival's company password to skim their cash.
//!
//! A correct guess takes up to [`SABOTAGE_MAX_STEAL`] from the target,
//! capped at what the target holds in the caller's snapshot. A wrong
//! guess costs the saboteur one guard. There is no cooldown.

use std::collections::BTreeMap;

use syndicate_types::{Company, Notice};

use super::costs::SABOTAGE_MAX_STEAL;
use super::{TargetEffect, Transition, display_name};
use crate::error::Rejection;

/// Check the sabotage prerequisites and return the target's snapshot.
///
/// Order: not self, at least one guard, target present.
pub fn validate_sabotage<'a>(
    company: &Company,
    target_owner: &str,
    companies: &'a BTreeMap<String, Company>,
) -> Result<&'a Company, Rejection> {
    if target_owner == company.owner {
        return Err(Rejection::SelfTarget);
    }
    if company.guards < 1 {
        return Err(Rejection::NoGuards);
    }
    companies
        .get(target_owner)
        .ok_or_else(|| Rejection::TargetNotFound {
            owner: target_owner.to_owned(),
        })
}

/// Attempt sabotage on `target_owner` with a password `guess`.
///
/// On a correct guess with something to take, the returned
/// [`Transition`] carries a [`TargetEffect`] for the victim's record.
pub fn sabotage(
    company: &Company,
    target_owner: &str,
    guess: &str,
    companies: &BTreeMap<String, Company>,
    now_ms: i64,
) -> Result<Transition, Rejection> {
    let target = validate_sabotage(company, target_owner, companies)?;
    let target_name = display_name(target).to_owned();
    let mut next = company.clone();

    if guess != target.password {
        next.guards = next.guards.saturating_sub(1);
        next.push_log(
            now_ms,
            &format!("Sabotage on {target_name} failed. Lost 1 guard."),
        );
        tracing::info!(saboteur = %company.owner, target = target_owner, "sabotage failed");
        return Ok(Transition::own(
            next,
            Notice::err("Sabotage failed. You lost 1 guard."),
            Vec::new(),
        ));
    }

    let stolen = target.money.min(SABOTAGE_MAX_STEAL);
    next.money = next.money.saturating_add(stolen);
    next.push_log(now_ms, &format!("Sabotaged {target_name} (+${stolen})."));
    tracing::info!(saboteur = %company.owner, target = target_owner, stolen, "sabotage succeeded");

    let target_effect = (stolen > 0).then(|| TargetEffect {
        owner: target_owner.to_owned(),
        stolen,
        attacker_name: display_name(&next).to_owned(),
    });
    Ok(Transition {
        company: next,
        notice: Notice::ok(format!("Success! You stole ${stolen}.")),
        levels_reached: Vec::new(),
        target_effect,
    })
}
