//! Game actions: validation and state transitions.
//!
//! Every action is a transition `Company -> Company` applied to the
//! caller's own cached company. Preconditions are checked first; a failed
//! check returns a [`Rejection`] and leaves the company untouched. A
//! successful transition carries the new company, the banner notice and,
//! for a successful heist, the effect to apply to the victim's record.
//!
//! # Submodules
//!
//! - [`costs`] -- Prices, rewards, heat, and cooldown constants.
//! - [`economy`] -- Daily bonus, income, hiring, training, security, lay low.
//! - [`mission`] -- Probabilistic missions.
//! - [`heist`] -- Heist resolution against a rival company.
//! - [`spy`] -- Espionage on a rival company.
//! - [`sabotage`] -- Password-guess theft from a rival company.

pub mod costs;
pub mod economy;
pub mod heist;
pub mod mission;
pub mod sabotage;
pub mod spy;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use syndicate_types::{Company, Notice};

use crate::error::Rejection;

use self::heist::HeistRolls;
use self::mission::MissionRolls;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A player action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Claim the 12-hourly bonus.
    ClaimDaily,
    /// Collect level-scaled income.
    CollectIncome,
    /// Hire one guard.
    HireGuard,
    /// Train one operative.
    TrainOperative,
    /// Send operatives on a mission.
    RunMission,
    /// Buy a security upgrade.
    UpgradeSecurity,
    /// Pay to shed heat.
    LayLow,
    /// Rob another company.
    Heist {
        /// Owner of the target company.
        target: String,
    },
    /// Gather intel on another company.
    Spy {
        /// Owner of the target company.
        target: String,
    },
    /// Guess another company's password to steal from it.
    Sabotage {
        /// Owner of the target company.
        target: String,
        /// Password guess.
        guess: String,
    },
}

impl Action {
    /// Short name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ClaimDaily => "claim_daily",
            Self::CollectIncome => "collect_income",
            Self::HireGuard => "hire_guard",
            Self::TrainOperative => "train_operative",
            Self::RunMission => "run_mission",
            Self::UpgradeSecurity => "upgrade_security",
            Self::LayLow => "lay_low",
            Self::Heist { .. } => "heist",
            Self::Spy { .. } => "spy",
            Self::Sabotage { .. } => "sabotage",
        }
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Money taken from a heist or sabotage victim, to be applied to the
/// victim's stored record with a read-modify-write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEffect {
    /// Owner of the victim company.
    pub owner: String,
    /// Amount removed from the victim.
    pub stolen: u64,
    /// Display name of the attacker, for the victim's log.
    pub attacker_name: String,
}

impl TargetEffect {
    /// Apply the theft to the victim's (normalized) company.
    ///
    /// Money is floored at zero; the victim's log records the loss.
    pub fn apply(&self, mut victim: Company, now_ms: i64) -> Company {
        victim.money = victim.money.saturating_sub(self.stolen);
        victim.push_log(
            now_ms,
            &format!("{} robbed you for ${}.", self.attacker_name, self.stolen),
        );
        victim
    }
}

/// The result of a successful (non-rejected) action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The caller's company after the action.
    pub company: Company,
    /// Banner notice. Failed missions and heists still change state but
    /// report with `err` severity.
    pub notice: Notice,
    /// Levels reached by XP granted during the action, in order.
    pub levels_reached: Vec<u32>,
    /// Effect to apply to another company's record, if any.
    pub target_effect: Option<TargetEffect>,
}

impl Transition {
    /// A transition touching only the caller's company.
    pub const fn own(company: Company, notice: Notice, levels_reached: Vec<u32>) -> Self {
        Self {
            company,
            notice,
            levels_reached,
            target_effect: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Apply `action` to the caller's current company.
///
/// `companies` is the caller's (possibly stale) collection snapshot, used
/// to look up heist and espionage targets. Random draws come from `rng`.
///
/// # Errors
///
/// Returns [`Rejection::NoCompany`] when `current` is `None`, or the
/// action-specific precondition failure.
pub fn apply_action(
    current: Option<&Company>,
    action: &Action,
    now_ms: i64,
    companies: &BTreeMap<String, Company>,
    rng: &mut impl rand::Rng,
) -> Result<Transition, Rejection> {
    let company = current.ok_or(Rejection::NoCompany)?;
    let result = match action {
        Action::ClaimDaily => economy::claim_daily(company, now_ms),
        Action::CollectIncome => Ok(economy::collect_income(company, now_ms)),
        Action::HireGuard => economy::hire_guard(company, now_ms),
        Action::TrainOperative => economy::train_operative(company, now_ms),
        Action::RunMission => mission::run_mission(company, &MissionRolls::draw(rng), now_ms),
        Action::UpgradeSecurity => economy::upgrade_security(company, now_ms),
        Action::LayLow => economy::lay_low(company, now_ms),
        Action::Heist { target } => {
            heist::run_heist(company, target, companies, &HeistRolls::draw(rng), now_ms)
        }
        Action::Spy { target } => spy::spy(company, target, companies, now_ms),
        Action::Sabotage { target, guess } => {
            sabotage::sabotage(company, target, guess, companies, now_ms)
        }
    };

    match &result {
        Ok(t) => tracing::debug!(
            owner = %company.owner,
            action = action.name(),
            notice = %t.notice,
            "action applied"
        ),
        Err(rejection) => tracing::debug!(
            owner = %company.owner,
            action = action.name(),
            %rejection,
            "action rejected"
        ),
    }
    result
}

/// Name to show for a company: its display name, or the owner when unnamed.
pub fn display_name(company: &Company) -> &str {
    if company.name.is_empty() {
        &company.owner
    } else {
        &company.name
    }
}
