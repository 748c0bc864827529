//! Precondition failures for game actions.
//!
//! A [`Rejection`] is never fatal: it means the action was refused before
//! any state changed. Its `Display` text is the message shown to the
//! player in the status banner.

/// Milliseconds in one second.
const SECOND_MS: i64 = 1_000;

/// Milliseconds in one minute.
const MINUTE_MS: i64 = 60 * SECOND_MS;

/// Milliseconds in one hour.
const HOUR_MS: i64 = 60 * MINUTE_MS;

/// Why an action was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The player has no company yet.
    #[error("Create your company first.")]
    NoCompany,

    /// The action costs more money than the company holds.
    #[error("Not enough money (need ${needed}, have ${available}).")]
    InsufficientMoney {
        /// Price of the action.
        needed: u64,
        /// Money on hand.
        available: u64,
    },

    /// Missions and heists need at least one operative.
    #[error("You need at least 1 operative.")]
    NoOperatives,

    /// Sabotage needs at least one guard.
    #[error("You need at least 1 guard to attempt sabotage.")]
    NoGuards,

    /// Espionage needs at least one intel.
    #[error("You need at least 1 intel.")]
    NoIntel,

    /// The daily bonus was claimed less than 12 hours ago.
    #[error("Daily bonus not ready. Come back in {}.", format_remaining(*.remaining_ms))]
    DailyNotReady {
        /// Time left until the bonus unlocks.
        remaining_ms: i64,
    },

    /// The heist cooldown has not elapsed.
    #[error("Your crew is lying low. Next heist in {}.", format_remaining(*.remaining_ms))]
    HeistCooldown {
        /// Time left until the next heist may start.
        remaining_ms: i64,
    },

    /// A company tried to attack itself.
    #[error("You cannot target your own company.")]
    SelfTarget,

    /// The target owner is not in the collection snapshot.
    #[error("Target company not found.")]
    TargetNotFound {
        /// The owner that was looked up.
        owner: String,
    },
}

/// Render a remaining duration as `"11h 0m"`, `"4m 10s"` or `"9s"`.
pub fn format_remaining(remaining_ms: i64) -> String {
    let ms = remaining_ms.max(0);
    let hours = ms / HOUR_MS;
    let minutes = (ms % HOUR_MS) / MINUTE_MS;
    // Round seconds up so "0s" is never shown while still waiting.
    let seconds = (ms % MINUTE_MS).saturating_add(SECOND_MS - 1) / SECOND_MS;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
