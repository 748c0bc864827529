//! Game mutation engine for Syndicate.
//!
//! This crate contains the rules layer -- everything that transforms a
//! company without touching I/O. It sits between `syndicate-types` (which
//! defines the record) and `syndicate-core` (which owns the session,
//! persistence, and notifications).
//!
//! # Modules
//!
//! - [`actions`] -- Action validation and transitions ([`apply_action`])
//! - [`error`] -- Precondition failures ([`Rejection`])
//! - [`leveling`] -- XP thresholds and level-ups ([`grant_xp`])
//! - [`leaderboard`] -- Net worth and ranking ([`net_worth`], [`leaderboard()`])

pub mod actions;
pub mod error;
pub mod leaderboard;
pub mod leveling;

// Re-export primary types at crate root for convenience.
pub use actions::heist::{HeistRolls, steal_amount, success_chance};
pub use actions::mission::MissionRolls;
pub use actions::sabotage::sabotage;
pub use actions::{Action, TargetEffect, Transition, apply_action, display_name};
pub use error::Rejection;
pub use leaderboard::{LeaderboardEntry, leaderboard, net_worth};
pub use leveling::{grant_xp, xp_threshold};
