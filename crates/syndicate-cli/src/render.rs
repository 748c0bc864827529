//! Plain-text views of the session state.

use std::fmt::Write as _;

use syndicate_game::{LeaderboardEntry, display_name, net_worth, xp_threshold};
use syndicate_types::Company;

/// The player's company at a glance.
pub fn stats(company: Option<&Company>) -> String {
    let Some(c) = company else {
        return "No company yet. Use `create <name> <password>`.".to_owned();
    };
    format!(
        "{name} (owner {owner})\n\
         money ${money}  net worth ${worth}\n\
         level {level}  xp {xp}/{threshold}\n\
         guards {guards}  operatives {ops}  security {security}\n\
         intel {intel}  heat {heat}",
        name = display_name(c),
        owner = c.owner,
        money = c.money,
        worth = net_worth(c),
        level = c.level,
        xp = c.xp,
        threshold = xp_threshold(c.level),
        guards = c.guards,
        ops = c.operatives,
        security = c.security,
        intel = c.intel,
        heat = c.heat,
    )
}

/// The leaderboard, marking the player's own row.
pub fn board(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No companies yet.".to_owned();
    }
    let mut out = String::new();
    for e in entries {
        let marker = if e.is_self { "  <- you" } else { "" };
        let _ = writeln!(
            out,
            "{:>3}. {} ({}) ${}{marker}",
            e.rank, e.name, e.owner, e.net_worth
        );
    }
    out.trim_end().to_owned()
}

/// Rivals the player can heist, spy on, or sabotage.
pub fn targets(owners: &[String]) -> String {
    if owners.is_empty() {
        return "No rivals yet.".to_owned();
    }
    format!("targets: {}", owners.join(", "))
}

/// The activity log, newest first.
pub fn log(company: Option<&Company>) -> String {
    match company {
        Some(c) if !c.log.is_empty() => c.log.join("\n"),
        _ => "Nothing has happened yet.".to_owned(),
    }
}
