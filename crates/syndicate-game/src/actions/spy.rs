//! Espionage: spend one intel to read a rival's money and defenses.

use std::collections::BTreeMap;

use syndicate_types::{Company, Notice};

use super::{Transition, display_name};
use crate::error::Rejection;

/// Spy on `target_owner`: -1 intel, and a report line in the caller's log.
///
/// The target is read from the caller's snapshot and never modified.
pub fn spy(
    company: &Company,
    target_owner: &str,
    companies: &BTreeMap<String, Company>,
    now_ms: i64,
) -> Result<Transition, Rejection> {
    if company.intel < 1 {
        return Err(Rejection::NoIntel);
    }
    let target = companies
        .get(target_owner)
        .ok_or_else(|| Rejection::TargetNotFound {
            owner: target_owner.to_owned(),
        })?;

    let report = format!(
        "Spy report on {}: ${}, {} guards, security {}.",
        display_name(target),
        target.money,
        target.guards,
        target.security
    );

    let mut next = company.clone();
    next.intel = next.intel.saturating_sub(1);
    next.push_log(now_ms, &report);

    Ok(Transition::own(next, Notice::ok(report), Vec::new()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn snapshot() -> BTreeMap<String, Company> {
        let mut target = Company::base("tgt");
        target.name = "Target Co".to_owned();
        target.money = 777;
        target.guards = 3;
        target.security = 5;
        let mut m = BTreeMap::new();
        m.insert("tgt".to_owned(), target);
        m
    }

    #[test]
    fn needs_intel() {
        let c = Company::base("me");
        assert_eq!(spy(&c, "tgt", &snapshot(), 0), Err(Rejection::NoIntel));
    }

    #[test]
    fn unknown_target() {
        let mut c = Company::base("me");
        c.intel = 1;
        assert!(matches!(
            spy(&c, "nobody", &snapshot(), 0),
            Err(Rejection::TargetNotFound { .. })
        ));
    }

    #[test]
    fn report_reveals_target_and_consumes_intel() {
        let mut c = Company::base("me");
        c.intel = 2;
        let companies = snapshot();
        let t = spy(&c, "tgt", &companies, 0).unwrap();
        assert_eq!(t.company.intel, 1);
        assert!(t.company.log[0].contains("Target Co: $777, 3 guards, security 5."));
        assert_eq!(companies["tgt"].money, 777);
        assert!(t.target_effect.is_none());
        // Nothing else about the spy changes.
        let mut expected = c.clone();
        expected.intel = 1;
        expected.log.clone_from(&t.company.log);
        assert_eq!(t.company, expected);
    }
}
