//! Integration tests for the local backend's subscription and
//! read-modify-write contract.
//!
//! These run against an in-memory [`LocalStore`] with several tab handles
//! on the same storage, the way several browser tabs share one machine.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use syndicate_store::{CompanyStore, LocalStore};
use syndicate_types::Company;
use tokio::sync::mpsc;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

fn company(owner: &str, money: u64) -> Company {
    let mut c = Company::base(owner);
    c.money = money;
    c
}

async fn next<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for delivery")
        .expect("listener dropped")
}

// =============================================================================
// Subscriptions
// =============================================================================

#[tokio::test]
async fn get_company_delivers_current_value_before_returning() {
    let store = LocalStore::in_memory();
    store.set_company("alice", &company("alice", 250)).await.unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sub = store
        .get_company("alice", move |c| sink.lock().unwrap().push(c))
        .await
        .unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].as_ref().map(|c| c.money), Some(250));
    sub.cancel();
}

#[tokio::test]
async fn get_company_delivers_none_for_missing_owner() {
    let store = LocalStore::in_memory();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = store
        .get_company("ghost", move |c| {
            let _ = tx.send(c);
        })
        .await
        .unwrap();
    assert_eq!(next(&mut rx).await, None);
}

#[tokio::test]
async fn other_tab_write_reaches_subscriber() {
    let tab_a = LocalStore::in_memory();
    let tab_b = tab_a.open_tab();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = tab_a
        .get_company("bob", move |c| {
            let _ = tx.send(c);
        })
        .await
        .unwrap();
    assert_eq!(next(&mut rx).await, None);

    tab_b.set_company("bob", &company("bob", 77)).await.unwrap();
    let delivered = next(&mut rx).await.expect("bob should exist");
    assert_eq!(delivered.money, 77);
}

#[tokio::test]
async fn own_write_reaches_own_subscriber() {
    let store = LocalStore::in_memory();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = store
        .subscribe_companies(move |all: BTreeMap<String, Company>| {
            let _ = tx.send(all.len());
        })
        .await
        .unwrap();
    assert_eq!(next(&mut rx).await, 0);

    store.set_company("a", &company("a", 1)).await.unwrap();
    assert_eq!(next(&mut rx).await, 1);
    store.set_company("b", &company("b", 1)).await.unwrap();
    assert_eq!(next(&mut rx).await, 2);
}

#[tokio::test]
async fn cancelled_subscription_is_never_called_again() {
    let tab_a = LocalStore::in_memory();
    let tab_b = tab_a.open_tab();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let sub = tab_a
        .get_company("carol", move |c| {
            let _ = tx.send(c);
        })
        .await
        .unwrap();
    assert_eq!(next(&mut rx).await, None);

    sub.cancel_and_wait().await;
    tab_b.set_company("carol", &company("carol", 5)).await.unwrap();

    // The listener (and its sender) has been dropped with the task.
    assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), None);
}

// =============================================================================
// Read-modify-write
// =============================================================================

#[tokio::test]
async fn update_of_missing_owner_is_a_noop() {
    let store = LocalStore::in_memory();
    let called = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&called);
    let applied = store
        .update_company("nobody", move |c| {
            *flag.lock().unwrap() = true;
            c
        })
        .await
        .unwrap();

    assert!(!applied);
    assert!(!*called.lock().unwrap());
    assert!(store.read_company("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn updater_receives_normalized_record() {
    let store = LocalStore::in_memory();
    store
        .set_item(syndicate_store::COMPANIES_KEY, r#"{"dave":{"money":"40"}}"#)
        .await
        .unwrap();

    let applied = store
        .update_company("dave", |mut c| {
            assert_eq!(c.owner, "dave");
            assert_eq!(c.level, 1);
            assert_eq!(c.money, 40);
            c.money = c.money.saturating_add(10);
            c
        })
        .await
        .unwrap();

    assert!(applied);
    let dave = store.read_company("dave").await.unwrap().unwrap();
    assert_eq!(dave.money, 50);
}

#[tokio::test]
async fn concurrent_updates_on_one_owner_lose_a_write() {
    let tab_a = LocalStore::in_memory();
    let tab_b = tab_a.open_tab();
    tab_a.set_company("erin", &company("erin", 100)).await.unwrap();

    let add = |amount: u64| {
        move |mut c: Company| {
            c.money = c.money.saturating_add(amount);
            c
        }
    };
    let (a, b) = tokio::join!(
        tab_a.update_company("erin", add(10)),
        tab_b.update_company("erin", add(20)),
    );
    assert!(a.unwrap());
    assert!(b.unwrap());

    // Both updaters read 100; whichever wrote last wins.
    let money = tab_a.read_company("erin").await.unwrap().unwrap().money;
    assert!(money == 110 || money == 120, "got {money}");
    assert_ne!(money, 130);
}

#[tokio::test]
async fn concurrent_updates_on_different_owners_both_land() {
    let tab_a = LocalStore::in_memory();
    let tab_b = tab_a.open_tab();
    tab_a.set_company("f1", &company("f1", 100)).await.unwrap();
    tab_a.set_company("f2", &company("f2", 100)).await.unwrap();

    let (a, b) = tokio::join!(
        tab_a.update_company("f1", |mut c| {
            c.money = 1;
            c
        }),
        tab_b.update_company("f2", |mut c| {
            c.money = 2;
            c
        }),
    );
    assert!(a.unwrap() && b.unwrap());

    let all = tab_a.read_companies().await.unwrap();
    assert_eq!(all["f1"].money, 1);
    assert_eq!(all["f2"].money, 2);
}

#[tokio::test]
async fn stale_snapshot_write_clobbers_newer_update() {
    let tab_a = LocalStore::in_memory();
    let tab_b = tab_a.open_tab();
    tab_a.set_company("gus", &company("gus", 500)).await.unwrap();

    // Tab A holds a cached copy, tab B robs gus meanwhile.
    let mut cached = tab_a.read_company("gus").await.unwrap().unwrap();
    tab_b
        .update_company("gus", |mut c| {
            c.money = c.money.saturating_sub(200);
            c
        })
        .await
        .unwrap();
    assert_eq!(tab_a.read_company("gus").await.unwrap().unwrap().money, 300);

    // Tab A writes its stale copy back; the robbery disappears silently.
    cached.guards = 1;
    tab_a.set_company("gus", &cached).await.unwrap();
    let gus = tab_b.read_company("gus").await.unwrap().unwrap();
    assert_eq!(gus.money, 500);
    assert_eq!(gus.guards, 1);
}
