//! End-to-end tests for the hire transition and its real-time fan-out,
//! running the services against an in-memory store.

use std::time::Duration;

use tokio::sync::mpsc;

use gigboard_api::{ApiConfig, ApiError, AppState};
use gigboard_models::{Bid, BidStatus, Gig, GigStatus, ServerEvent, User, UserId};
use gigboard_realtime::{EventBus, Room};
use gigboard_store::{bid_repo, gig_repo, user_repo, Store};

async fn test_state() -> AppState {
    let store = Store::in_memory().await.expect("in-memory store");
    AppState::with_store(ApiConfig::default(), store)
}

async fn register(state: &AppState, name: &str) -> UserId {
    let user = User::new(name, format!("{name}@example.com"), "digest");
    user_repo::insert(state.store.pool(), &user).await.unwrap();
    user.id
}

async fn post_gig(state: &AppState, owner: &UserId) -> Gig {
    state
        .gigs
        .create_gig(owner, "Logo design", "A fresh logo", 500)
        .await
        .unwrap()
}

async fn place_bid(state: &AppState, gig: &Gig, freelancer: &UserId) -> Bid {
    state
        .bids
        .create_bid(&gig.id, freelancer, "pick me", 450)
        .await
        .unwrap()
}

/// Attach a fake connection to the bus and join it to one room.
async fn subscribe(state: &AppState, room: &Room) -> mpsc::Receiver<ServerEvent> {
    let (tx, rx) = EventBus::channel();
    let conn = state.bus.register(tx).await;
    state.bus.join(conn, room).await;
    rx
}

async fn recv_event(rx: &mut mpsc::Receiver<ServerEvent>) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("expected an event within 1s")
        .expect("event channel closed")
}

/// Give spawned publish tasks a moment, then assert nothing arrived.
async fn assert_no_event(rx: &mut mpsc::Receiver<ServerEvent>) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err(), "expected no event");
}

#[tokio::test]
async fn test_hire_resolves_gig_and_all_bids() {
    let state = test_state().await;
    let owner = register(&state, "owner").await;
    let f1 = register(&state, "freelancer1").await;
    let f2 = register(&state, "freelancer2").await;

    let gig = post_gig(&state, &owner).await;
    let b1 = place_bid(&state, &gig, &f1).await;
    place_bid(&state, &gig, &f2).await;

    let mut f1_rx = subscribe(&state, &Room::user(f1.clone())).await;
    let mut f2_rx = subscribe(&state, &Room::user(f2.clone())).await;

    let outcome = state.hiring.hire(&gig.id, &b1.id, &owner).await.unwrap();
    assert_eq!(outcome.gig.status, GigStatus::Assigned);
    assert_eq!(outcome.bid.status, BidStatus::Hired);

    let stored_gig = gig_repo::find_by_id(state.store.pool(), &gig.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_gig.status, GigStatus::Assigned);

    // No bid on the gig stays pending.
    let bids = bid_repo::list_for_gig(state.store.pool(), &gig.id)
        .await
        .unwrap();
    for bid in &bids {
        if bid.id == b1.id {
            assert_eq!(bid.status, BidStatus::Hired);
        } else {
            assert_eq!(bid.status, BidStatus::Rejected);
        }
    }
    assert_eq!(bids.len(), 2);

    // Exactly one notification, to the hired freelancer only.
    let event = recv_event(&mut f1_rx).await;
    match event {
        ServerEvent::FreelancerHired {
            gig_id,
            bid_id,
            gig_title,
            ..
        } => {
            assert_eq!(gig_id, gig.id);
            assert_eq!(bid_id, b1.id);
            assert_eq!(gig_title, "Logo design");
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_no_event(&mut f1_rx).await;
    assert_no_event(&mut f2_rx).await;
}

#[tokio::test]
async fn test_concurrent_hires_exactly_one_wins() {
    let state = test_state().await;
    let owner = register(&state, "owner").await;
    let f1 = register(&state, "freelancer1").await;
    let f2 = register(&state, "freelancer2").await;

    let gig = post_gig(&state, &owner).await;
    let b1 = place_bid(&state, &gig, &f1).await;
    let b2 = place_bid(&state, &gig, &f2).await;

    let (r1, r2) = tokio::join!(
        state.hiring.hire(&gig.id, &b1.id, &owner),
        state.hiring.hire(&gig.id, &b2.id, &owner),
    );

    let wins = [r1.is_ok(), r2.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(wins, 1, "exactly one hire must win");
    let loser = if r1.is_err() { r1.unwrap_err() } else { r2.unwrap_err() };
    assert!(matches!(loser, ApiError::Conflict(_)), "loser gets Conflict");

    let bids = bid_repo::list_for_gig(state.store.pool(), &gig.id)
        .await
        .unwrap();
    let hired = bids
        .iter()
        .filter(|b| b.status == BidStatus::Hired)
        .count();
    let rejected = bids
        .iter()
        .filter(|b| b.status == BidStatus::Rejected)
        .count();
    assert_eq!(hired, 1);
    assert_eq!(rejected, 1);

    let stored_gig = gig_repo::find_by_id(state.store.pool(), &gig.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_gig.status, GigStatus::Assigned);
}

#[tokio::test]
async fn test_second_hire_conflicts_without_side_effects() {
    let state = test_state().await;
    let owner = register(&state, "owner").await;
    let f1 = register(&state, "freelancer1").await;
    let f2 = register(&state, "freelancer2").await;

    let gig = post_gig(&state, &owner).await;
    let b1 = place_bid(&state, &gig, &f1).await;
    let b2 = place_bid(&state, &gig, &f2).await;

    state.hiring.hire(&gig.id, &b1.id, &owner).await.unwrap();

    let mut f2_rx = subscribe(&state, &Room::user(f2.clone())).await;
    let err = state.hiring.hire(&gig.id, &b2.id, &owner).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    // The losing attempt changes nothing and notifies no one.
    let stored_b2 = bid_repo::find_by_id(state.store.pool(), &b2.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_b2.status, BidStatus::Rejected);
    assert_no_event(&mut f2_rx).await;
}

#[tokio::test]
async fn test_hire_by_non_owner_is_forbidden() {
    let state = test_state().await;
    let owner = register(&state, "owner").await;
    let f1 = register(&state, "freelancer1").await;
    let intruder = register(&state, "intruder").await;

    let gig = post_gig(&state, &owner).await;
    let b1 = place_bid(&state, &gig, &f1).await;

    let err = state.hiring.hire(&gig.id, &b1.id, &intruder).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    // State unchanged.
    let stored_gig = gig_repo::find_by_id(state.store.pool(), &gig.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_gig.status, GigStatus::Open);
    let stored_bid = bid_repo::find_by_id(state.store.pool(), &b1.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_bid.status, BidStatus::Pending);
}

#[tokio::test]
async fn test_hire_with_stale_bid_is_not_found() {
    let state = test_state().await;
    let owner = register(&state, "owner").await;
    let f1 = register(&state, "freelancer1").await;

    let gig_a = post_gig(&state, &owner).await;
    let gig_b = post_gig(&state, &owner).await;
    let bid_on_b = place_bid(&state, &gig_b, &f1).await;

    // The bid references gig B, not gig A.
    let err = state
        .hiring
        .hire(&gig_a.id, &bid_on_b.id, &owner)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let stored_gig = gig_repo::find_by_id(state.store.pool(), &gig_a.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_gig.status, GigStatus::Open);
    let stored_bid = bid_repo::find_by_id(state.store.pool(), &bid_on_b.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_bid.status, BidStatus::Pending);
}

#[tokio::test]
async fn test_reject_siblings_twice_is_idempotent() {
    let state = test_state().await;
    let owner = register(&state, "owner").await;
    let f1 = register(&state, "freelancer1").await;
    let f2 = register(&state, "freelancer2").await;

    let gig = post_gig(&state, &owner).await;
    let keep = place_bid(&state, &gig, &f1).await;
    place_bid(&state, &gig, &f2).await;

    let first = state.bids.reject_siblings(&gig.id, &keep.id).await.unwrap();
    assert_eq!(first, 1);
    let second = state.bids.reject_siblings(&gig.id, &keep.id).await.unwrap();
    assert_eq!(second, 0);

    let bids = bid_repo::list_for_gig(state.store.pool(), &gig.id)
        .await
        .unwrap();
    let pending_others = bids
        .iter()
        .filter(|b| b.id != keep.id && b.status != BidStatus::Rejected)
        .count();
    assert_eq!(pending_others, 0);
}

#[tokio::test]
async fn test_late_bid_on_assigned_gig_is_accepted() {
    let state = test_state().await;
    let owner = register(&state, "owner").await;
    let f1 = register(&state, "freelancer1").await;
    let latecomer = register(&state, "latecomer").await;

    let gig = post_gig(&state, &owner).await;
    let b1 = place_bid(&state, &gig, &f1).await;
    state.hiring.hire(&gig.id, &b1.id, &owner).await.unwrap();

    // Creation checks existence, not openness.
    let late = state
        .bids
        .create_bid(&gig.id, &latecomer, "too late?", 100)
        .await
        .unwrap();
    assert_eq!(late.status, BidStatus::Pending);

    // A repair sweep resolves it.
    state.bids.reject_siblings(&gig.id, &b1.id).await.unwrap();
    let stored = bid_repo::find_by_id(state.store.pool(), &late.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, BidStatus::Rejected);
}

#[tokio::test]
async fn test_bid_on_missing_gig_is_not_found() {
    let state = test_state().await;
    let f1 = register(&state, "freelancer1").await;

    let err = state
        .bids
        .create_bid(&gigboard_models::GigId::from_string("missing"), &f1, "hi", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_new_bid_notifies_gig_room_only() {
    let state = test_state().await;
    let owner = register(&state, "owner").await;
    let f1 = register(&state, "freelancer1").await;

    let gig = post_gig(&state, &owner).await;
    let other_gig = post_gig(&state, &owner).await;

    let mut watching = subscribe(&state, &Room::gig(gig.id.clone())).await;
    let mut elsewhere = subscribe(&state, &Room::gig(other_gig.id.clone())).await;

    let bid = place_bid(&state, &gig, &f1).await;

    let event = recv_event(&mut watching).await;
    match event {
        ServerEvent::NewBid { gig_id, bid_id, .. } => {
            assert_eq!(gig_id, gig.id);
            assert_eq!(bid_id, bid.id);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_no_event(&mut elsewhere).await;
}

#[tokio::test]
async fn test_new_gig_broadcast_skips_owner() {
    let state = test_state().await;
    let owner = register(&state, "owner").await;
    let other = register(&state, "other").await;

    // Both are connected and in the broadcast room; the owner is also in
    // their personal room, which is the exclusion key.
    let (owner_tx, mut owner_rx) = EventBus::channel();
    let owner_conn = state.bus.register(owner_tx).await;
    state.bus.join(owner_conn, &Room::user(owner.clone())).await;
    state.bus.join(owner_conn, &Room::AllUsers).await;

    let (other_tx, mut other_rx) = EventBus::channel();
    let other_conn = state.bus.register(other_tx).await;
    state.bus.join(other_conn, &Room::user(other.clone())).await;
    state.bus.join(other_conn, &Room::AllUsers).await;

    let gig = post_gig(&state, &owner).await;

    let event = recv_event(&mut other_rx).await;
    match event {
        ServerEvent::NewGig { gig_id, gig_title, .. } => {
            assert_eq!(gig_id, gig.id);
            assert_eq!(gig_title, "Logo design");
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_no_event(&mut owner_rx).await;
}
