mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use message_router::MessageRouter;

use crate::support::Probe;

// --- Registration Counts ---

#[test]
fn single_path_registration_never_duplicates() {
    let router: MessageRouter<i32> = MessageRouter::new();
    assert_eq!(router.copy_entries().len(), 0);

    router.add(|_| {});
    router.add(|_| {});
    assert_eq!(router.copy_entries().len(), 1);
}

#[test]
fn multiple_path_registration_always_appends() {
    let router: MessageRouter<i32> = MessageRouter::new();

    router.add_multiple(|_| {});
    router.add_multiple(|_| {});
    assert_eq!(router.copy_entries().len(), 2);
}

#[test]
fn bound_registration_is_counted() {
    let router: MessageRouter<i32> = MessageRouter::new();
    let probe = Probe::new();

    router.add_bound(&probe, Probe::on_message);
    assert_eq!(router.copy_entries().len(), 1);

    router.add_bound(&probe, Probe::on_message);
    assert_eq!(router.copy_entries().len(), 1);

    router.add_multiple_bound(&probe, Probe::on_message);
    assert_eq!(router.copy_entries().len(), 2);
}

// --- Removal ---

#[test]
fn callback_entry_removed_by_token() {
    let router: MessageRouter<i32> = MessageRouter::new();

    let token = router.add(|_| {});
    assert_eq!(router.copy_entries().len(), 1);

    router.remove(token);
    assert_eq!(router.copy_entries().len(), 0);
}

#[test]
fn bound_entry_removed_by_token() {
    let router: MessageRouter<i32> = MessageRouter::new();
    let probe = Probe::new();

    let token = router.add_bound(&probe, Probe::on_message);
    assert_eq!(router.copy_entries().len(), 1);

    router.remove(token);
    assert_eq!(router.copy_entries().len(), 0);
}

#[test]
fn value_equal_recipients_are_distinct() {
    let router: MessageRouter<i32> = MessageRouter::new();
    let subscribed = Arc::new(42_u32);
    let lookalike = Arc::new(42_u32);

    router.add_bound(&subscribed, |_: &u32, _: &i32| {});
    assert_eq!(router.copy_entries().len(), 1);

    // Same value, different object: nothing may be removed.
    router.remove_recipient(&lookalike);
    assert_eq!(router.copy_entries().len(), 1);
    assert!(router.is_subscribed(&subscribed));
    assert!(!router.is_subscribed(&lookalike));

    router.remove_recipient(&subscribed);
    assert_eq!(router.copy_entries().len(), 0);
}

#[test]
fn clear_resets_for_reuse() {
    let router: MessageRouter<i32> = MessageRouter::new();
    let probe = Probe::new();

    router.add_multiple_bound(&probe, Probe::on_message);
    router.add_multiple_bound(&probe, Probe::on_message);
    router.add_multiple_bound(&probe, Probe::on_message);
    assert_eq!(router.copy_entries().len(), 3);

    router.clear();
    assert_eq!(router.copy_entries().len(), 0);

    router.add_multiple_bound(&probe, Probe::on_message);
    assert_eq!(router.copy_entries().len(), 1);

    router.clear();
    assert_eq!(router.copy_entries().len(), 0);
}

#[test]
fn subscription_status_follows_registration() {
    let router: MessageRouter<i32> = MessageRouter::new();
    let probe = Probe::new();

    assert!(!router.is_subscribed(&probe));
    router.add_bound(&probe, Probe::on_message);
    assert!(router.is_subscribed(&probe));
    router.remove_recipient(&probe);
    assert!(!router.is_subscribed(&probe));
}

// --- Dispatch ---

#[test]
fn every_message_reaches_every_recipient() {
    // m messages to n recipients, for every combination in 0..=3.
    for recipients in 0..=3 {
        for messages in 0..=3 {
            fan_out(recipients, messages);
        }
    }
}

fn fan_out(recipient_count: usize, message_count: usize) {
    let router = MessageRouter::new();
    let hits = Arc::new(AtomicUsize::new(0));

    for _ in 0..recipient_count {
        let counter = Arc::clone(&hits);
        router.add_multiple(move |message: &i32| {
            assert_eq!(*message, 42);
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    for _ in 0..message_count {
        router.send(&42);
    }

    assert_eq!(
        hits.load(Ordering::SeqCst),
        recipient_count * message_count,
        "failed to deliver {} message(s) each to {} recipient(s)",
        message_count,
        recipient_count
    );
}

#[test]
fn entries_fire_in_insertion_order() {
    let router: MessageRouter<i32> = MessageRouter::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for index in 0..3 {
        let log = Arc::clone(&order);
        router.add_multiple(move |_| {
            log.lock().unwrap().push(index);
        });
    }

    router.send(&0);
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn removed_entry_never_fires() {
    let router = MessageRouter::new();
    let token = router.add(|_: &i32| panic!("removed entry was invoked"));

    router.remove(token);
    router.send(&42);
}

#[test]
fn dropped_recipient_never_fires() {
    let router: MessageRouter<i32> = MessageRouter::new();

    {
        let probe = Probe::new();
        router.add_bound(&probe, Probe::must_not_fire);
        // The recipient goes out of scope here; the router must not keep
        // it alive.
    }

    router.send(&42);
    assert_eq!(router.copy_entries().len(), 0);
}

#[test]
fn payload_arrives_intact_at_every_subscriber() {
    struct StatusUpdate {
        name: String,
        value: i64,
        tags: Vec<String>,
    }

    let router: MessageRouter<StatusUpdate> = MessageRouter::new();
    let deliveries = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let counter = Arc::clone(&deliveries);
        router.add_multiple(move |update: &StatusUpdate| {
            assert_eq!(update.name, "cpu");
            assert_eq!(update.value, 87);
            assert_eq!(update.tags, vec!["host-a".to_string(), "rack-9".to_string()]);
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    router.send(&StatusUpdate {
        name: "cpu".to_string(),
        value: 87,
        tags: vec!["host-a".to_string(), "rack-9".to_string()],
    });

    assert_eq!(deliveries.load(Ordering::SeqCst), 2);
}

#[test]
fn bound_entries_receive_on_behalf_of_their_recipient() {
    let router: MessageRouter<i32> = MessageRouter::new();
    let probe = Probe::new();

    router.add_multiple_bound(&probe, Probe::on_message);
    router.add_multiple_bound(&probe, Probe::on_message);

    router.send(&1);
    router.send(&2);

    assert_eq!(probe.count(), 4);
}

// --- Scoped Subscriptions ---

#[test]
fn scoped_subscription_expires_with_its_guard() {
    let router: MessageRouter<i32> = MessageRouter::new();
    let hits = Arc::new(AtomicUsize::new(0));

    {
        let counter = Arc::clone(&hits);
        let _guard = router.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        router.send(&1);
    }

    router.send(&2);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
