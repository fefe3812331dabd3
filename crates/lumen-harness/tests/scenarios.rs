//! End-to-end scenarios S1-S6 from the project's testable-properties list.

use std::sync::{
    atomic::{AtomicU8, AtomicUsize, Ordering},
    Arc,
};

use lumen_core::{
    node::{DatagramOutcome, E131Node},
    slp::{ScopeSet, ServiceEntry, SlpStore},
};
use lumen_harness::{scenario::dmx_frame_bytes, MockEnv};
use lumen_proto::{
    cid::Cid,
    dmx::DmxBuffer,
    frame::{self, DataFrame},
    framing::FramingHeader,
};

fn all_zero_cid() -> Cid {
    Cid::new([0u8; 16])
}

/// S1: build an E1.31 frame and check its encoded size and round trip.
#[test]
fn s1_build_frame_has_expected_size_and_round_trips() {
    let mut slots = vec![0u8, 0x01, 0x02, 0x03];
    slots.resize(512, 0);

    let frame = DataFrame {
        cid: all_zero_cid(),
        framing: FramingHeader {
            source_name: "e131".to_string(),
            priority: 1,
            sequence: 2,
            universe: 6001,
        },
        start_code: 0x00,
        slots: DmxBuffer::from_slice(&slots).unwrap(),
    };

    let encoded = frame::encode(&frame).unwrap();
    // preamble 16 + root 22 + framing 77 + DMP 523
    assert_eq!(encoded.len(), 16 + 22 + 77 + 523);

    let decoded = frame::decode(&encoded).unwrap();
    assert_eq!(decoded, frame);
}

/// S2: a frame carrying our own CID is dropped twice without invoking the
/// handler, unless loopback is enabled.
#[test]
fn s2_loopback_is_suppressed() {
    let env = MockEnv::new();
    let mut node = E131Node::new(env, false);
    node.start();
    let own_cid = node.cid();

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    node.set_handler(6001, Box::new(move |_| { calls_clone.fetch_add(1, Ordering::SeqCst); }))
        .unwrap();

    let datagram = dmx_frame_bytes(own_cid, "e131", 1, 2, 6001, 0x01);
    node.on_datagram(&datagram);
    node.on_datagram(&datagram);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// S3: priority arbitration with a 3-second timeout readmission.
#[test]
fn s3_priority_arbitration_and_timeout_readmission() {
    let env = MockEnv::new();
    let mut node = E131Node::new(env.clone(), false);
    node.start();

    let last_slot = Arc::new(AtomicU8::new(0));
    let last_slot_clone = last_slot.clone();
    node.set_handler(
        1,
        Box::new(move |buf| last_slot_clone.store(buf.as_slice()[0], Ordering::SeqCst)),
    )
    .unwrap();

    let cid_a = Cid::new([0xAA; 16]);
    let cid_b = Cid::new([0xBB; 16]);

    node.on_datagram(&dmx_frame_bytes(cid_a, "a", 100, 0, 1, 0x11));
    assert_eq!(last_slot.load(Ordering::SeqCst), 0x11);

    node.on_datagram(&dmx_frame_bytes(cid_b, "b", 150, 0, 1, 0x22));
    assert_eq!(last_slot.load(Ordering::SeqCst), 0x22);

    let outcome = node.on_datagram(&dmx_frame_bytes(cid_a, "a", 100, 1, 1, 0x33));
    assert_eq!(last_slot.load(Ordering::SeqCst), 0x22, "B still holds the universe");
    assert!(matches!(
        outcome,
        DatagramOutcome::Arbitrated(lumen_core::node::ArbitrationOutcome::DroppedArbitration)
    ));

    env.advance_time(3, 0);
    node.on_datagram(&dmx_frame_bytes(cid_a, "a", 100, 1, 1, 0x44));
    assert_eq!(last_slot.load(Ordering::SeqCst), 0x44, "A readmitted after B's timeout");
}

/// S4: basic SLP insert/lookup with a scope mismatch on the second query.
#[test]
fn s4_slp_insert_and_lookup() {
    let mut store: SlpStore<std::time::Instant> = SlpStore::new();
    let now = std::time::Instant::now();

    let scopes = ScopeSet::parse("scope1,scope2").unwrap();
    store
        .insert(now, &ServiceEntry { scopes: scopes.clone(), url: "service:one://192.168.1.1".to_string(), lifetime_seconds: 10 })
        .unwrap();

    let found = store.lookup(now, &scopes, "service:one");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].lifetime, std::time::Duration::from_secs(10));

    let other_scope = ScopeSet::parse("scope3").unwrap();
    assert!(store.lookup(now, &other_scope, "service:one").is_empty());
}

/// S5: a shorter lifetime never shrinks an entry; a longer one extends it.
#[test]
fn s5_double_insert_retains_longer_lifetime() {
    let mut store: SlpStore<std::time::Instant> = SlpStore::new();
    let now = std::time::Instant::now();
    let scopes = ScopeSet::parse("scope1").unwrap();
    let url = "service:one://host1".to_string();

    store.insert(now, &ServiceEntry { scopes: scopes.clone(), url: url.clone(), lifetime_seconds: 10 }).unwrap();
    store.insert(now, &ServiceEntry { scopes: scopes.clone(), url: url.clone(), lifetime_seconds: 5 }).unwrap();

    let found = store.lookup(now, &scopes, "service:one");
    assert_eq!(found[0].lifetime, std::time::Duration::from_secs(10));

    store.insert(now, &ServiceEntry { scopes: scopes.clone(), url, lifetime_seconds: 20 }).unwrap();
    let found = store.lookup(now, &scopes, "service:one");
    assert_eq!(found[0].lifetime, std::time::Duration::from_secs(20));
}

/// S6: aging across two service types advances independently.
#[test]
fn s6_aging_across_two_services() {
    let mut store: SlpStore<std::time::Instant> = SlpStore::new();
    let t0 = std::time::Instant::now();
    let scopes = ScopeSet::parse("scope1").unwrap();

    store
        .insert(t0, &ServiceEntry { scopes: scopes.clone(), url: "service:one://host1".to_string(), lifetime_seconds: 10 })
        .unwrap();

    let t5 = t0 + std::time::Duration::from_secs(5);
    store
        .insert(t5, &ServiceEntry { scopes: scopes.clone(), url: "service:two://host1".to_string(), lifetime_seconds: 10 })
        .unwrap();

    let s1 = store.lookup(t5, &scopes, "service:one");
    assert_eq!(s1[0].lifetime, std::time::Duration::from_secs(5));
    let s2 = store.lookup(t5, &scopes, "service:two");
    assert_eq!(s2[0].lifetime, std::time::Duration::from_secs(10));

    let t10 = t0 + std::time::Duration::from_secs(10);
    assert!(store.lookup(t10, &scopes, "service:one").is_empty());
    let s2 = store.lookup(t10, &scopes, "service:two");
    assert_eq!(s2[0].lifetime, std::time::Duration::from_secs(5));

    let t15 = t0 + std::time::Duration::from_secs(15);
    assert!(store.lookup(t15, &scopes, "service:one").is_empty());
    assert!(store.lookup(t15, &scopes, "service:two").is_empty());
}
