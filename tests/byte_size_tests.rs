//! Tests for byte-size accessors and write-time bound validation.

use confstore::bytes::{GB, KB, MB, PB, TB};
use confstore::{ErrorCode, KeyDef, KeySet, PropertyStore};

const THREADS: &str = "app.web.threads";
const BUFFER: &str = "app.io.buffer.bytes";

/// Helper to create a store with one free-form key and one bounded
/// byte-size key.
fn setup_store() -> PropertyStore {
    PropertyStore::new(KeySet::new([
        KeyDef::new(THREADS),
        KeyDef::new(BUFFER).sized_int(),
    ]))
}

#[test]
fn get_bytes() {
    let store = setup_store();
    store.set(THREADS, "10b").expect("Failed to set");
    assert_eq!(store.get_bytes(THREADS).expect("Failed to get bytes"), 10);
}

#[test]
fn get_bytes_kb() {
    let store = setup_store();
    store.set(THREADS, "10kb").expect("Failed to set");
    assert_eq!(store.get_bytes(THREADS).expect("Failed to get bytes"), 10 * KB);
}

#[test]
fn get_bytes_mb() {
    let store = setup_store();
    store.set(THREADS, "10mb").expect("Failed to set");
    assert_eq!(store.get_bytes(THREADS).expect("Failed to get bytes"), 10 * MB);
}

#[test]
fn get_bytes_gb() {
    let store = setup_store();
    store.set(THREADS, "10gb").expect("Failed to set");
    assert_eq!(store.get_bytes(THREADS).expect("Failed to get bytes"), 10 * GB);
}

#[test]
fn get_bytes_gb_uppercase() {
    let store = setup_store();
    store.set(THREADS, "10GB").expect("Failed to set");
    assert_eq!(store.get_bytes(THREADS).expect("Failed to get bytes"), 10 * GB);
}

#[test]
fn get_bytes_tb() {
    let store = setup_store();
    store.set(THREADS, "10tb").expect("Failed to set");
    assert_eq!(store.get_bytes(THREADS).expect("Failed to get bytes"), 10 * TB);
}

#[test]
fn get_bytes_pb() {
    let store = setup_store();
    store.set(THREADS, "10pb").expect("Failed to set");
    assert_eq!(store.get_bytes(THREADS).expect("Failed to get bytes"), 10 * PB);
}

#[test]
fn get_bytes_without_unit_is_raw_bytes() {
    let store = setup_store();
    store.set(THREADS, "4096").expect("Failed to set");
    assert_eq!(store.get_bytes(THREADS).expect("Failed to get bytes"), 4 * KB);
}

#[test]
fn get_bytes_fractional_truncates() {
    let store = setup_store();
    store.set(THREADS, "0.5kb").expect("Failed to set");
    assert_eq!(store.get_bytes(THREADS).expect("Failed to get bytes"), 512);
}

#[test]
fn get_malformed_bytes_fails() {
    let store = setup_store();
    store.set(THREADS, "100a").expect("Failed to set");
    let err = store.get_bytes(THREADS).unwrap_err();
    assert_eq!(err.code, ErrorCode::MalformedValue);
    assert_eq!(err.key.as_deref(), Some(THREADS));
    assert_eq!(err.raw.as_deref(), Some("100a"));
}

#[test]
fn bounded_key_overflow_fails_at_set_time() {
    let store = setup_store();
    let err = store
        .set(BUFFER, format!("{}B", i32::MAX as i64 + 1))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OutOfRange);
    // The failed set wrote nothing.
    assert!(!store.contains_key(BUFFER));
}

#[test]
fn bounded_key_max_value_round_trips() {
    let store = setup_store();
    store
        .set(BUFFER, format!("{}B", i32::MAX))
        .expect("Failed to set max value");
    assert_eq!(
        store.get_bytes(BUFFER).expect("Failed to get bytes"),
        i32::MAX as i64
    );
}

#[test]
fn bounded_key_accepts_one_gigabyte() {
    let store = setup_store();
    store.set(BUFFER, "1GB").expect("Failed to set");
    assert_eq!(
        store.get_bytes(BUFFER).expect("Failed to get bytes"),
        1073741824
    );
}

#[test]
fn bounded_key_rejects_malformed_value_at_set_time() {
    let store = setup_store();
    let err = store.set(BUFFER, "100a").unwrap_err();
    assert_eq!(err.code, ErrorCode::MalformedValue);
}

#[test]
fn unbounded_key_defers_validation_to_read_time() {
    let store = setup_store();
    // A free-form key accepts any text at set time.
    store.set(THREADS, "not a size").expect("Failed to set");
    assert!(store.get_bytes(THREADS).is_err());
}
