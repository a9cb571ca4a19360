use coha_telemetry::{init_tracing, new_batch_id};

#[test]
fn batch_ids_are_unique() {
    let first = new_batch_id();
    let second = new_batch_id();
    assert!(!first.is_empty());
    assert_ne!(first, second);
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
