// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use meshrpc_core::{AnyValue, UNSERIALIZABLE};

use super::*;

#[test]
fn sanitizes_values_before_storing_them() {
    let ring = TraceRingBuffer::new(8);
    ring.record(0, TraceEventKind::Call, 1, &AnyValue::Object(42));
    let snap = ring.snapshot();
    assert_eq!(snap[0].value, AnyValue::from(UNSERIALIZABLE));
}

#[test]
fn drops_oldest_entry_once_over_capacity() {
    let ring = TraceRingBuffer::new(2);
    for i in 0..3 {
        ring.record(i, TraceEventKind::Call, i as u32, &AnyValue::Int(i as i64));
    }
    let snap = ring.snapshot();
    assert_eq!(snap.len(), 2);
    assert_eq!(snap[0].trace_id, 1);
    assert_eq!(snap[1].trace_id, 2);
}

#[test]
fn trace_ids_are_monotonic() {
    let ring = TraceRingBuffer::new(8);
    let a = ring.next_trace_id();
    let b = ring.next_trace_id();
    assert!(b > a);
}
