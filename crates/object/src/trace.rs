// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `EventTrace` emission, grounded on the `call()` helper's trace
//! branch in the original dynamic object core: one `Event_Call` when a
//! method starts, one `Event_Result`/`Event_Error` when it finishes,
//! both carrying a sanitized value and sharing a trace ID.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use meshrpc_core::{sanitize, AnyValue};
use parking_lot::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEventKind {
    Call,
    Result,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventTrace {
    pub trace_id: u32,
    pub kind: TraceEventKind,
    pub method_id: u32,
    /// Already sanitized — never carries an Object/Raw/Pointer/Unknown.
    pub value: AnyValue,
}

/// A bounded in-memory log of trace events. Grounded on the same
/// instinct as the teacher's archived event log, minus persistence:
/// spec.md carries no storage layer, so this never touches disk.
pub struct TraceRingBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<EventTrace>>,
    next_id: AtomicU32,
}

impl TraceRingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: Mutex::new(VecDeque::with_capacity(capacity)), next_id: AtomicU32::new(0) }
    }

    /// 32-bit monotonic per spec.md §9; wraps rather than panics once
    /// every id has been handed out.
    pub fn next_trace_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a call/result/error event, sanitizing its carried value.
    pub fn record(&self, trace_id: u32, kind: TraceEventKind, method_id: u32, value: &AnyValue) {
        let value = sanitize(value);
        debug!(trace_id, method_id, ?kind, "trace event");
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(EventTrace { trace_id, kind, method_id, value });
    }

    pub fn snapshot(&self) -> Vec<EventTrace> {
        self.entries.lock().iter().cloned().collect()
    }
}

#[cfg(test)]
#[path = "trace_tests.rs"]
mod tests;
