// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal subscriber list and link packing, grounded on
//! `DynamicObject::metaConnect`'s `(event_id << 32) | local_link_id`
//! construction and its round-trip assertions.

use std::collections::BTreeMap;
use std::sync::Arc;

use meshrpc_core::AnyValue;

pub type Subscriber = Arc<dyn Fn(&[AnyValue]) + Send + Sync>;

/// A 64-bit subscription handle. The upper 32 bits recover the event ID
/// that produced it; the lower 32 bits are a per-signal, per-subscriber
/// link ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalLink(pub u64);

impl SignalLink {
    pub fn pack(event_id: u32, link_id: u32) -> Self {
        let link = ((event_id as u64) << 32) | link_id as u64;
        debug_assert_eq!((link >> 32) as u32, event_id);
        debug_assert_eq!((link & 0xFFFF_FFFF) as u32, link_id);
        Self(link)
    }

    pub fn event_id(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub fn link_id(self) -> u32 {
        (self.0 & 0xFFFF_FFFF) as u32
    }
}

/// An emittable signal with subscribers in registration order. A
/// `BTreeMap` keyed by link ID keeps the ordering guarantee simple and
/// explicit rather than relying on incidental hash-map iteration order.
#[derive(Default)]
pub struct SignalBase {
    subscribers: BTreeMap<u32, Subscriber>,
    next_link_id: u32,
}

impl SignalBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `subscriber`, returning the new link's local ID (not yet
    /// combined with the event ID — callers pack that via
    /// [`SignalLink::pack`]).
    pub fn connect(&mut self, subscriber: Subscriber) -> u32 {
        let id = self.next_link_id;
        self.next_link_id += 1;
        self.subscribers.insert(id, subscriber);
        id
    }

    pub fn disconnect(&mut self, link_id: u32) -> bool {
        self.subscribers.remove(&link_id).is_some()
    }

    /// Invoke every subscriber with `params`, in registration order.
    /// Synchronous: a single subscriber of a single signal always
    /// observes emissions in emit order (spec.md §5).
    pub fn trigger(&self, params: &[AnyValue]) {
        for subscriber in self.subscribers.values() {
            subscriber(params);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
