// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lazily-typed property cell, grounded on
//! `DynamicObjectPrivate::property()`'s on-demand `GenericProperty`
//! construction. A property is a value cell plus the change signal
//! exposed under the same ID (spec.md §4.3).

use parking_lot::Mutex;

use meshrpc_core::AnyValue;

use crate::signal::SignalBase;

pub struct PropertyCell {
    value: Mutex<AnyValue>,
    signal: Mutex<SignalBase>,
}

impl PropertyCell {
    pub fn new(initial: AnyValue) -> Self {
        Self { value: Mutex::new(initial), signal: Mutex::new(SignalBase::new()) }
    }

    pub fn get(&self) -> AnyValue {
        self.value.lock().clone()
    }

    /// Set the value and notify subscribers of the property's change
    /// signal with the new value.
    pub fn set(&self, value: AnyValue) {
        *self.value.lock() = value.clone();
        self.signal.lock().trigger(std::slice::from_ref(&value));
    }

    pub fn signal(&self) -> &Mutex<SignalBase> {
        &self.signal
    }
}

#[cfg(test)]
#[path = "property_tests.rs"]
mod tests;
