// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::{Arc, Mutex};

use meshrpc_core::AnyValue;

use super::*;

#[test]
fn get_reflects_the_last_set_value() {
    let cell = PropertyCell::new(AnyValue::Nil);
    assert_eq!(cell.get(), AnyValue::Nil);
    cell.set(AnyValue::Int(7));
    assert_eq!(cell.get(), AnyValue::Int(7));
}

#[test]
fn setting_the_value_triggers_its_change_signal() {
    let cell = PropertyCell::new(AnyValue::Nil);
    let seen = Arc::new(Mutex::new(None));
    let s = seen.clone();
    cell.signal().lock().connect(Arc::new(move |params: &[AnyValue]| {
        *s.lock().unwrap() = params.first().cloned();
    }));
    cell.set(AnyValue::Int(5));
    assert_eq!(*seen.lock().unwrap(), Some(AnyValue::Int(5)));
}
