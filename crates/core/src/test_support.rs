// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::value::AnyValue;

/// Bounded-depth [`proptest`] strategy for arbitrary [`AnyValue`] trees,
/// for crates that need to exercise sanitization/serialization beyond a
/// handful of hand-written cases.
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    pub fn arb_any_value() -> impl Strategy<Value = AnyValue> {
        let leaf = prop_oneof![
            Just(AnyValue::Nil),
            any::<bool>().prop_map(AnyValue::Bool),
            any::<i64>().prop_map(AnyValue::Int),
            any::<String>().prop_map(AnyValue::String),
            Just(AnyValue::Unknown),
            any::<u64>().prop_map(AnyValue::Object),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(AnyValue::List),
                prop::collection::vec(inner, 0..4).prop_map(AnyValue::Tuple),
            ]
        })
    }
}
