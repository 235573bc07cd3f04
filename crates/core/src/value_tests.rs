// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    unknown = { AnyValue::Unknown },
    object  = { AnyValue::Object(7) },
    raw     = { AnyValue::Raw(vec![1, 2, 3]) },
    pointer = { AnyValue::Pointer(9) },
)]
fn sanitize_replaces_unserializable_kinds(value: AnyValue) {
    assert_eq!(sanitize(&value), AnyValue::from(UNSERIALIZABLE));
}

#[yare::parameterized(
    nil = { AnyValue::Nil },
    bool_v = { AnyValue::Bool(true) },
    int_v = { AnyValue::Int(42) },
    float_v = { AnyValue::Float(1.5) },
    string_v = { AnyValue::String("hi".into()) },
)]
fn sanitize_passes_through_serializable_scalars(value: AnyValue) {
    assert_eq!(sanitize(&value), value);
}

#[test]
fn sanitize_recurses_into_list() {
    let v = AnyValue::List(vec![AnyValue::Int(1), AnyValue::Object(2), AnyValue::Int(3)]);
    let want = AnyValue::List(vec![
        AnyValue::Int(1),
        AnyValue::from(UNSERIALIZABLE),
        AnyValue::Int(3),
    ]);
    assert_eq!(sanitize(&v), want);
}

#[test]
fn sanitize_recurses_into_tuple_and_map() {
    let tuple = AnyValue::Tuple(vec![AnyValue::Raw(vec![]), AnyValue::Bool(false)]);
    assert_eq!(
        sanitize(&tuple),
        AnyValue::Tuple(vec![AnyValue::from(UNSERIALIZABLE), AnyValue::Bool(false)])
    );

    let map = AnyValue::Map(vec![(AnyValue::String("k".into()), AnyValue::Pointer(1))]);
    assert_eq!(
        sanitize(&map),
        AnyValue::Map(vec![(AnyValue::String("k".into()), AnyValue::from(UNSERIALIZABLE))])
    );
}

#[test]
fn sanitize_recurses_through_nested_lists() {
    let nested = AnyValue::List(vec![AnyValue::List(vec![AnyValue::Unknown])]);
    assert_eq!(
        sanitize(&nested),
        AnyValue::List(vec![AnyValue::List(vec![AnyValue::from(UNSERIALIZABLE)])])
    );
}

#[test]
fn any_value_serde_round_trip() {
    let v = AnyValue::List(vec![AnyValue::Int(1), AnyValue::String("x".into())]);
    let json = serde_json::to_string(&v).unwrap();
    let back: AnyValue = serde_json::from_str(&json).unwrap();
    assert_eq!(v, back);
}

// --- Signature convertibility ---

#[test]
fn signature_same_kind_is_convertible() {
    assert!(Signature::Int.is_convertible_to(&Signature::Int));
}

#[test]
fn signature_numeric_widening_is_convertible_both_ways() {
    assert!(Signature::Int.is_convertible_to(&Signature::Float));
    assert!(Signature::Float.is_convertible_to(&Signature::Int));
}

#[test]
fn signature_dynamic_converts_both_ways() {
    assert!(Signature::Dynamic.is_convertible_to(&Signature::String));
    assert!(Signature::String.is_convertible_to(&Signature::Dynamic));
}

#[test]
fn signature_unrelated_scalars_are_not_convertible() {
    assert!(!Signature::Bool.is_convertible_to(&Signature::String));
}

#[test]
fn signature_list_convertibility_is_elementwise() {
    let a = Signature::List(Box::new(Signature::Int));
    let b = Signature::List(Box::new(Signature::Float));
    assert!(a.is_convertible_to(&b));

    let c = Signature::List(Box::new(Signature::Bool));
    assert!(!a.is_convertible_to(&c));
}

#[test]
fn signature_tuple_requires_same_arity() {
    let a = Signature::Tuple(vec![Signature::Int, Signature::String]);
    let b = Signature::Tuple(vec![Signature::Int]);
    assert!(!a.is_convertible_to(&b));
}

#[yare::parameterized(
    unknown = { Signature::Unknown, false },
    object  = { Signature::Object, false },
    raw     = { Signature::Raw, false },
    pointer = { Signature::Pointer, false },
    int_v   = { Signature::Int, true },
    dynamic = { Signature::Dynamic, true },
)]
fn signature_is_traceable_matches_unserializable_kinds(sig: Signature, expected: bool) {
    assert_eq!(sig.is_traceable(), expected);
}

#[test]
fn signature_is_traceable_recurses() {
    let nested = Signature::List(Box::new(Signature::Object));
    assert!(!nested.is_traceable());
    let ok = Signature::Tuple(vec![Signature::Int, Signature::String]);
    assert!(ok.is_traceable());
}

use proptest::prelude::*;

proptest! {
    #[test]
    fn sanitize_never_panics_and_scalars_round_trip(i in any::<i64>(), s in ".*") {
        let v = AnyValue::Tuple(vec![AnyValue::Int(i), AnyValue::String(s.clone())]);
        let sanitized = sanitize(&v);
        prop_assert_eq!(sanitized, AnyValue::Tuple(vec![AnyValue::Int(i), AnyValue::String(s)]));
    }
}
