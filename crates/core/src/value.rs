// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The polymorphic value model carried by calls, signals, properties and
//! trace events, and the signature catalog used to describe method/signal/
//! property shapes in a [`crate::MetaObject`]-like catalog.
//!
//! There is no wire bit-format specified at this layer (spec.md §1); this
//! is the in-process value the wire codec serializes to/from JSON.

use serde::{Deserialize, Serialize};

/// Sentinel substituted for any value the tracer refuses to carry.
pub const UNSERIALIZABLE: &str = "**UNSERIALIZABLE**";

/// A dynamically-typed value, exchanged between dynamic objects, carried
/// in calls/signals/properties, and (sanitized) emitted in trace events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum AnyValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<AnyValue>),
    Map(Vec<(AnyValue, AnyValue)>),
    Tuple(Vec<AnyValue>),
    /// Raw bytes — possibly large, refused by the tracer.
    Raw(Vec<u8>),
    /// Opaque handle to a local object — refused by the tracer.
    Object(u64),
    /// Raw pointer-shaped handle — refused by the tracer.
    Pointer(u64),
    /// Type could not be determined — refused by the tracer.
    Unknown,
}

impl AnyValue {
    pub fn from(s: impl Into<String>) -> Self {
        AnyValue::String(s.into())
    }

    /// True for the four kinds spec.md §4.4 calls unserializable:
    /// Unknown, Object, Raw, Pointer.
    fn is_unserializable_kind(&self) -> bool {
        matches!(
            self,
            AnyValue::Unknown | AnyValue::Object(_) | AnyValue::Raw(_) | AnyValue::Pointer(_)
        )
    }
}

/// Replace any sub-value whose kind is Unknown, Object, Raw, or Pointer
/// with the sentinel string [`UNSERIALIZABLE`], recursing structurally
/// through lists, maps, and tuples. Never panics.
pub fn sanitize(value: &AnyValue) -> AnyValue {
    if value.is_unserializable_kind() {
        return AnyValue::from(UNSERIALIZABLE);
    }
    match value {
        AnyValue::List(items) => AnyValue::List(items.iter().map(sanitize).collect()),
        AnyValue::Tuple(items) => AnyValue::Tuple(items.iter().map(sanitize).collect()),
        AnyValue::Map(pairs) => {
            AnyValue::Map(pairs.iter().map(|(k, v)| (sanitize(k), sanitize(v))).collect())
        }
        other => other.clone(),
    }
}

/// Declared shape of a value, used for the optional return-signature
/// compatibility check in `metaCall` (spec.md §4.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signature {
    Unknown,
    Nil,
    Bool,
    Int,
    Float,
    String,
    Raw,
    Object,
    Pointer,
    /// Accepts/produces any value — the universal signature.
    Dynamic,
    List(Box<Signature>),
    Map(Box<Signature>, Box<Signature>),
    Tuple(Vec<Signature>),
}

impl Signature {
    /// Refuses Unknown, Object, Raw, Pointer at any depth — mirrors
    /// `traceValidateSignature` in the original dynamic object core.
    pub fn is_traceable(&self) -> bool {
        match self {
            Signature::Unknown | Signature::Object | Signature::Raw | Signature::Pointer => false,
            Signature::List(inner) => inner.is_traceable(),
            Signature::Map(k, v) => k.is_traceable() && v.is_traceable(),
            Signature::Tuple(items) => items.iter().all(Signature::is_traceable),
            _ => true,
        }
    }

    /// Whether a value shaped `self` can be converted to shape `other`.
    /// `Dynamic` converts freely in both directions; numeric widening
    /// (Int -> Float) is allowed; composites convert elementwise.
    pub fn is_convertible_to(&self, other: &Signature) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (Signature::Dynamic, _) | (_, Signature::Dynamic) => true,
            (Signature::Int, Signature::Float) | (Signature::Float, Signature::Int) => true,
            (Signature::List(a), Signature::List(b)) => a.is_convertible_to(b),
            (Signature::Map(ak, av), Signature::Map(bk, bv)) => {
                ak.is_convertible_to(bk) && av.is_convertible_to(bv)
            }
            (Signature::Tuple(a), Signature::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_convertible_to(y))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
