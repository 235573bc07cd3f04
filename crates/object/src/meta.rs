// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The name/signature catalog a `DynamicObject` exposes, spec.md §4.3.

use std::collections::HashMap;

use meshrpc_core::{AnyValue, CoreError, Signature};

#[derive(Debug, Clone, PartialEq)]
pub struct MetaMethod {
    pub id: u32,
    pub name: String,
    pub param_signature: Signature,
    pub return_signature: Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaSignal {
    pub id: u32,
    pub name: String,
    pub param_signature: Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaProperty {
    pub id: u32,
    pub name: String,
    pub signature: Signature,
}

/// Name/signature catalog. Populated once at object construction;
/// `DynamicObject` consults it on demand rather than copying it into
/// every table lookup.
#[derive(Debug, Clone, Default)]
pub struct MetaObject {
    methods: HashMap<u32, MetaMethod>,
    signals: HashMap<u32, MetaSignal>,
    properties: HashMap<u32, MetaProperty>,
}

impl MetaObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, m: MetaMethod) -> Self {
        self.methods.insert(m.id, m);
        self
    }

    pub fn with_signal(mut self, s: MetaSignal) -> Self {
        self.signals.insert(s.id, s);
        self
    }

    pub fn with_property(mut self, p: MetaProperty) -> Self {
        self.properties.insert(p.id, p);
        self
    }

    pub fn method(&self, id: u32) -> Option<&MetaMethod> {
        self.methods.get(&id)
    }

    /// Linear scan by name — the catalog is small and this is only used
    /// for call sites that address a method by name (e.g. `RemoteObject`).
    pub fn find_method(&self, name: &str) -> Option<&MetaMethod> {
        self.methods.values().find(|m| m.name == name)
    }

    pub fn signal(&self, id: u32) -> Option<&MetaSignal> {
        self.signals.get(&id)
    }

    pub fn property(&self, id: u32) -> Option<&MetaProperty> {
        self.properties.get(&id)
    }

    /// Union of two catalogs, keeping `self`'s entry on an id collision.
    /// Used to fold the framework's Manageable methods into a user
    /// object's catalog.
    pub fn merge(self, other: MetaObject) -> MetaObject {
        let mut methods = other.methods;
        methods.extend(self.methods);
        let mut signals = other.signals;
        signals.extend(self.signals);
        let mut properties = other.properties;
        properties.extend(self.properties);
        MetaObject { methods, signals, properties }
    }
}

#[allow(clippy::expect_used)]
fn sig_to_any(sig: &Signature) -> AnyValue {
    AnyValue::from(serde_json::to_string(sig).expect("Signature always serializes"))
}

fn sig_from_any(value: &AnyValue) -> Result<Signature, CoreError> {
    let AnyValue::String(json) = value else {
        return Err(CoreError::resolution("signature is not a string"));
    };
    serde_json::from_str(json).map_err(|err| CoreError::resolution(err.to_string()))
}

impl MetaObject {
    /// Encodes the catalog as `(methods, signals, properties)`, each a
    /// list of `(id, name, signature...)` tuples — what a `RemoteObject`
    /// fetches in place of the original's binary metaObject marshaling.
    pub fn to_any(&self) -> AnyValue {
        let methods = self
            .methods
            .values()
            .map(|m| {
                AnyValue::Tuple(vec![
                    AnyValue::Int(m.id as i64),
                    AnyValue::from(m.name.clone()),
                    sig_to_any(&m.param_signature),
                    sig_to_any(&m.return_signature),
                ])
            })
            .collect();
        let signals = self
            .signals
            .values()
            .map(|s| {
                AnyValue::Tuple(vec![
                    AnyValue::Int(s.id as i64),
                    AnyValue::from(s.name.clone()),
                    sig_to_any(&s.param_signature),
                ])
            })
            .collect();
        let properties = self
            .properties
            .values()
            .map(|p| {
                AnyValue::Tuple(vec![
                    AnyValue::Int(p.id as i64),
                    AnyValue::from(p.name.clone()),
                    sig_to_any(&p.signature),
                ])
            })
            .collect();
        AnyValue::Tuple(vec![AnyValue::List(methods), AnyValue::List(signals), AnyValue::List(properties)])
    }

    /// Inverse of [`to_any`](Self::to_any).
    pub fn from_any(value: &AnyValue) -> Result<Self, CoreError> {
        let AnyValue::Tuple(fields) = value else {
            return Err(CoreError::resolution("meta object is not a tuple"));
        };
        let [AnyValue::List(methods), AnyValue::List(signals), AnyValue::List(properties)] =
            &fields[..]
        else {
            return Err(CoreError::resolution("malformed meta object tuple"));
        };

        let mut meta = MetaObject::new();
        for entry in methods {
            let AnyValue::Tuple(f) = entry else {
                return Err(CoreError::resolution("malformed meta method entry"));
            };
            let [AnyValue::Int(id), AnyValue::String(name), param, ret] = &f[..] else {
                return Err(CoreError::resolution("malformed meta method entry"));
            };
            meta = meta.with_method(MetaMethod {
                id: *id as u32,
                name: name.clone(),
                param_signature: sig_from_any(param)?,
                return_signature: sig_from_any(ret)?,
            });
        }
        for entry in signals {
            let AnyValue::Tuple(f) = entry else {
                return Err(CoreError::resolution("malformed meta signal entry"));
            };
            let [AnyValue::Int(id), AnyValue::String(name), param] = &f[..] else {
                return Err(CoreError::resolution("malformed meta signal entry"));
            };
            meta = meta.with_signal(MetaSignal {
                id: *id as u32,
                name: name.clone(),
                param_signature: sig_from_any(param)?,
            });
        }
        for entry in properties {
            let AnyValue::Tuple(f) = entry else {
                return Err(CoreError::resolution("malformed meta property entry"));
            };
            let [AnyValue::Int(id), AnyValue::String(name), sig] = &f[..] else {
                return Err(CoreError::resolution("malformed meta property entry"));
            };
            meta = meta.with_property(MetaProperty {
                id: *id as u32,
                name: name.clone(),
                signature: sig_from_any(sig)?,
            });
        }
        Ok(meta)
    }
}

#[cfg(test)]
#[path = "meta_tests.rs"]
mod tests;
