// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The message shape the core routes by `(service, object, action)`,
//! spec.md §6. The binary wire format is explicitly out of scope there;
//! this crate's [`crate::codec`] picks one (length-prefixed JSON) so the
//! rest of the workspace has something concrete to send and receive.

use meshrpc_core::AnyValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Call,
    Reply,
    Error,
    Event,
    Post,
}

/// Opaque at the transport layer: the core only inspects `kind` and the
/// `(service, object, action)` routing triple, never `payload`'s shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub service: u32,
    pub object: u32,
    pub action: u32,
    pub payload: AnyValue,
}

impl Message {
    pub fn call(service: u32, object: u32, action: u32, payload: AnyValue) -> Self {
        Self { kind: MessageKind::Call, service, object, action, payload }
    }

    pub fn reply(service: u32, object: u32, action: u32, payload: AnyValue) -> Self {
        Self { kind: MessageKind::Reply, service, object, action, payload }
    }

    pub fn error(service: u32, object: u32, action: u32, message: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            service,
            object,
            action,
            payload: AnyValue::from(message.into()),
        }
    }

    pub fn event(service: u32, object: u32, action: u32, payload: AnyValue) -> Self {
        Self { kind: MessageKind::Event, service, object, action, payload }
    }

    pub fn post(service: u32, object: u32, action: u32, payload: AnyValue) -> Self {
        Self { kind: MessageKind::Post, service, object, action, payload }
    }

    /// The `(service, object, action)` triple the core routes by.
    pub fn route(&self) -> (u32, u32, u32) {
        (self.service, self.object, self.action)
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
