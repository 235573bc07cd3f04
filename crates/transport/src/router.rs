// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binds [`DynamicObject`]s to `(service, object)` pairs so an incoming
//! `Call`/`Post` message can be routed to the right receiver, spec.md
//! §6's "ability to bind a BoundObject serving a given serviceId".

use std::collections::HashMap;
use std::sync::Arc;

use meshrpc_core::AnyValue;
use meshrpc_object::{DynamicObject, MetaCallType};
use meshrpc_wire::{Message, MessageKind};
use parking_lot::RwLock;
use tracing::warn;

struct Inner {
    bound: RwLock<HashMap<(u32, u32), DynamicObject>>,
}

/// Cheap to clone: shares the same binding table, so the same router
/// can be handed to every connection-handling task.
#[derive(Clone)]
pub struct Router {
    inner: Arc<Inner>,
}

impl Router {
    pub fn new() -> Self {
        Self { inner: Arc::new(Inner { bound: RwLock::new(HashMap::new()) }) }
    }

    pub fn bind(&self, service_id: u32, object_id: u32, object: DynamicObject) {
        self.inner.bound.write().insert((service_id, object_id), object);
    }

    pub fn unbind(&self, service_id: u32, object_id: u32) {
        self.inner.bound.write().remove(&(service_id, object_id));
    }

    fn object(&self, service_id: u32, object_id: u32) -> Option<DynamicObject> {
        self.inner.bound.read().get(&(service_id, object_id)).cloned()
    }

    /// Dispatch one incoming message, returning a reply to send back
    /// (for `Call`) or `None` (for everything else, including `Post`,
    /// which is fire-and-forget).
    pub async fn dispatch(&self, message: Message) -> Option<Message> {
        let (service, object, action) = message.route();
        match message.kind {
            MessageKind::Call => {
                let Some(target) = self.object(service, object) else {
                    warn!(service, object, action, "call to unbound object");
                    return Some(Message::error(
                        service,
                        object,
                        action,
                        format!("no such object: service {service} object {object}"),
                    ));
                };
                let params = into_params(message.payload);
                match target.meta_call(action, params, MetaCallType::Auto, None).await {
                    Ok(value) => Some(Message::reply(service, object, action, value)),
                    Err(err) => Some(Message::error(service, object, action, err.to_string())),
                }
            }
            MessageKind::Post => {
                if let Some(target) = self.object(service, object) {
                    target.meta_post(action, into_params(message.payload));
                } else {
                    warn!(service, object, action, "post to unbound object");
                }
                None
            }
            MessageKind::Reply | MessageKind::Error | MessageKind::Event => None,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn into_params(payload: AnyValue) -> Vec<AnyValue> {
    match payload {
        AnyValue::Tuple(params) | AnyValue::List(params) => params,
        AnyValue::Nil => Vec::new(),
        other => vec![other],
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
