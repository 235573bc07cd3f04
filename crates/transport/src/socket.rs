// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A connected (or connecting) peer: a [`crate::Transport`] plus the
//! `connected`/`disconnected` notifications spec.md §6 requires of it,
//! built on the same signal primitive `meshrpc-object` uses for its own
//! events rather than a bespoke callback list.

use std::sync::Arc;

use meshrpc_core::{define_id, AnyValue};
use meshrpc_object::{SignalBase, SignalLink, Subscriber};
use meshrpc_wire::{EndpointUrl, Message};
use parking_lot::Mutex;

use crate::transport::Transport;

define_id! {
    /// Identifies a socket for the lifetime of the process; used as the
    /// cache key in `ServiceDirectory::socketToIds` (spec.md §3).
    pub struct SocketId("sck-");
}

/// Link IDs under these two synthetic event IDs separate `connected`
/// from `disconnected` subscriptions sharing one `SignalLink` address
/// space, mirroring how `DynamicObject` packs event id with link id.
const CONNECTED_EVENT: u32 = 0;
const DISCONNECTED_EVENT: u32 = 1;

struct Inner {
    id: SocketId,
    transport: Arc<dyn Transport>,
    connected: Mutex<SignalBase>,
    disconnected: Mutex<SignalBase>,
}

/// Cheap to clone: every clone refers to the same underlying transport
/// and subscriber lists.
#[derive(Clone)]
pub struct Socket {
    inner: Arc<Inner>,
}

impl Socket {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: SocketId::new(),
                transport,
                connected: Mutex::new(SignalBase::new()),
                disconnected: Mutex::new(SignalBase::new()),
            }),
        }
    }

    pub fn id(&self) -> SocketId {
        self.inner.id
    }

    pub fn url(&self) -> EndpointUrl {
        self.inner.transport.url()
    }

    pub fn remote_capability(&self, name: &str, default: bool) -> bool {
        self.inner.transport.remote_capability(name, default)
    }

    pub async fn send(&self, message: Message) -> bool {
        self.inner.transport.send(message).await
    }

    pub async fn call(&self, message: Message) -> Result<Message, crate::error::CacheError> {
        self.inner.transport.call(message).await
    }

    /// Resolves when the underlying transport reports the peer gone.
    pub async fn wait_closed(&self) {
        self.inner.transport.closed().await;
    }

    pub fn on_connected(&self, subscriber: Subscriber) -> SignalLink {
        SignalLink::pack(CONNECTED_EVENT, self.inner.connected.lock().connect(subscriber))
    }

    pub fn on_disconnected(&self, subscriber: Subscriber) -> SignalLink {
        SignalLink::pack(DISCONNECTED_EVENT, self.inner.disconnected.lock().connect(subscriber))
    }

    pub(crate) fn notify_connected(&self) {
        self.inner.connected.lock().trigger(&[]);
    }

    pub(crate) fn notify_disconnected(&self, reason: impl Into<String>) {
        self.inner.disconnected.lock().trigger(&[AnyValue::from(reason.into())]);
    }
}

impl PartialEq for Socket {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Socket {}

impl std::hash::Hash for Socket {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl std::fmt::Debug for Socket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Socket").field("id", &self.inner.id).field("url", &self.url()).finish()
    }
}

#[cfg(test)]
#[path = "socket_tests.rs"]
mod tests;
