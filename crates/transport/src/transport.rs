// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The transport contract consumed by the rest of the core (spec.md
//! §6): connect, send, the endpoint a transport is bound to, and a
//! capability query used by the session resolver's socket-reuse check.

use async_trait::async_trait;
use meshrpc_wire::{EndpointUrl, Message};

use crate::error::CacheError;

/// A concrete way of reaching a peer (TCP, in-process "local", ...).
/// One [`Transport`] backs exactly one [`crate::Socket`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish the connection. Called at most once per transport
    /// instance; the cache creates a fresh instance to reconnect.
    async fn connect(&self) -> Result<(), CacheError>;

    /// Best-effort, non-blocking send. `false` means the message was
    /// dropped (e.g. the peer already disconnected).
    async fn send(&self, message: Message) -> bool;

    /// Send a `Call` and await its matching `Reply`/`Error`. The wire
    /// shape (spec.md §6) carries no request id, so a transport that
    /// multiplexes many in-flight calls over one connection matches
    /// replies to calls in FIFO order per `(service, object, action)`;
    /// callers that need more than one in-flight call per route at a
    /// time should open another socket.
    async fn call(&self, message: Message) -> Result<Message, CacheError>;

    fn url(&self) -> EndpointUrl;

    /// Resolves once the peer has disconnected. Transports that never
    /// disconnect on their own (the in-process "local" transport) never
    /// resolve it.
    async fn closed(&self) {
        std::future::pending::<()>().await;
    }

    /// Whether the peer advertises `name`, defaulting to `default` when
    /// the transport has no opinion (e.g. the in-process "local"
    /// transport always returns `default`).
    fn remote_capability(&self, name: &str, default: bool) -> bool {
        let _ = name;
        default
    }
}

/// Builds a [`Transport`] for a given endpoint. Implemented once per
/// protocol (`tcp`, `local`); the cache holds one connector per
/// protocol it knows how to dial.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn dial(&self, url: &EndpointUrl) -> Result<std::sync::Arc<dyn Transport>, CacheError>;

    /// The protocol string this connector handles (`"tcp"`, `"local"`).
    fn protocol(&self) -> &str;
}
