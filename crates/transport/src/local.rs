// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-process `"local"` protocol: two same-process endpoints talk
//! through channels rather than a socket, skipping serialization
//! entirely. Used for colocated services and tests, the same role
//! libqi's local transport plays for same-process objects.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use meshrpc_wire::{EndpointUrl, Message, MessageKind};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, Notify};
use tracing::warn;

use crate::error::CacheError;
use crate::router::Router;
use crate::transport::{Connector, Transport};

struct Envelope {
    message: Message,
    reply_to: Option<oneshot::Sender<Message>>,
}

type Registry = Mutex<HashMap<String, mpsc::UnboundedSender<Envelope>>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// A handle bound under `name` in the process-wide local registry;
/// dropping it does not stop the listening task, matching how a bound
/// TCP listener keeps accepting until the process exits.
pub struct LocalListener {
    name: String,
}

impl LocalListener {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Register `name` as a local endpoint, dispatching incoming
/// `Call`/`Post` messages through `router`.
pub fn listen(name: impl Into<String>, router: Router) -> LocalListener {
    let name = name.into();
    let (tx, mut rx) = mpsc::unbounded_channel::<Envelope>();
    registry().lock().insert(name.clone(), tx);

    tokio::spawn(async move {
        while let Some(Envelope { message, reply_to }) = rx.recv().await {
            let router = router.clone();
            tokio::spawn(async move {
                let kind = message.kind;
                let reply = router.dispatch(message).await;
                match (kind, reply, reply_to) {
                    (MessageKind::Call, Some(reply), Some(reply_to)) => {
                        let _ = reply_to.send(reply);
                    }
                    (MessageKind::Call, None, Some(_)) => {
                        warn!("local call produced no reply");
                    }
                    _ => {}
                }
            });
        }
    });

    LocalListener { name }
}

/// Dials names registered via [`listen`].
pub struct LocalConnector;

#[async_trait]
impl Connector for LocalConnector {
    async fn dial(&self, url: &EndpointUrl) -> Result<Arc<dyn Transport>, CacheError> {
        let peer = registry()
            .lock()
            .get(&url.host)
            .cloned()
            .ok_or_else(|| CacheError::connect_failed(url))?;
        Ok(Arc::new(LocalTransport {
            url: url.clone(),
            peer,
            closed: Arc::new(Notify::new()),
            dead: Arc::new(AtomicBool::new(false)),
        }))
    }

    fn protocol(&self) -> &str {
        "local"
    }
}

struct LocalTransport {
    url: EndpointUrl,
    peer: mpsc::UnboundedSender<Envelope>,
    closed: Arc<Notify>,
    dead: Arc<AtomicBool>,
}

impl LocalTransport {
    fn mark_dead(&self) {
        if !self.dead.swap(true, Ordering::AcqRel) {
            self.closed.notify_waiters();
        }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn connect(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn send(&self, message: Message) -> bool {
        if self.peer.send(Envelope { message, reply_to: None }).is_ok() {
            return true;
        }
        self.mark_dead();
        false
    }

    async fn call(&self, message: Message) -> Result<Message, CacheError> {
        let (tx, rx) = oneshot::channel();
        if self.peer.send(Envelope { message, reply_to: Some(tx) }).is_err() {
            self.mark_dead();
            return Err(CacheError::connect_failed(&self.url));
        }
        rx.await.map_err(|_| {
            self.mark_dead();
            CacheError::connect_failed(&self.url)
        })
    }

    fn url(&self) -> EndpointUrl {
        self.url.clone()
    }

    async fn closed(&self) {
        if !self.dead.load(Ordering::Acquire) {
            self.closed.notified().await;
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
