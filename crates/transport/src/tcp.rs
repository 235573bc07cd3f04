// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP transport: one reader task per connection decodes frames and
//! either matches them to a waiting caller (`Reply`/`Error`) or routes
//! them into the local [`Router`] (`Call`/`Post`).

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use meshrpc_wire::{read_message, write_message, EndpointUrl, Message, MessageKind};
use parking_lot::Mutex;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, Notify};
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::router::Router;
use crate::transport::{Connector, Transport};

type RouteKey = (u32, u32, u32);

struct TcpTransport {
    url: EndpointUrl,
    write: tokio::sync::Mutex<OwnedWriteHalf>,
    pending: Mutex<HashMap<RouteKey, VecDeque<oneshot::Sender<Message>>>>,
    closed: Arc<Notify>,
    dead: Arc<AtomicBool>,
}

impl TcpTransport {
    fn spawn(url: EndpointUrl, stream: TcpStream, router: Router) -> Arc<Self> {
        let (mut read_half, write_half) = stream.into_split();
        let transport = Arc::new(Self {
            url: url.clone(),
            write: tokio::sync::Mutex::new(write_half),
            pending: Mutex::new(HashMap::new()),
            closed: Arc::new(Notify::new()),
            dead: Arc::new(AtomicBool::new(false)),
        });

        let reader_transport = transport.clone();
        tokio::spawn(async move {
            loop {
                match read_message(&mut read_half).await {
                    Ok(Some(message)) => reader_transport.on_message(message, &router),
                    Ok(None) => {
                        debug!(%url, "peer closed the connection");
                        break;
                    }
                    Err(err) => {
                        warn!(%url, %err, "tcp read error");
                        break;
                    }
                }
            }
            reader_transport.mark_dead();
        });

        transport
    }

    fn on_message(self: &Arc<Self>, message: Message, router: &Router) {
        match message.kind {
            MessageKind::Reply | MessageKind::Error => {
                let key = message.route();
                let waiter = self.pending.lock().get_mut(&key).and_then(VecDeque::pop_front);
                match waiter {
                    Some(tx) => {
                        let _ = tx.send(message);
                    }
                    None => warn!(?key, "reply with no waiting caller"),
                }
            }
            MessageKind::Call | MessageKind::Post => {
                let router = router.clone();
                let this = self.clone();
                tokio::spawn(async move {
                    if let Some(reply) = router.dispatch(message).await {
                        let _ = this.write_message(reply).await;
                    }
                });
            }
            MessageKind::Event => {
                debug!("dropping inbound event at the transport layer");
            }
        }
    }

    fn mark_dead(&self) {
        if !self.dead.swap(true, Ordering::AcqRel) {
            self.closed.notify_waiters();
        }
    }

    async fn write_message(&self, message: Message) -> Result<(), CacheError> {
        let mut write = self.write.lock().await;
        write_message(&mut *write, &message)
            .await
            .map_err(|err| CacheError::Core(meshrpc_core::CoreError::transport(err.to_string())))
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn send(&self, message: Message) -> bool {
        self.write_message(message).await.is_ok()
    }

    async fn call(&self, message: Message) -> Result<Message, CacheError> {
        let key = message.route();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().entry(key).or_default().push_back(tx);
        self.write_message(message).await?;
        rx.await.map_err(|_| CacheError::connect_failed(&self.url))
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

/// Dials TCP endpoints, routing any inbound `Call`/`Post` into `router`
/// (supporting bidirectional use: a client socket that also serves
/// objects the peer has subscribed to).
pub struct TcpConnector {
    router: Router,
}

impl TcpConnector {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn dial(&self, url: &EndpointUrl) -> Result<Arc<dyn Transport>, CacheError> {
        let stream = TcpStream::connect((url.host.as_str(), url.port))
            .await
            .map_err(|err| CacheError::Core(meshrpc_core::CoreError::transport(err.to_string())))?;
        Ok(TcpTransport::spawn(url.clone(), stream, self.router.clone()))
    }

    fn protocol(&self) -> &str {
        "tcp"
    }
}

/// Accept one incoming TCP connection, wrapping it as a [`crate::Socket`]
/// that routes inbound calls through `router`. Intended to be called in
/// a loop by the owner of the listening socket (`meshrpc-node`).
pub async fn accept(
    listener: &TcpListener,
    router: Router,
) -> std::io::Result<(crate::Socket, std::net::SocketAddr)> {
    let (stream, addr) = listener.accept().await?;
    let url = EndpointUrl::new("tcp", addr.ip().to_string(), addr.port());
    let transport = TcpTransport::spawn(url, stream, router);
    Ok((crate::Socket::new(transport), addr))
}

#[cfg(test)]
#[path = "tcp_tests.rs"]
mod tests;
