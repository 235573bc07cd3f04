// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TransportSocketCache` (C2): maps endpoint strings to live or
//! pending connections, coalescing concurrent connect attempts to the
//! same endpoint behind a single shared future. Grounded on
//! `transportsocketcache.hpp`'s `_sockets`/`_socketsMutex`/`_dying`.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::future::{FutureExt, Shared};
use meshrpc_wire::EndpointUrl;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::CacheError;
use crate::socket::Socket;
use crate::transport::Connector;

type ConnectFuture = Shared<Pin<Box<dyn Future<Output = Result<Socket, CacheError>> + Send>>>;

enum Entry {
    Connecting(ConnectFuture),
    Connected(Socket),
    Disconnected,
}

struct Inner {
    sockets: Mutex<HashMap<EndpointUrl, Entry>>,
    connectors: HashMap<String, Arc<dyn Connector>>,
    dying: AtomicBool,
}

/// Cheap to clone: every clone shares the same entry table, so a
/// `socket()` call issued through one handle is visible to lookups
/// through any other.
#[derive(Clone)]
pub struct TransportSocketCache {
    inner: Arc<Inner>,
}

impl TransportSocketCache {
    pub fn new(connectors: Vec<Arc<dyn Connector>>) -> Self {
        let connectors = connectors.into_iter().map(|c| (c.protocol().to_string(), c)).collect();
        Self {
            inner: Arc::new(Inner {
                sockets: Mutex::new(HashMap::new()),
                connectors,
                dying: AtomicBool::new(false),
            }),
        }
    }

    /// Connect (or reuse a connection) to a single endpoint.
    pub async fn socket(&self, endpoint: &EndpointUrl) -> Result<Socket, CacheError> {
        if self.inner.dying.load(Ordering::Acquire) {
            return Err(CacheError::shut_down());
        }

        let fut = {
            let mut sockets = self.inner.sockets.lock();
            match sockets.get(endpoint) {
                Some(Entry::Connected(socket)) => return Ok(socket.clone()),
                Some(Entry::Connecting(fut)) => fut.clone(),
                Some(Entry::Disconnected) | None => {
                    let fut = self.spawn_connect(endpoint.clone());
                    sockets.insert(endpoint.clone(), Entry::Connecting(fut.clone()));
                    fut
                }
            }
        };
        fut.await
    }

    /// Try `endpoints` in order, filtered by `protocol` when non-empty,
    /// short-circuiting on the first successful connect.
    pub async fn socket_for_endpoints(
        &self,
        endpoints: &[EndpointUrl],
        protocol: &str,
    ) -> Result<Socket, CacheError> {
        let mut last_err = None;
        for endpoint in endpoints {
            if !protocol.is_empty() && endpoint.protocol != protocol {
                continue;
            }
            match self.socket(endpoint).await {
                Ok(socket) => return Ok(socket),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| CacheError::connect_failed("<no endpoints>")))
    }

    /// Disconnect every cached socket and mark the cache dying: further
    /// `socket()` calls fail immediately rather than attempting to
    /// connect.
    pub fn close(&self) {
        self.inner.dying.store(true, Ordering::Release);
        let entries = self.inner.sockets.lock().drain().collect::<Vec<_>>();
        for (endpoint, entry) in entries {
            if let Entry::Connected(socket) = entry {
                debug!(%endpoint, "closing cached socket");
                socket.notify_disconnected("cache shut down");
            }
        }
    }

    fn spawn_connect(&self, endpoint: EndpointUrl) -> ConnectFuture {
        let this = self.clone();
        let fut: Pin<Box<dyn Future<Output = Result<Socket, CacheError>> + Send>> =
            Box::pin(async move {
                let connector = this
                    .inner
                    .connectors
                    .get(&endpoint.protocol)
                    .cloned()
                    .ok_or_else(|| CacheError::connect_failed(&endpoint))?;
                match connector.dial(&endpoint).await {
                    Ok(transport) => {
                        if let Err(err) = transport.connect().await {
                            warn!(%endpoint, %err, "connect failed");
                            this.on_disconnected(&endpoint);
                            return Err(err);
                        }
                        let socket = Socket::new(transport);
                        this.on_connected(&endpoint, socket.clone());
                        Ok(socket)
                    }
                    Err(err) => {
                        warn!(%endpoint, %err, "connect failed");
                        this.on_disconnected(&endpoint);
                        Err(err)
                    }
                }
            });
        fut.shared()
    }

    fn on_connected(&self, endpoint: &EndpointUrl, socket: Socket) {
        {
            let mut sockets = self.inner.sockets.lock();
            sockets.insert(endpoint.clone(), Entry::Connected(socket.clone()));
        }
        socket.notify_connected();

        let this = self.clone();
        let endpoint = endpoint.clone();
        let watched = socket.clone();
        tokio::spawn(async move {
            watched.wait_closed().await;
            info!(%endpoint, "socket disconnected");
            this.mark_disconnected(&endpoint);
            watched.notify_disconnected("peer closed");
        });
    }

    fn on_disconnected(&self, endpoint: &EndpointUrl) {
        self.mark_disconnected(endpoint);
    }

    fn mark_disconnected(&self, endpoint: &EndpointUrl) {
        self.inner.sockets.lock().insert(endpoint.clone(), Entry::Disconnected);
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
