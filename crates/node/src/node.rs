// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires a directory, a session resolver, and a TCP listener into a
//! running process, grounded on the daemon's `startup`/`listener` split
//! (minus persistence: the directory is explicitly in-memory only).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use meshrpc_core::AnyValue;
use meshrpc_directory::DirectoryState;
use meshrpc_eventloop::{EventLoop, Monitor};
use meshrpc_session::{DirectoryClient, SessionServiceResolver, MAIN_OBJECT_ID};
use meshrpc_transport::local::LocalConnector;
use meshrpc_transport::{accept_tcp, Router, TcpConnector, TransportSocketCache};
use meshrpc_wire::ServiceId;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::NodeError;

pub const DIRECTORY_SERVICE_NAME: &str = "ServiceDirectory";

/// A running node's long-lived state. `resolver` is the handle client
/// code (and `meshrpc-cli`) would hold; `directory` is kept around for
/// the socket-disconnect hookup in the accept loop.
pub struct Node {
    pub directory: Arc<DirectoryState>,
    pub resolver: SessionServiceResolver,
    pub router: Router,
    listener: TcpListener,
    network_loop: EventLoop,
    object_loop: EventLoop,
    watchdog_latency: Option<Duration>,
}

impl Node {
    pub async fn bootstrap(config: Config) -> Result<Self, NodeError> {
        Self::bootstrap_on(
            config.listen_addr,
            config.watchdog_latency,
            meshrpc_eventloop::network_event_loop().clone(),
            meshrpc_eventloop::object_event_loop().clone(),
        )
        .await
    }

    /// Split out from [`Self::bootstrap`] so tests can supply their own
    /// loops and an ephemeral port without touching the process-wide
    /// default singletons.
    pub async fn bootstrap_on(
        listen_addr: SocketAddr,
        watchdog_latency: Option<Duration>,
        network_loop: EventLoop,
        object_loop: EventLoop,
    ) -> Result<Self, NodeError> {
        let directory = DirectoryState::bootstrap();
        let router = Router::new();

        let directory_object = meshrpc_directory::bind(directory.clone(), object_loop.clone());
        router.bind(ServiceId::DIRECTORY.0, MAIN_OBJECT_ID, directory_object.clone());

        let sockets = TransportSocketCache::new(vec![
            Arc::new(TcpConnector::new(router.clone())),
            Arc::new(LocalConnector),
        ]);
        let resolver =
            SessionServiceResolver::new(sockets, DirectoryClient::Local(directory.clone()), object_loop.clone());
        resolver.register_local(DIRECTORY_SERVICE_NAME, directory_object);

        {
            let resolver = resolver.clone();
            directory.on_unregistered(Arc::new(move |args: &[AnyValue]| {
                if let Some(AnyValue::String(name)) = args.get(1) {
                    resolver.on_service_removed(name);
                }
            }));
        }

        let listener = TcpListener::bind(listen_addr).await?;
        info!(addr = %listener.local_addr()?, "listening");

        Ok(Self { directory, resolver, router, listener, network_loop, object_loop, watchdog_latency })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until `shutdown` fires. Each accepted
    /// connection is routed through the shared [`Router`]; its
    /// disconnect unregisters every service that socket held.
    pub async fn run(self, mut shutdown: tokio::sync::oneshot::Receiver<()>) -> Result<(), NodeError> {
        if let Some(max_delay) = self.watchdog_latency {
            let monitor = Arc::new(Monitor::new(self.network_loop.clone(), self.object_loop.clone(), max_delay));
            tokio::spawn(monitor.watch(max_delay, || warn!("watchdog: event loop stuck")));
        }

        loop {
            tokio::select! {
                accepted = accept_tcp(&self.listener, self.router.clone()) => {
                    let (socket, addr) = accepted?;
                    info!(%addr, "accepted connection");
                    let directory = self.directory.clone();
                    let socket_id = socket.id();
                    // Mirrors `TransportSocketCache::on_connected`'s watcher: there's
                    // no cache entry for an inbound connection, so this loop is the
                    // only place that learns when the peer goes away.
                    tokio::spawn(async move {
                        socket.wait_closed().await;
                        info!(%addr, "connection closed");
                        directory.on_socket_disconnected(socket_id);
                    });
                }
                _ = &mut shutdown => {
                    self.resolver.shutdown();
                    info!("shutting down");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
