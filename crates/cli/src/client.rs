// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A thin client: dial the node's `ServiceDirectory`, then reuse the
//! same `SessionServiceResolver` the node itself runs on to resolve and
//! call any other service by name.

use std::net::SocketAddr;
use std::sync::Arc;

use meshrpc_core::AnyValue;
use meshrpc_eventloop::EventLoop;
use meshrpc_session::{DirectoryClient, RemoteObject, SessionServiceResolver};
use meshrpc_transport::local::LocalConnector;
use meshrpc_transport::{Connector, Router, Socket, SocketId, TcpConnector, TransportSocketCache};
use meshrpc_wire::{EndpointUrl, ServiceId, ServiceInfo};

use crate::error::CliError;

pub struct Client {
    /// Dialed directly rather than through `resolver.service()`: the
    /// directory bootstraps itself with no endpoints of its own (spec.md
    /// §3 — `registerService`'s `Service_ServiceDirectory` special case),
    /// so looking itself up by name would fail.
    directory: RemoteObject,
    resolver: SessionServiceResolver,
}

impl Client {
    pub async fn connect(addr: SocketAddr) -> Result<Self, CliError> {
        // A client never receives inbound calls of its own, so the
        // router it hands to the TCP connector stays empty.
        let router = Router::new();
        let transport = TcpConnector::new(router.clone())
            .dial(&EndpointUrl::new("tcp", addr.ip().to_string(), addr.port()))
            .await?;
        let directory = RemoteObject::bind(Socket::new(transport), ServiceId::DIRECTORY.0);

        let sockets = TransportSocketCache::new(vec![
            Arc::new(TcpConnector::new(router)),
            Arc::new(LocalConnector),
        ]);
        let resolver = SessionServiceResolver::new(
            sockets,
            DirectoryClient::Remote(directory.clone()),
            EventLoop::single(),
        );
        Ok(Self { directory, resolver })
    }

    pub async fn list(&self) -> Result<Vec<ServiceInfo>, CliError> {
        let value = self.directory.call("services", vec![]).await?;
        let AnyValue::List(items) = value else {
            return Ok(Vec::new());
        };
        Ok(items.iter().filter_map(|item| ServiceInfo::from_any(item).ok()).collect())
    }

    pub async fn call(&self, service: &str, method: &str, params: Vec<AnyValue>) -> Result<AnyValue, CliError> {
        let handle = self.resolver.service(service, "").await?;
        Ok(handle.call(method, params).await?)
    }

    /// Registers a standalone service under `name` at `endpoints` and
    /// immediately marks it ready. A fresh [`SocketId`] stands in for
    /// the caller's connection; mirrors how `meshrpc-node`'s own tests
    /// register services without a live socket behind them. Returns the
    /// assigned id, or `0` if the name was already registered.
    pub async fn register(&self, name: &str, endpoints: Vec<EndpointUrl>) -> Result<u32, CliError> {
        let info = ServiceInfo::unregistered(name, endpoints);
        let socket_id = SocketId::new().to_string();
        let reply = self
            .directory
            .call("registerService", vec![AnyValue::from(socket_id), info.to_any()])
            .await?;
        let AnyValue::Int(id) = reply else {
            return Ok(0);
        };
        if id != 0 {
            self.directory.call("serviceReady", vec![AnyValue::Int(id)]).await?;
        }
        Ok(id as u32)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
