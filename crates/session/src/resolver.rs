// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SessionServiceResolver` (C6): the client-side orchestrator — name ->
//! ServiceInfo -> socket -> RemoteObject -> cached AnyObject, grounded
//! verbatim on `Session_Service` in sessionservice.cpp.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{FutureExt, Shared};
use meshrpc_core::AnyValue;
use meshrpc_directory::DirectoryState;
use meshrpc_eventloop::EventLoop;
use meshrpc_object::DynamicObject;
use meshrpc_transport::TransportSocketCache;
use meshrpc_wire::ServiceInfo;
use parking_lot::Mutex;

use crate::any_object::AnyObject;
use crate::error::SessionError;
use crate::remote_object::RemoteObject;

/// Where `name`s that aren't locally registered are looked up.
pub enum DirectoryClient {
    /// The directory lives in this process — a plain map read, no socket
    /// round trip. `Session_Service::onServiceInfoResult`'s
    /// `_sdClient->isLocal()` branch in the original goes further and
    /// reuses the directory's own client socket when it advertises
    /// `"ClientServerSocket"`; this is a documented deviation (see
    /// SPEC_FULL.md §4), not attempted here, because `DirectoryState`
    /// only ever learns a caller-supplied `SocketId` at registration
    /// time — nothing ties that id back to a live `Socket`, since
    /// `Router::dispatch` has no notion of which socket a call arrived
    /// over. `DirectoryClient::Local::service()` always falls through to
    /// the ordinary socket-cache path in `resolve_inner` instead.
    Local(Arc<DirectoryState>),
    /// The directory is reached through a `RemoteObject` proxy — the
    /// ordinary case for any process other than the one hosting it.
    Remote(RemoteObject),
}

impl DirectoryClient {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    async fn service(&self, name: &str) -> Result<ServiceInfo, SessionError> {
        match self {
            Self::Local(state) => {
                let info = state.service(name);
                if info.is_empty() {
                    return Err(SessionError::NotFound(name.to_string()));
                }
                Ok(info)
            }
            Self::Remote(remote) => {
                let value = remote.call("service", vec![AnyValue::from(name)]).await?;
                let info = ServiceInfo::from_any(&value)?;
                if info.is_empty() {
                    return Err(SessionError::NotFound(name.to_string()));
                }
                Ok(info)
            }
        }
    }
}

type ServiceFuture = Shared<Pin<Box<dyn Future<Output = Result<AnyObject, SessionError>> + Send>>>;

/// An entry is either a shared future for a resolution in flight
/// (coalescing concurrent `service(name)` calls for the same name) or the
/// published result, mirroring `TransportSocketCache`'s
/// `Connecting`/`Connected` split.
enum Entry {
    Pending(ServiceFuture),
    Ready(AnyObject),
}

struct Inner {
    sockets: TransportSocketCache,
    directory: DirectoryClient,
    local: Mutex<HashMap<String, DynamicObject>>,
    entries: Mutex<HashMap<String, Entry>>,
    event_loop: EventLoop,
    destroyed: tokio::sync::Notify,
    shutting_down: std::sync::atomic::AtomicBool,
}

/// Cheap to clone: every clone shares the same local registry, cache, and
/// in-flight request table.
#[derive(Clone)]
pub struct SessionServiceResolver {
    inner: Arc<Inner>,
}

impl SessionServiceResolver {
    pub fn new(sockets: TransportSocketCache, directory: DirectoryClient, event_loop: EventLoop) -> Self {
        Self {
            inner: Arc::new(Inner {
                sockets,
                directory,
                local: Mutex::new(HashMap::new()),
                entries: Mutex::new(HashMap::new()),
                event_loop,
                destroyed: tokio::sync::Notify::new(),
                shutting_down: std::sync::atomic::AtomicBool::new(false),
            }),
        }
    }

    /// `_destructionBarrier`'s Rust shape: marks the resolver dead and
    /// wakes every task parked in [`Self::wait_for_shutdown`], so
    /// in-flight callbacks can observe that the session is gone rather
    /// than racing a teardown that's already underway. Idempotent.
    pub fn shutdown(&self) {
        self.inner.shutting_down.store(true, std::sync::atomic::Ordering::Release);
        self.inner.destroyed.notify_waiters();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutting_down.load(std::sync::atomic::Ordering::Acquire)
    }

    /// Resolves once [`Self::shutdown`] has been called.
    pub async fn wait_for_shutdown(&self) {
        if self.is_shutting_down() {
            return;
        }
        self.inner.destroyed.notified().await;
    }

    /// Registers `object` as locally hosted under `name`, so `service()`
    /// with an empty or `"local"` protocol returns it without a socket.
    pub fn register_local(&self, name: impl Into<String>, object: DynamicObject) {
        self.inner.local.lock().insert(name.into(), object);
    }

    pub fn unregister_local(&self, name: &str) {
        self.inner.local.lock().remove(name);
    }

    /// `serviceRemoved` from the directory: remove the named entry from
    /// the remote-object cache and close the proxy, per spec.md's
    /// glossary. A no-op for names that were never resolved, or that
    /// resolved to a locally-hosted object.
    pub fn on_service_removed(&self, name: &str) {
        let removed = self.inner.entries.lock().remove(name);
        if let Some(Entry::Ready(AnyObject::Remote(remote))) = removed {
            // Close on the event loop rather than inline: this is called
            // from the directory's `ServiceUnregistered` signal, and
            // `RemoteObject::close` itself disconnects from that same
            // socket's signal table — the "delete later" workaround
            // `removeRequest` uses for the identical reentrancy hazard.
            self.inner.event_loop.post(Duration::ZERO, move || remote.close());
        }
    }

    /// `Session_Service::service`: local shortcut, cache hit, request
    /// coalescing, new request — in that order.
    pub async fn service(&self, name: &str, protocol: &str) -> Result<AnyObject, SessionError> {
        if self.is_shutting_down() {
            return Err(SessionError::NotFound(name.to_string()));
        }
        if protocol.is_empty() || protocol == "local" {
            if let Some(object) = self.inner.local.lock().get(name).cloned() {
                return Ok(AnyObject::Local(object));
            }
            if protocol == "local" {
                return Err(SessionError::NoLocalObject(name.to_string()));
            }
        }

        let fut = {
            let mut entries = self.inner.entries.lock();
            match entries.get(name) {
                Some(Entry::Ready(object)) => return Ok(object.clone()),
                Some(Entry::Pending(fut)) => fut.clone(),
                None => {
                    let fut = self.spawn_resolve(name.to_string(), protocol.to_string());
                    entries.insert(name.to_string(), Entry::Pending(fut.clone()));
                    fut
                }
            }
        };
        fut.await
    }

    fn spawn_resolve(&self, name: String, protocol: String) -> ServiceFuture {
        let this = self.clone();
        let fut: Pin<Box<dyn Future<Output = Result<AnyObject, SessionError>> + Send>> =
            Box::pin(async move { this.resolve(&name, &protocol).await });
        fut.shared()
    }

    /// The slow path: directory lookup, endpoint filter, socket, a fresh
    /// `RemoteObject`, its meta object, then publish. Coalescing at the
    /// entry-table level (one [`Entry::Pending`] per name, checked and
    /// inserted under the same lock) means every concurrent caller for a
    /// given name shares this exact resolution — there is no second
    /// `RemoteObject` to discard, unlike the original's separately-locked
    /// `_requests`/`_remoteObjects` tables, which could race two
    /// resolutions for the same name to completion.
    async fn resolve(&self, name: &str, protocol: &str) -> Result<AnyObject, SessionError> {
        let result = self.resolve_inner(name, protocol).await;
        if result.is_err() {
            self.inner.entries.lock().remove(name);
        }
        result
    }

    async fn resolve_inner(&self, name: &str, protocol: &str) -> Result<AnyObject, SessionError> {
        let info = self.inner.directory.service(name).await?;
        let service_id = info.service_id.0;

        if info.endpoints.is_empty() {
            return Err(SessionError::NoEndpoints(name.to_string(), service_id));
        }
        if !protocol.is_empty() && info.endpoint_for_protocol(protocol).is_none() {
            return Err(SessionError::NoMatchingEndpoint {
                name: name.to_string(),
                id: service_id,
                protocol: protocol.to_string(),
            });
        }

        let socket = self.inner.sockets.socket_for_endpoints(&info.endpoints, protocol).await?;
        let remote = RemoteObject::bind(socket, service_id);
        remote.fetch_meta_object().await?;

        let object = AnyObject::Remote(remote);
        self.inner.entries.lock().insert(name.to_string(), Entry::Ready(object.clone()));
        Ok(object)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
