// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RemoteObject`: a proxy bound to `(socket, serviceId)`, spec.md's
//! glossary lifecycle — created empty, its `MetaObject` fetched
//! asynchronously, then usable — grounded on `remoteobject.cpp`'s
//! constructor and `fetchMetaObject`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use meshrpc_core::{AnyValue, CoreError};
use meshrpc_object::{MetaObject, META_OBJECT_ACTION};
use meshrpc_transport::Socket;
use meshrpc_wire::{Message, MessageKind};
use tokio::sync::OnceCell;

use crate::error::SessionError;

/// Object id every service exposes its primary interface under. Action id
/// [`META_OBJECT_ACTION`] is reserved across every object id, so this is
/// the only addressing convention `RemoteObject` needs on top of it.
pub const MAIN_OBJECT_ID: u32 = 1;

struct Inner {
    socket: Socket,
    service_id: u32,
    object_id: u32,
    meta: OnceCell<MetaObject>,
    closed: AtomicBool,
}

/// Cheap to clone: every clone shares the same cached meta object and
/// closed flag.
#[derive(Clone)]
pub struct RemoteObject {
    inner: Arc<Inner>,
}

impl RemoteObject {
    /// Binds to `(socket, service_id)` at the conventional main object id.
    /// Closes itself automatically when the socket disconnects, matching
    /// the glossary's "closed explicitly or when its socket disconnects".
    pub fn bind(socket: Socket, service_id: u32) -> Self {
        let this = Self {
            inner: Arc::new(Inner {
                socket: socket.clone(),
                service_id,
                object_id: MAIN_OBJECT_ID,
                meta: OnceCell::new(),
                closed: AtomicBool::new(false),
            }),
        };
        let closing = this.clone();
        socket.on_disconnected(Arc::new(move |_| closing.close()));
        this
    }

    pub fn service_id(&self) -> u32 {
        self.inner.service_id
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Explicit close, the other half of the glossary's lifecycle rule.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
    }

    /// Fetches and caches the meta object; idempotent, safe to call
    /// before every [`call`](Self::call).
    pub async fn fetch_meta_object(&self) -> Result<(), SessionError> {
        self.inner
            .meta
            .get_or_try_init(|| async {
                let request = Message::call(
                    self.inner.service_id,
                    self.inner.object_id,
                    META_OBJECT_ACTION,
                    AnyValue::Nil,
                );
                let reply = self.inner.socket.call(request).await?;
                match reply.kind {
                    MessageKind::Reply => {
                        MetaObject::from_any(&reply.payload).map_err(SessionError::from)
                    }
                    MessageKind::Error => {
                        let reason = match reply.payload {
                            AnyValue::String(s) => s,
                            other => format!("{other:?}"),
                        };
                        Err(SessionError::from(CoreError::transport(reason)))
                    }
                    other => Err(SessionError::from(CoreError::transport(format!(
                        "unexpected reply kind fetching metaObject: {other:?}"
                    )))),
                }
            })
            .await?;
        Ok(())
    }

    /// Calls `method_name` remotely, fetching the meta object first if
    /// it hasn't been fetched yet.
    #[allow(clippy::expect_used)]
    pub async fn call(&self, method_name: &str, params: Vec<AnyValue>) -> Result<AnyValue, SessionError> {
        if self.is_closed() {
            return Err(SessionError::from(CoreError::transport("remote object closed")));
        }
        self.fetch_meta_object().await?;
        let action = {
            let meta = self.inner.meta.get().expect("fetched above");
            meta.find_method(method_name)
                .map(|m| m.id)
                .ok_or_else(|| CoreError::resolution(format!("no such method: {method_name}")))?
        };
        let request =
            Message::call(self.inner.service_id, self.inner.object_id, action, AnyValue::Tuple(params));
        let reply = self.inner.socket.call(request).await?;
        match reply.kind {
            MessageKind::Reply => Ok(reply.payload),
            MessageKind::Error => {
                let reason = match reply.payload {
                    AnyValue::String(s) => s,
                    other => format!("{other:?}"),
                };
                Err(SessionError::from(CoreError::transport(reason)))
            }
            other => Err(SessionError::from(CoreError::transport(format!(
                "unexpected reply kind calling {method_name}: {other:?}"
            )))),
        }
    }
}

impl PartialEq for RemoteObject {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for RemoteObject {}

#[cfg(test)]
#[path = "remote_object_tests.rs"]
mod tests;
