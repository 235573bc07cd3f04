// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four maps and their invariants (spec.md §3/§4.5), grounded
//! verbatim on `servicedirectory.cpp`'s `nameToIdx`/`pendingServices`/
//! `connectedServices`/`socketToIdx`.

use std::collections::HashMap;
use std::sync::Arc;

use meshrpc_object::{SignalBase, Subscriber};
use meshrpc_transport::SocketId;
use meshrpc_wire::{ServiceId, ServiceInfo};
use parking_lot::Mutex;
use tracing::{info, warn};

struct Maps {
    name_to_id: HashMap<String, u32>,
    pending: HashMap<u32, ServiceInfo>,
    connected: HashMap<u32, ServiceInfo>,
    socket_to_ids: HashMap<SocketId, Vec<u32>>,
    next_id: u32,
}

impl Maps {
    fn new() -> Self {
        Self {
            name_to_id: HashMap::new(),
            pending: HashMap::new(),
            connected: HashMap::new(),
            socket_to_ids: HashMap::new(),
            next_id: 0,
        }
    }
}

/// One mutex guards all four maps (spec.md §5); the two signals are
/// triggered only after it is released, so a subscriber callback can
/// freely call back into the directory without deadlocking — the same
/// release-before-resolve rule `TransportSocketCache` follows.
pub struct DirectoryState {
    maps: Mutex<Maps>,
    registered: Mutex<SignalBase>,
    unregistered: Mutex<SignalBase>,
}

impl DirectoryState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            maps: Mutex::new(Maps::new()),
            registered: Mutex::new(SignalBase::new()),
            unregistered: Mutex::new(SignalBase::new()),
        })
    }

    /// Registers the directory itself as service id 1, promotes it to
    /// ready, and asserts the assigned id is 1 — `ServiceDirectory::listen`'s
    /// bootstrap.
    pub fn bootstrap() -> Arc<Self> {
        let state = Self::new();
        let info = ServiceInfo {
            service_id: ServiceId(0),
            ..ServiceInfo::unregistered("ServiceDirectory", Vec::new())
        };
        let id = state.register_service(SocketId::new(), info);
        assert_eq!(id, 1, "serviceDirectory must have id 1");
        state.service_ready(id);
        state
    }

    /// Subscribe to `ServiceRegistered` events (id, name). Local,
    /// in-process only — the wire message shape has no subscribe
    /// action, so remote observers are out of scope (spec.md §6).
    pub fn on_registered(&self, subscriber: Subscriber) {
        self.registered.lock().connect(subscriber);
    }

    /// Subscribe to `ServiceUnregistered` events (id, name).
    pub fn on_unregistered(&self, subscriber: Subscriber) {
        self.unregistered.lock().connect(subscriber);
    }

    pub fn services(&self) -> Vec<ServiceInfo> {
        self.maps.lock().connected.values().cloned().collect()
    }

    pub fn service(&self, name: &str) -> ServiceInfo {
        let maps = self.maps.lock();
        let Some(&id) = maps.name_to_id.get(name) else {
            return ServiceInfo::empty();
        };
        maps.connected.get(&id).cloned().unwrap_or_else(ServiceInfo::empty)
    }

    /// Assigns a new id and records the binding in `pending` and
    /// `socketToIds[socket]`; rejects a duplicate name by returning `0`.
    /// The directory's own bootstrap registration (id 1) is never added
    /// to `socketToIds`, matching `registerService`'s
    /// `Service_ServiceDirectory` special case.
    pub fn register_service(&self, socket: SocketId, mut info: ServiceInfo) -> u32 {
        let mut maps = self.maps.lock();
        if let Some(&existing) = maps.name_to_id.get(&info.name) {
            warn!(
                service = %info.name,
                existing_id = existing,
                "service is already registered"
            );
            return 0;
        }

        maps.next_id += 1;
        let id = maps.next_id;
        maps.name_to_id.insert(info.name.clone(), id);
        if id != ServiceId::DIRECTORY.0 {
            maps.socket_to_ids.entry(socket).or_default().push(id);
        }
        info.service_id = ServiceId(id);
        info!(service = %info.name, id, "service registered");
        for endpoint in &info.endpoints {
            tracing::debug!(service = %info.name, %endpoint, "service endpoint");
        }
        maps.pending.insert(id, info);
        id
    }

    /// Promotes `pending[id]` to `connected[id]` and emits
    /// `ServiceRegistered` to subscribers.
    pub fn service_ready(&self, id: u32) {
        let info = {
            let mut maps = self.maps.lock();
            let Some(info) = maps.pending.remove(&id) else {
                tracing::error!(id, "can't find pending service");
                return;
            };
            maps.connected.insert(id, info.clone());
            info
        };
        self.registered.lock().trigger(&[
            meshrpc_core::AnyValue::Int(id as i64),
            meshrpc_core::AnyValue::from(info.name),
        ]);
    }

    /// Removes `id` from `nameToId`, `connected`, and every
    /// `socketToIds` bucket, then emits `ServiceUnregistered`. Unlike
    /// the original's disabled cleanup of `socketToIdx`, this actually
    /// removes the id from its socket's bucket, since spec.md §3
    /// requires every id in `socketToIds` to also be in
    /// `pending ∪ connected`.
    pub fn unregister_service(&self, id: u32) {
        let name = {
            let mut maps = self.maps.lock();
            let Some(info) = maps.connected.remove(&id) else {
                tracing::error!(id, "can't find service");
                return;
            };
            maps.name_to_id.remove(&info.name);
            for ids in maps.socket_to_ids.values_mut() {
                ids.retain(|&bound| bound != id);
            }
            maps.socket_to_ids.retain(|_, ids| !ids.is_empty());
            info!(service = %info.name, id, "service unregistered");
            info.name
        };
        self.unregistered
            .lock()
            .trigger(&[meshrpc_core::AnyValue::Int(id as i64), meshrpc_core::AnyValue::from(name)]);
    }

    /// Unregisters every service that was registered over `socket`,
    /// iterating a snapshot since `unregister_service` mutates the very
    /// map being walked.
    pub fn on_socket_disconnected(&self, socket: SocketId) {
        let ids = {
            let mut maps = self.maps.lock();
            maps.socket_to_ids.remove(&socket).unwrap_or_default()
        };
        for id in ids {
            let name = self.maps.lock().connected.get(&id).map(|i| i.name.clone());
            if let Some(name) = name {
                info!(service = %name, id, "service disconnected");
            }
            self.unregister_service(id);
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
