// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exposes [`DirectoryState`] as a [`DynamicObject`], bootstrapped as
//! service id 1, grounded on `ServiceDirectoryBoundObject`'s
//! constructor (`createSDP`'s `advertiseMethod` order fixes the action
//! ids below) and `ServiceDirectory::listen`'s bootstrap/assert.

use std::sync::Arc;

use meshrpc_core::{AnyValue, CoreError, Signature};
use meshrpc_eventloop::EventLoop;
use meshrpc_object::{
    DynamicObject, MetaCallType, MetaMethod, MetaObject, MetaSignal, ThreadingModel,
};
use meshrpc_transport::SocketId;
use meshrpc_wire::ServiceInfo;

use crate::state::DirectoryState;

/// Action ids, fixed by `createSDP`'s `advertiseMethod` call order:
/// `service`, `services`, `registerService`, `unregisterService`,
/// `serviceReady`.
pub const SERVICE: u32 = 0;
pub const SERVICES: u32 = 1;
pub const REGISTER_SERVICE: u32 = 2;
pub const UNREGISTER_SERVICE: u32 = 3;
pub const SERVICE_READY: u32 = 4;

/// Local-only signals (spec.md §6's message shape has no subscribe
/// action, so these are for in-process observers, e.g. `meshrpc-session`).
pub const SERVICE_REGISTERED: u32 = 5;
pub const SERVICE_UNREGISTERED: u32 = 6;

fn meta() -> MetaObject {
    MetaObject::new()
        .with_method(MetaMethod {
            id: SERVICE,
            name: "service".to_string(),
            param_signature: Signature::String,
            return_signature: Signature::Dynamic,
        })
        .with_method(MetaMethod {
            id: SERVICES,
            name: "services".to_string(),
            param_signature: Signature::Nil,
            return_signature: Signature::List(Box::new(Signature::Dynamic)),
        })
        .with_method(MetaMethod {
            id: REGISTER_SERVICE,
            name: "registerService".to_string(),
            param_signature: Signature::Tuple(vec![Signature::String, Signature::Dynamic]),
            return_signature: Signature::Int,
        })
        .with_method(MetaMethod {
            id: UNREGISTER_SERVICE,
            name: "unregisterService".to_string(),
            param_signature: Signature::Int,
            return_signature: Signature::Nil,
        })
        .with_method(MetaMethod {
            id: SERVICE_READY,
            name: "serviceReady".to_string(),
            param_signature: Signature::Int,
            return_signature: Signature::Nil,
        })
        .with_signal(MetaSignal {
            id: SERVICE_REGISTERED,
            name: "serviceRegistered".to_string(),
            param_signature: Signature::Tuple(vec![Signature::Int, Signature::String]),
        })
        .with_signal(MetaSignal {
            id: SERVICE_UNREGISTERED,
            name: "serviceUnregistered".to_string(),
            param_signature: Signature::Tuple(vec![Signature::Int, Signature::String]),
        })
}

fn expect_int(value: &AnyValue) -> Result<u32, CoreError> {
    match value {
        AnyValue::Int(n) => Ok(*n as u32),
        other => Err(CoreError::resolution(format!("expected an int, got {other:?}"))),
    }
}

fn expect_string(value: &AnyValue) -> Result<&str, CoreError> {
    match value {
        AnyValue::String(s) => Ok(s.as_str()),
        other => Err(CoreError::resolution(format!("expected a string, got {other:?}"))),
    }
}

/// Builds the directory's bound object: always `Direct` dispatch
/// (`qi::MetaCallType_Direct` in the original), since every operation
/// here is an in-memory map lookup.
pub fn bind(state: Arc<DirectoryState>, event_loop: EventLoop) -> DynamicObject {
    let object = DynamicObject::new(ThreadingModel::Default, event_loop);
    object.set_meta_object(meta());

    {
        let state = state.clone();
        object.set_method(
            SERVICE,
            Arc::new(move |params| {
                let name = expect_string(params.first().unwrap_or(&AnyValue::Nil))?;
                Ok(state.service(name).to_any())
            }),
            MetaCallType::Direct,
        );
    }
    {
        let state = state.clone();
        object.set_method(
            SERVICES,
            Arc::new(move |_params| {
                Ok(AnyValue::List(state.services().iter().map(ServiceInfo::to_any).collect()))
            }),
            MetaCallType::Direct,
        );
    }
    {
        let state = state.clone();
        object.set_method(
            REGISTER_SERVICE,
            Arc::new(move |params| {
                let [socket_id, info] = params else {
                    return Err(CoreError::resolution("registerService takes (socketId, info)"));
                };
                let socket = SocketId::from_string(expect_string(socket_id)?);
                let info = ServiceInfo::from_any(info)?;
                Ok(AnyValue::Int(state.register_service(socket, info) as i64))
            }),
            MetaCallType::Direct,
        );
    }
    {
        let state = state.clone();
        object.set_method(
            UNREGISTER_SERVICE,
            Arc::new(move |params| {
                let id = expect_int(params.first().unwrap_or(&AnyValue::Nil))?;
                state.unregister_service(id);
                Ok(AnyValue::Nil)
            }),
            MetaCallType::Direct,
        );
    }
    {
        let state = state.clone();
        object.set_method(
            SERVICE_READY,
            Arc::new(move |params| {
                let id = expect_int(params.first().unwrap_or(&AnyValue::Nil))?;
                state.service_ready(id);
                Ok(AnyValue::Nil)
            }),
            MetaCallType::Direct,
        );
    }

    {
        let relay = object.clone();
        state.on_registered(Arc::new(move |params| relay.meta_post(SERVICE_REGISTERED, params.to_vec())));
    }
    {
        let relay = object.clone();
        state.on_unregistered(Arc::new(move |params| relay.meta_post(SERVICE_UNREGISTERED, params.to_vec())));
    }

    object
}

#[cfg(test)]
#[path = "bound_object_tests.rs"]
mod tests;
