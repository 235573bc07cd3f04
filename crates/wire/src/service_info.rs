// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ServiceInfo`/`ServiceId`, spec.md §3.

use std::fmt;

use meshrpc_core::{AnyValue, CoreError, MachineId};
use serde::{Deserialize, Serialize};

use crate::url::EndpointUrl;

/// Monotonically increasing id, starting at 1. Id `1` is reserved for the
/// directory itself and is never reused within a directory's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub u32);

impl ServiceId {
    /// The id reserved for the directory itself.
    pub const DIRECTORY: ServiceId = ServiceId(1);

    pub fn is_directory(self) -> bool {
        self == Self::DIRECTORY
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record of a service's name, assigned id, host machine, and endpoints.
/// Created by a service at registration; mutated only by the directory
/// to assign `service_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub service_id: ServiceId,
    pub machine_id: MachineId,
    /// Ordered list — order matters for protocol-filtered endpoint
    /// selection in `meshrpc-session`.
    pub endpoints: Vec<EndpointUrl>,
}

impl ServiceInfo {
    /// A `ServiceInfo` with no assigned id yet, as constructed by a
    /// service before it calls `registerService`.
    pub fn unregistered(name: impl Into<String>, endpoints: Vec<EndpointUrl>) -> Self {
        Self {
            name: name.into(),
            service_id: ServiceId(0),
            machine_id: meshrpc_core::current_machine_id(),
            endpoints,
        }
    }

    /// The empty record returned by `service(name)` when the name is
    /// absent from the directory.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            service_id: ServiceId(0),
            machine_id: meshrpc_core::current_machine_id(),
            endpoints: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.service_id.0 == 0
    }

    /// First endpoint matching `protocol`, or `None` if there is no
    /// filter (empty string) — callers treat that as "use the first
    /// endpoint" — or no endpoint matches.
    pub fn endpoint_for_protocol(&self, protocol: &str) -> Option<&EndpointUrl> {
        if protocol.is_empty() {
            return self.endpoints.first();
        }
        self.endpoints.iter().find(|e| e.protocol == protocol)
    }
}

impl ServiceInfo {
    /// Encodes as a 4-tuple `(name, serviceId, machineId, endpoints)`
    /// for carrying over the wire as a plain `AnyValue`.
    pub fn to_any(&self) -> AnyValue {
        AnyValue::Tuple(vec![
            AnyValue::from(self.name.clone()),
            AnyValue::Int(self.service_id.0 as i64),
            AnyValue::from(self.machine_id.as_str()),
            AnyValue::List(self.endpoints.iter().map(EndpointUrl::to_any).collect()),
        ])
    }

    /// Inverse of [`to_any`](Self::to_any).
    pub fn from_any(value: &AnyValue) -> Result<Self, CoreError> {
        let AnyValue::Tuple(fields) = value else {
            return Err(CoreError::resolution("service info is not a tuple"));
        };
        let [name, AnyValue::Int(service_id), machine_id, AnyValue::List(endpoints)] =
            &fields[..]
        else {
            return Err(CoreError::resolution("malformed service info tuple"));
        };
        let AnyValue::String(name) = name else {
            return Err(CoreError::resolution("service info name is not a string"));
        };
        let AnyValue::String(machine_id) = machine_id else {
            return Err(CoreError::resolution("service info machineId is not a string"));
        };
        let endpoints =
            endpoints.iter().map(EndpointUrl::from_any).collect::<Result<Vec<_>, _>>()?;
        Ok(ServiceInfo {
            name: name.clone(),
            service_id: ServiceId(*service_id as u32),
            machine_id: MachineId::from_string(machine_id),
            endpoints,
        })
    }
}

#[cfg(test)]
#[path = "service_info_tests.rs"]
mod tests;
