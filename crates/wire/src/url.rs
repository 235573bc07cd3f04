// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoint URLs: `{ protocol, host, port }`, spec.md §3.

use std::fmt;
use std::str::FromStr;

use meshrpc_core::{AnyValue, CoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a service accepts connections. Protocol strings in the wild
/// include at least `"tcp"`, `"tcps"`, `"local"` (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointUrl {
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlParseError {
    #[error("endpoint URL missing \"://\": {0}")]
    MissingScheme(String),
    #[error("endpoint URL missing port: {0}")]
    MissingPort(String),
    #[error("endpoint URL has invalid port: {0}")]
    InvalidPort(String),
}

impl EndpointUrl {
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self { protocol: protocol.into(), host: host.into(), port }
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self { protocol: "local".to_string(), host: name.into(), port: 0 }
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.protocol == "local" {
            write!(f, "local://{}", self.host)
        } else {
            write!(f, "{}://{}:{}", self.protocol, self.host, self.port)
        }
    }
}

impl FromStr for EndpointUrl {
    type Err = UrlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (protocol, rest) =
            s.split_once("://").ok_or_else(|| UrlParseError::MissingScheme(s.to_string()))?;
        if protocol == "local" {
            return Ok(EndpointUrl::local(rest));
        }
        let (host, port) =
            rest.rsplit_once(':').ok_or_else(|| UrlParseError::MissingPort(s.to_string()))?;
        let port: u16 =
            port.parse().map_err(|_| UrlParseError::InvalidPort(s.to_string()))?;
        Ok(EndpointUrl::new(protocol, host, port))
    }
}

impl EndpointUrl {
    /// Encodes as a 3-tuple `(protocol, host, port)` for carrying over
    /// the wire inside a `ServiceInfo`.
    pub fn to_any(&self) -> AnyValue {
        AnyValue::Tuple(vec![
            AnyValue::from(self.protocol.clone()),
            AnyValue::from(self.host.clone()),
            AnyValue::Int(self.port as i64),
        ])
    }

    /// Inverse of [`to_any`](Self::to_any).
    pub fn from_any(value: &AnyValue) -> Result<Self, CoreError> {
        let AnyValue::Tuple(fields) = value else {
            return Err(CoreError::resolution("endpoint is not a tuple"));
        };
        let [AnyValue::String(protocol), AnyValue::String(host), AnyValue::Int(port)] =
            &fields[..]
        else {
            return Err(CoreError::resolution("malformed endpoint tuple"));
        };
        Ok(EndpointUrl::new(protocol.clone(), host.clone(), *port as u16))
    }
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod tests;
