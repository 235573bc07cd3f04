// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Core(#[from] meshrpc_core::CoreError),

    #[error(transparent)]
    Cache(#[from] meshrpc_transport::CacheError),

    #[error("no local object for {0}")]
    NoLocalObject(String),

    #[error("no such service: {0}")]
    NotFound(String),

    #[error("no endpoints for {0} (id {1})")]
    NoEndpoints(String, u32),

    #[error("no {protocol} endpoint for {name} (id {id})")]
    NoMatchingEndpoint { name: String, id: u32, protocol: String },
}
