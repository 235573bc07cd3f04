// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the socket cache and the transports it manages,
//! thin wrappers over [`meshrpc_core::CoreError`] so callers higher up
//! match on one taxonomy.

use meshrpc_core::CoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CacheError {
    pub fn connect_failed(endpoint: impl std::fmt::Display) -> Self {
        Self::Core(CoreError::transport(format!("connect failed: {endpoint}")))
    }

    pub fn shut_down() -> Self {
        Self::Core(CoreError::shutting_down("cache shut down"))
    }
}
