// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use meshrpc_core::CoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum EventLoopError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<tokio::task::JoinError> for EventLoopError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            EventLoopError::Core(CoreError::Cancelled)
        } else {
            EventLoopError::Core(CoreError::transport(format!("task panicked: {err}")))
        }
    }
}
