// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared leaf error type for the RPC core.
//!
//! Every layer above this one (transport, object, directory, session)
//! defines its own `thiserror` enum and wraps [`CoreError`] with
//! `#[from]` where a lower layer's failure should propagate unchanged,
//! rather than everything funneling through one giant enum.

use thiserror::Error;

/// Error taxonomy from the spec's error handling design: resolution,
/// transport, dispatch, and lifecycle failures that can fail a future.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0}")]
    Resolution(String),

    #[error("{0}")]
    Transport(String),

    #[error("method not found: {0}")]
    MethodNotFound(u32),

    #[error("{0}")]
    SignatureMismatch(String),

    #[error("deadlock?")]
    DeadlockTimeout,

    #[error("operation cancelled")]
    Cancelled,

    #[error("{0}")]
    ShuttingDown(String),
}

impl CoreError {
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn shutting_down(what: impl Into<String>) -> Self {
        Self::ShuttingDown(what.into())
    }
}
