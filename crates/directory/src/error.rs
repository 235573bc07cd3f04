// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `DirectoryError`, the ambient error-handling convention
//! (SPEC_FULL.md §2.2): a thin wrapper over [`meshrpc_core::CoreError`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error(transparent)]
    Core(#[from] meshrpc_core::CoreError),
}

impl DirectoryError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Core(meshrpc_core::CoreError::resolution(what))
    }
}
