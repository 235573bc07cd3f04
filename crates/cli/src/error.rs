// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cache(#[from] meshrpc_transport::CacheError),

    #[error(transparent)]
    Session(#[from] meshrpc_session::SessionError),

    #[error("malformed argument {0:?}: {1}")]
    BadArgument(String, serde_json::Error),
}
