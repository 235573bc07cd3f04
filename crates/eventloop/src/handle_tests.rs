// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use meshrpc_core::CoreError;

use crate::EventLoop;

#[tokio::test]
async fn resolves_with_the_closures_result() {
    let lp = EventLoop::pool(1);
    let handle = lp.async_call(Duration::ZERO, || 21 * 2);
    assert_eq!(handle.await.unwrap(), 42);
}

#[tokio::test]
async fn cancel_before_it_runs_yields_cancelled() {
    let lp = EventLoop::pool(1);
    let handle = lp.async_call(Duration::from_secs(60), || 1);
    handle.cancel();
    let err = handle.await.unwrap_err();
    assert!(matches!(err, crate::error::EventLoopError::Core(CoreError::Cancelled)));
}
