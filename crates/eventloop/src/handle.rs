// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The future returned by [`crate::EventLoop::async_call`]: resolves with
//! the closure's result, but can be cancelled before it runs.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::error::EventLoopError;

/// A cancellable, awaitable handle to delayed work scheduled on an
/// [`crate::EventLoop`]. Dropping it without calling [`cancel`] lets the
/// task run to completion unobserved, mirroring a detached `Future<T>`.
///
/// [`cancel`]: AsyncCallHandle::cancel
pub struct AsyncCallHandle<T> {
    task: JoinHandle<T>,
}

impl<T> AsyncCallHandle<T> {
    pub(crate) fn new(task: JoinHandle<T>) -> Self {
        Self { task }
    }

    /// Cancel the pending task. If it has not started running yet it
    /// never will; if it is already running it completes unobserved and
    /// this handle resolves to `CoreError::Cancelled` regardless.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl<T: Send + 'static> Future for AsyncCallHandle<T> {
    type Output = Result<T, EventLoopError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.task).poll(cx).map(|res| res.map_err(EventLoopError::from))
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
