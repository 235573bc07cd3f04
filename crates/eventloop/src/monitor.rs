// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort liveness watchdog, spec.md §4.1: periodically posts a
//! marker to the watched loop and times the round trip out on a helper
//! loop. A stuck loop fails one check and the watchdog resets rather
//! than giving up, since the original's `_pingThread` never does either.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::warn;

use crate::event_loop::EventLoop;

/// Watches `watched` for responsiveness using `helper` to run the
/// timeout. Both loops may be the same loop for self-monitoring, or two
/// distinct loops watching each other.
pub struct Monitor {
    watched: EventLoop,
    helper: EventLoop,
    max_delay: Duration,
}

impl Monitor {
    pub fn new(watched: EventLoop, helper: EventLoop, max_delay: Duration) -> Self {
        Self { watched, helper, max_delay }
    }

    /// Run one ping/pong round trip. `Ok(())` if the marker returned
    /// within `max_delay`; `Err(())` ("event loop stuck") otherwise. The
    /// caller is expected to call this in a loop — a failed round does
    /// not stop subsequent ones.
    pub async fn check_once(&self) -> Result<(), ()> {
        let (tx, rx) = oneshot::channel();
        self.watched.post(Duration::ZERO, move || {
            let _ = tx.send(());
        });
        match self.helper.native_handle().spawn(tokio::time::timeout(self.max_delay, rx)).await {
            Ok(Ok(Ok(()))) => Ok(()),
            _ => {
                warn!("event loop stuck");
                Err(())
            }
        }
    }

    /// Check every `interval` until cancelled, invoking `on_stuck` for
    /// every failed round. Intended to be spawned onto `helper` and
    /// dropped (or aborted) to stop watching.
    pub async fn watch(self: Arc<Self>, interval: Duration, mut on_stuck: impl FnMut() + Send) -> ! {
        loop {
            if self.check_once().await.is_err() {
                on_stuck();
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
