// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two scheduling backends behind one contract, spec.md §4.1: a
//! dedicated-thread single loop, and a multi-thread pool. Both hand out
//! the same `post`/`async_call`/`is_in_event_loop_thread` surface.

use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, error};

use crate::handle::AsyncCallHandle;

/// Keeps the backing runtime alive for as long as any `EventLoop` handle
/// referencing it exists; dropping the last one shuts the runtime down.
/// The `shutdown`/`join` slots are behind a `Mutex` rather than plain
/// `Option`s so [`Backing::shutdown`] can be called through a shared
/// `Arc<Backing>` (from [`EventLoop::shutdown`]) as well as from `Drop`;
/// taking either one twice is harmless.
enum Backing {
    /// Single-loop mode: a dedicated OS thread parked on a current-thread
    /// runtime until `shutdown` fires. Dropping this joins that thread.
    Dedicated {
        shutdown: Mutex<Option<tokio::sync::oneshot::Sender<()>>>,
        join: Mutex<Option<thread::JoinHandle<()>>>,
    },
    /// Pool mode: a multi-thread runtime owns its own worker threads.
    Pool(Runtime),
}

impl Backing {
    /// Idempotent: a no-op for pool mode, and a no-op on a second call
    /// for dedicated mode (the slots are already empty).
    fn shutdown(&self) {
        if let Backing::Dedicated { shutdown, join } = self {
            if let Some(tx) = shutdown.lock().take() {
                let _ = tx.send(());
            }
            if let Some(j) = join.lock().take() {
                let _ = j.join();
            }
        }
    }
}

impl Drop for Backing {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A handle to a running event loop. Cheap to clone; clones share the
/// same backing runtime and the same liveness as `post`/`async_call`.
#[derive(Clone)]
pub struct EventLoop {
    handle: Handle,
    /// `Some` in single-loop mode: the thread id `is_in_event_loop_thread`
    /// compares against. `None` in pool mode, where it is always false
    /// per spec.md §4.1.
    loop_thread: Option<ThreadId>,
    _backing: Arc<Backing>,
}

/// `0` means "pick a sensible default": `max(3, hardware_concurrency)`,
/// overridable with `EVENTLOOP_THREAD_COUNT` (spec.md §4.1).
pub fn default_thread_count() -> usize {
    let hardware = thread::available_parallelism().map(|n| n.get()).unwrap_or(3);
    meshrpc_core::env::eventloop_thread_count().unwrap_or(hardware).max(3)
}

impl EventLoop {
    /// One dedicated OS thread running a current-thread reactor.
    /// `is_in_event_loop_thread()` is true only from inside it.
    #[allow(clippy::expect_used)]
    pub fn single() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build single-loop runtime");
        let handle = runtime.handle().clone();
        let (id_tx, id_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let join = thread::Builder::new()
            .name("meshrpc-evloop".to_string())
            .spawn(move || {
                id_tx.send(thread::current().id()).ok();
                runtime.block_on(async {
                    let _ = shutdown_rx.await;
                });
            })
            .expect("failed to spawn single-loop thread");
        let loop_thread = id_rx.recv().ok();
        debug!(?loop_thread, "single-loop event loop started");
        Self {
            handle,
            loop_thread,
            _backing: Arc::new(Backing::Dedicated {
                shutdown: Mutex::new(Some(shutdown_tx)),
                join: Mutex::new(Some(join)),
            }),
        }
    }

    /// A worker pool of `nthread` threads (0 = [`default_thread_count`]).
    /// `is_in_event_loop_thread()` is always false here: no caller is
    /// ever synchronously "inside" a pool (spec.md §4.1).
    #[allow(clippy::expect_used)]
    pub fn pool(nthread: usize) -> Self {
        let nthread = if nthread == 0 { default_thread_count() } else { nthread };
        let runtime = Builder::new_multi_thread()
            .worker_threads(nthread)
            .thread_name("meshrpc-evloop-pool")
            .enable_all()
            .build()
            .expect("failed to build pool event loop runtime");
        let handle = runtime.handle().clone();
        debug!(nthread, "pool event loop started");
        Self { handle, loop_thread: None, _backing: Arc::new(Backing::Pool(runtime)) }
    }

    /// Fire-and-forget: run `f` after `delay` on this loop.
    pub fn post<F>(&self, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.handle.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            f();
        });
    }

    /// Schedule `f` after `delay`; returns a cancellable future of its
    /// result.
    pub fn async_call<T, F>(&self, delay: Duration, f: F) -> AsyncCallHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let task = self.handle.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            f()
        });
        AsyncCallHandle::new(task)
    }

    /// True iff the caller is running on this loop's own thread. Always
    /// false for a pool loop.
    pub fn is_in_event_loop_thread(&self) -> bool {
        self.loop_thread == Some(thread::current().id())
    }

    /// Escape hatch for components (e.g. the transport layer) that want
    /// to drive futures on the same reactor directly.
    pub fn native_handle(&self) -> &Handle {
        &self.handle
    }

    /// Explicit teardown: for a dedicated-thread loop, signals the
    /// thread to stop and joins it; a no-op for a pool loop (its workers
    /// wind down when the last `Runtime` handle drops) and for a loop
    /// already shut down. Idempotent and safe to call from any clone.
    ///
    /// Joining from inside the loop's own thread would deadlock, so that
    /// case only logs and hands the join off to a detached helper thread
    /// instead of blocking the caller.
    pub fn shutdown(&self) {
        if self.is_in_event_loop_thread() {
            error!("EventLoop::shutdown called from its own thread; joining from a helper thread");
            let backing = Arc::clone(&self._backing);
            thread::spawn(move || backing.shutdown());
            return;
        }
        self._backing.shutdown();
    }
}

#[cfg(test)]
#[path = "event_loop_tests.rs"]
mod tests;
