// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-lifetime default loops, spec.md §5: a "network" loop and an
//! "object" loop. Reference-equivalent singletons, built lazily on
//! first use and torn down only by an explicit call — there is no
//! destructor hook to rely on with `unsafe_code = "forbid"` ruling out
//! an `atexit`-style trick.

use std::sync::OnceLock;

use crate::event_loop::EventLoop;

static NETWORK: OnceLock<EventLoop> = OnceLock::new();
static OBJECT: OnceLock<EventLoop> = OnceLock::new();
static POOL: OnceLock<EventLoop> = OnceLock::new();

/// The default loop used to drive transport I/O.
pub fn network_event_loop() -> &'static EventLoop {
    NETWORK.get_or_init(|| EventLoop::pool(crate::event_loop::default_thread_count()))
}

/// The default loop user callbacks are delivered on — single-threaded,
/// so `isInEventLoopThread` is meaningful for reentrancy checks.
pub fn object_event_loop() -> &'static EventLoop {
    OBJECT.get_or_init(EventLoop::single)
}

/// The default loop for arbitrary user work.
pub fn pool_event_loop() -> &'static EventLoop {
    POOL.get_or_init(|| EventLoop::pool(crate::event_loop::default_thread_count()))
}

/// Shuts down whichever of the three default loops were actually
/// touched; one never initialized is left alone. Meant to be called once,
/// near process exit — `OnceLock` statics are never dropped, so without
/// this the dedicated-thread loops' threads would simply be killed with
/// the process rather than joined.
pub fn shutdown_defaults() {
    if let Some(loop_) = NETWORK.get() {
        loop_.shutdown();
    }
    if let Some(loop_) = OBJECT.get() {
        loop_.shutdown();
    }
    if let Some(loop_) = POOL.get() {
        loop_.shutdown();
    }
}

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;
