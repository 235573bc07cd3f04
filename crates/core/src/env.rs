// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the RPC core, mirroring
//! spec.md §6's "Environment variables recognized" list.

use std::time::Duration;

/// `EVENTLOOP_THREAD_COUNT` override for the default pool size. `None`
/// means "use `max(3, hardware_concurrency)`" per spec.md §4.1.
pub fn eventloop_thread_count() -> Option<usize> {
    std::env::var("EVENTLOOP_THREAD_COUNT").ok().and_then(|s| s.parse().ok())
}

/// `EVENTLOOP_NO_CPU_AFFINITY` — when set (to any value), skip pinning the
/// single-loop thread to a CPU core.
pub fn eventloop_no_cpu_affinity() -> bool {
    std::env::var("EVENTLOOP_NO_CPU_AFFINITY").is_ok()
}

/// `DEADLOCK_TIMEOUT` in milliseconds, default 30 000 per spec.md §4.4.
pub fn deadlock_timeout() -> Duration {
    std::env::var("DEADLOCK_TIMEOUT")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(30_000))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
