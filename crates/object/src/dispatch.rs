// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metadispatch (C4): the sync-vs-async decision tree and locking policy
//! from the free function `qi::metaCall` in the original dynamic object
//! core, plus the timed recursive lock that guards `SingleThread`
//! objects (`locked_call`, `QI_DEADLOCK_TIMEOUT`).

use std::sync::Arc;

use meshrpc_core::{AnyValue, CoreError};
use meshrpc_eventloop::EventLoop;
use parking_lot::ReentrantMutex;
use tracing::{debug, warn};

use crate::dynamic_object::{MethodFn, ThreadingModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCallType {
    /// Defer to the caller's `call_type` when in doubt.
    Auto,
    /// Always run synchronously on the caller's thread.
    Direct,
    /// Always funnel through the event loop.
    Queued,
}

/// True iff the call should run synchronously on the caller's thread.
/// Mirrors `qi::metaCall`'s three-branch rule: if an event loop is
/// known, sync iff the caller is already on it; otherwise the method's
/// own threading hint wins; failing that, the caller's requested call
/// type decides.
pub fn decide_sync(el: &EventLoop, method_call_type: MetaCallType, call_type: MetaCallType) -> bool {
    if el.is_in_event_loop_thread() {
        return true;
    }
    match method_call_type {
        MetaCallType::Auto => call_type != MetaCallType::Queued,
        other => other == MetaCallType::Direct,
    }
}

/// True iff the call must take the object's recursive lock: only
/// `SingleThread` objects serialize calls, and only when the method
/// itself has no explicit threading opinion.
pub fn should_lock(threading_model: ThreadingModel, method_call_type: MetaCallType) -> bool {
    threading_model == ThreadingModel::SingleThread && method_call_type == MetaCallType::Auto
}

/// Run `func(params)`, taking `lock` first if `do_lock`, waiting up to
/// `timeout` for it. A timed-out acquisition surfaces as
/// `CoreError::DeadlockTimeout` rather than blocking forever.
pub fn call_locked(
    func: &MethodFn,
    params: &[AnyValue],
    do_lock: bool,
    lock: &ReentrantMutex<()>,
    timeout: std::time::Duration,
) -> Result<AnyValue, CoreError> {
    if !do_lock {
        return func(params);
    }
    if timeout.is_zero() {
        let _guard = lock.lock();
        return func(params);
    }
    debug!("acquiring object lock");
    match lock.try_lock_for(timeout) {
        Some(_guard) => func(params),
        None => {
            warn!("timed out acquiring object lock when calling method. Deadlock?");
            Err(CoreError::DeadlockTimeout)
        }
    }
}

/// Dispatch one call according to the sync/async decision, funneling
/// the async path through `el`.
pub async fn dispatch(
    el: &EventLoop,
    sync: bool,
    do_lock: bool,
    lock: Arc<ReentrantMutex<()>>,
    timeout: std::time::Duration,
    func: MethodFn,
    params: Vec<AnyValue>,
) -> Result<AnyValue, CoreError> {
    if sync {
        return call_locked(&func, &params, do_lock, &lock, timeout);
    }
    el.async_call(std::time::Duration::ZERO, move || {
        call_locked(&func, &params, do_lock, &lock, timeout)
    })
    .await
    .map_err(|_| CoreError::Cancelled)?
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
