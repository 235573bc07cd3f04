// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `DynamicObject` (C3): the three owned-by-us-flagged tables plus
//! metaCall/metaPost/metaConnect/metaDisconnect/metaProperty/
//! metaSetProperty, grounded directly on `dynamicobject.cpp`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use meshrpc_core::{AnyValue, CoreError, Signature};
use meshrpc_eventloop::EventLoop;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tracing::{error, warn};

use crate::dispatch::{self, MetaCallType};
use crate::meta::MetaObject;
use crate::property::PropertyCell;
use crate::signal::{SignalBase, SignalLink, Subscriber};
use crate::stats::StatsTable;
use crate::trace::{TraceEventKind, TraceRingBuffer};

pub type MethodFn = Arc<dyn Fn(&[AnyValue]) -> Result<AnyValue, CoreError> + Send + Sync>;

/// Reserved action id answered directly by `meta_call` on every object,
/// never present in any `MetaObject`'s own method catalog: returns the
/// object's catalog via [`MetaObject::to_any`]. What a `RemoteObject`
/// calls in place of the original's `fetchMetaObject()` RPC.
pub const META_OBJECT_ACTION: u32 = u32::MAX;

/// How calls on this object are serialized. Only `SingleThread` objects
/// take the recursive lock in `Metadispatch` (spec.md §4.3/§5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadingModel {
    Default,
    SingleThread,
    MultiThread,
}

struct MethodEntry {
    func: MethodFn,
    call_type: MetaCallType,
}

struct SignalEntry {
    signal: Arc<Mutex<SignalBase>>,
    #[allow(dead_code)]
    owned_by_us: bool,
}

struct PropertyEntry {
    property: Arc<PropertyCell>,
    #[allow(dead_code)]
    owned_by_us: bool,
}

struct Inner {
    meta: RwLock<MetaObject>,
    methods: RwLock<HashMap<u32, MethodEntry>>,
    signals: Mutex<HashMap<u32, SignalEntry>>,
    properties: Mutex<HashMap<u32, PropertyEntry>>,
    threading_model: ThreadingModel,
    lock: Arc<ReentrantMutex<()>>,
    lock_timeout: Duration,
    event_loop: EventLoop,
    trace: Option<Arc<TraceRingBuffer>>,
    stats: Option<Arc<StatsTable>>,
}

/// Cheap to clone: every clone shares the same tables, so signal
/// subscriptions and method registrations made through one handle are
/// visible through any other.
#[derive(Clone)]
pub struct DynamicObject {
    inner: Arc<Inner>,
}

impl DynamicObject {
    pub fn new(threading_model: ThreadingModel, event_loop: EventLoop) -> Self {
        Self::with_observability(threading_model, event_loop, None, false)
    }

    /// Like [`new`](Self::new), additionally enabling call tracing (kept
    /// to the last `trace_capacity` events) and/or per-method stats.
    pub fn with_observability(
        threading_model: ThreadingModel,
        event_loop: EventLoop,
        trace_capacity: Option<usize>,
        stats_enabled: bool,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                meta: RwLock::new(MetaObject::new()),
                methods: RwLock::new(HashMap::new()),
                signals: Mutex::new(HashMap::new()),
                properties: Mutex::new(HashMap::new()),
                threading_model,
                lock: Arc::new(ReentrantMutex::new(())),
                lock_timeout: meshrpc_core::env::deadlock_timeout(),
                event_loop,
                trace: trace_capacity.map(|cap| Arc::new(TraceRingBuffer::new(cap))),
                stats: stats_enabled.then(|| Arc::new(StatsTable::new())),
            }),
        }
    }

    pub fn trace(&self) -> Option<&TraceRingBuffer> {
        self.inner.trace.as_deref()
    }

    pub fn stats(&self) -> Option<&StatsTable> {
        self.inner.stats.as_deref()
    }

    pub fn set_meta_object(&self, meta: MetaObject) {
        *self.inner.meta.write() = meta;
    }

    pub fn meta_object(&self) -> MetaObject {
        self.inner.meta.read().clone()
    }

    pub fn set_method(&self, id: u32, func: MethodFn, call_type: MetaCallType) {
        self.inner.methods.write().insert(id, MethodEntry { func, call_type });
    }

    /// Register a signal this object did not create itself (e.g. one
    /// lent by the framework's Manageable methods).
    pub fn set_signal(&self, id: u32, signal: Arc<Mutex<SignalBase>>) {
        self.inner.signals.lock().insert(id, SignalEntry { signal, owned_by_us: false });
    }

    pub fn set_property(&self, id: u32, property: Arc<PropertyCell>) {
        self.inner.properties.lock().insert(id, PropertyEntry { property, owned_by_us: false });
    }

    pub fn has_method(&self, id: u32) -> bool {
        self.inner.methods.read().contains_key(&id)
    }

    /// Get or lazily create the signal for `id`: an existing registered
    /// signal, a property's change signal if `id` names a property, or
    /// a fresh signal if `id` names a declared signal. `None` if `id` is
    /// none of those.
    fn create_signal(&self, id: u32) -> Option<Arc<Mutex<SignalBase>>> {
        if let Some(entry) = self.inner.signals.lock().get(&id) {
            return Some(entry.signal.clone());
        }
        if self.inner.meta.read().property(id).is_some() {
            // Subscribing to a property ID subscribes to its change
            // signal: relay every property-signal trigger onto a signal
            // registered under the property's own ID, so `metaConnect`
            // and `metaDisconnect` need only ever look in `signals`.
            let property = self.property_cell(id).ok()?;
            let relay = Arc::new(Mutex::new(SignalBase::new()));
            self.inner
                .signals
                .lock()
                .insert(id, SignalEntry { signal: relay.clone(), owned_by_us: false });
            property.signal().lock().connect(Arc::new(move |params: &[AnyValue]| {
                relay.lock().trigger(params);
            }));
            return self.inner.signals.lock().get(&id).map(|e| e.signal.clone());
        }
        if self.inner.meta.read().signal(id).is_some() {
            let signal = Arc::new(Mutex::new(SignalBase::new()));
            self.inner
                .signals
                .lock()
                .insert(id, SignalEntry { signal: signal.clone(), owned_by_us: true });
            return Some(signal);
        }
        None
    }

    fn property_cell(&self, id: u32) -> Result<Arc<PropertyCell>, CoreError> {
        if let Some(entry) = self.inner.properties.lock().get(&id) {
            return Ok(entry.property.clone());
        }
        self.inner
            .meta
            .read()
            .property(id)
            .ok_or_else(|| CoreError::resolution(format!("id {id} is not a property")))?;
        let cell = Arc::new(PropertyCell::new(AnyValue::Nil));
        self.inner.properties.lock().insert(id, PropertyEntry { property: cell.clone(), owned_by_us: true });
        Ok(cell)
    }

    /// `metaCall`: decide sync vs async and locking policy, then run the
    /// registered method, optionally checking the declared return
    /// signature converts to `return_sig`.
    pub async fn meta_call(
        &self,
        method_id: u32,
        params: Vec<AnyValue>,
        call_type: MetaCallType,
        return_sig: Option<Signature>,
    ) -> Result<AnyValue, CoreError> {
        if method_id == META_OBJECT_ACTION {
            return Ok(self.meta_object().to_any());
        }

        let entry = {
            let methods = self.inner.methods.read();
            methods.get(&method_id).map(|e| (e.func.clone(), e.call_type))
        };
        let (func, method_call_type) =
            entry.ok_or(CoreError::MethodNotFound(method_id))?;

        if let Some(ref wanted) = return_sig {
            if let Some(mm) = self.inner.meta.read().method(method_id) {
                if !mm.return_signature.is_convertible_to(wanted) {
                    if !wanted.is_convertible_to(&mm.return_signature) {
                        return Err(CoreError::SignatureMismatch(format!(
                            "cannot convert {:?} to {wanted:?}",
                            mm.return_signature
                        )));
                    }
                    warn!(method_id, "return signature might be incorrect depending on the value");
                }
            }
        }

        let sync = dispatch::decide_sync(&self.inner.event_loop, method_call_type, call_type);
        let do_lock = dispatch::should_lock(self.inner.threading_model, method_call_type);

        let trace_id = self.inner.trace.as_ref().map(|t| t.next_trace_id());
        if let (Some(trace), Some(trace_id)) = (&self.inner.trace, trace_id) {
            let args = AnyValue::List(params.clone());
            trace.record(trace_id, TraceEventKind::Call, method_id, &args);
        }

        let started = std::time::Instant::now();
        let result = dispatch::dispatch(
            &self.inner.event_loop,
            sync,
            do_lock,
            self.inner.lock.clone(),
            self.inner.lock_timeout,
            func,
            params,
        )
        .await;
        let wall = started.elapsed();

        if let Some(stats) = &self.inner.stats {
            stats.record(method_id, wall);
        }
        if let (Some(trace), Some(trace_id)) = (&self.inner.trace, trace_id) {
            match &result {
                Ok(value) => trace.record(trace_id, TraceEventKind::Result, method_id, value),
                Err(err) => {
                    trace.record(trace_id, TraceEventKind::Error, method_id, &AnyValue::from(err.to_string()))
                }
            }
        }

        result
    }

    /// `metaPost`: trigger the signal if one exists for `event_id`;
    /// otherwise, if it names a method, dispatch as a queued call and
    /// log any error; otherwise log and drop.
    pub fn meta_post(&self, event_id: u32, params: Vec<AnyValue>) {
        if let Some(signal) = self.create_signal(event_id) {
            signal.lock().trigger(&params);
            return;
        }
        if self.has_method(event_id) {
            let this = self.clone();
            self.inner.event_loop.native_handle().spawn(async move {
                if let Err(err) = this.meta_call(event_id, params, MetaCallType::Queued, None).await {
                    error!(%err, event_id, "metaPost dispatched as method call failed");
                }
            });
            return;
        }
        warn!(event_id, "no such event");
    }

    pub fn meta_connect(&self, event_id: u32, subscriber: Subscriber) -> Result<SignalLink, CoreError> {
        let signal = self
            .create_signal(event_id)
            .ok_or_else(|| CoreError::resolution("cannot find signal"))?;
        let link_id = signal.lock().connect(subscriber);
        Ok(SignalLink::pack(event_id, link_id))
    }

    pub fn meta_disconnect(&self, link: SignalLink) -> Result<(), CoreError> {
        let signal = self
            .create_signal(link.event_id())
            .ok_or_else(|| CoreError::resolution("cannot find local signal connection"))?;
        if signal.lock().disconnect(link.link_id()) {
            Ok(())
        } else {
            Err(CoreError::resolution("cannot find local signal connection"))
        }
    }

    pub fn meta_property(&self, id: u32) -> Result<AnyValue, CoreError> {
        Ok(self.property_cell(id)?.get())
    }

    pub fn meta_set_property(&self, id: u32, value: AnyValue) -> Result<(), CoreError> {
        self.property_cell(id)?.set(value);
        Ok(())
    }
}

/// Identity, not structural, equality: two clones of the same object are
/// equal; two distinct objects with identical tables are not. Used by
/// `AnyObject` to detect the race-on-publish case in the session resolver.
impl PartialEq for DynamicObject {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for DynamicObject {}

#[cfg(test)]
#[path = "dynamic_object_tests.rs"]
mod tests;
