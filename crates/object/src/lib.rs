// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dynamic object core (C3/C4): meta object catalogs, signals,
//! properties, the manageable id range, the sync/async dispatch
//! decision, and optional call tracing/stats.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod dispatch;
pub mod dynamic_object;
pub mod manageable;
pub mod meta;
pub mod property;
pub mod signal;
pub mod stats;
pub mod trace;

pub use dispatch::MetaCallType;
pub use dynamic_object::{DynamicObject, MethodFn, ThreadingModel, META_OBJECT_ACTION};
pub use manageable::{is_manageable_id, MANAGEABLE_END_ID, MANAGEABLE_START_ID};
pub use meta::{MetaMethod, MetaObject, MetaProperty, MetaSignal};
pub use property::PropertyCell;
pub use signal::{SignalBase, SignalLink, Subscriber};
pub use stats::{MethodStats, StatsTable};
pub use trace::{EventTrace, TraceEventKind, TraceRingBuffer};
