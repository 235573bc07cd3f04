// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! meshrpc-core: shared value model, ids, clock, error taxonomy, and
//! environment helpers used by every layer of the RPC core.

pub mod clock;
pub mod env;
pub mod error;
pub mod id;
pub mod machine;
pub mod value;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::CoreError;
pub use id::{short, IdBuf, ID_MAX_LEN};
pub use machine::{current_machine_id, MachineId};
pub use value::{sanitize, AnyValue, Signature, UNSERIALIZABLE};
