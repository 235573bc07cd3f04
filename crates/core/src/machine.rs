// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-process machine identity, stood in for `qi::os::getMachineId()`:
//! the original reads a persisted host UUID, generating one on first run.
//! This workspace has no persisted state (spec.md §1 Non-goals), so the
//! id is generated once per process and held for its lifetime.

use std::sync::OnceLock;

crate::define_id! {
    /// Identifies the host process a [`crate::Signature`]-described
    /// service runs on, carried on `ServiceInfo`.
    pub struct MachineId("mch-");
}

static CURRENT: OnceLock<MachineId> = OnceLock::new();

/// The id for the current process, generated once and reused thereafter.
pub fn current_machine_id() -> MachineId {
    *CURRENT.get_or_init(MachineId::new)
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
