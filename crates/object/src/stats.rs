// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-method call statistics, grounded on the `call()` helper's
//! `pushStats(methodId, wall, userCpu, systemCpu)` branch.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MethodStats {
    pub count: u64,
    pub total_wall: Duration,
    pub min_wall: Duration,
    pub max_wall: Duration,
}

impl MethodStats {
    fn record(&mut self, wall: Duration) {
        self.count += 1;
        self.total_wall += wall;
        self.min_wall = if self.count == 1 { wall } else { self.min_wall.min(wall) };
        self.max_wall = self.max_wall.max(wall);
    }

    pub fn mean_wall(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total_wall / self.count as u32
        }
    }
}

pub struct StatsTable {
    entries: Mutex<HashMap<u32, MethodStats>>,
}

impl StatsTable {
    pub fn new() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }

    pub fn record(&self, method_id: u32, wall: Duration) {
        let mut entries = self.entries.lock();
        let entry = entries.entry(method_id).or_default();
        entry.record(wall);
        info!(method_id, ?wall, count = entry.count, "method call stats");
    }

    pub fn get(&self, method_id: u32) -> Option<MethodStats> {
        self.entries.lock().get(&method_id).copied()
    }
}

impl Default for StatsTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
