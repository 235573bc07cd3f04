// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;

#[test]
fn records_accumulate_per_method() {
    let table = StatsTable::new();
    table.record(1, Duration::from_millis(10));
    table.record(1, Duration::from_millis(30));
    table.record(2, Duration::from_millis(5));

    let m1 = table.get(1).unwrap();
    assert_eq!(m1.count, 2);
    assert_eq!(m1.min_wall, Duration::from_millis(10));
    assert_eq!(m1.max_wall, Duration::from_millis(30));
    assert_eq!(m1.mean_wall(), Duration::from_millis(20));

    assert_eq!(table.get(2).unwrap().count, 1);
    assert!(table.get(3).is_none());
}

#[test]
fn mean_of_unrecorded_method_is_zero() {
    let stats = MethodStats::default();
    assert_eq!(stats.mean_wall(), Duration::ZERO);
}
