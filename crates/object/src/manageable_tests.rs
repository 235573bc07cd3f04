// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn range_boundaries() {
    assert!(is_manageable_id(0));
    assert!(is_manageable_id(99));
    assert!(!is_manageable_id(100));
}

#[test]
fn user_method_ids_start_past_the_reserved_range() {
    assert!(!is_manageable_id(MANAGEABLE_END_ID));
    assert!(!is_manageable_id(MANAGEABLE_END_ID + 1));
}
