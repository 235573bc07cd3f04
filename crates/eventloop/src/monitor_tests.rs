// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;

#[tokio::test]
async fn check_once_succeeds_for_a_live_loop() {
    let watched = EventLoop::pool(1);
    let helper = EventLoop::pool(1);
    let monitor = Monitor::new(watched, helper, Duration::from_millis(500));
    assert!(monitor.check_once().await.is_ok());
}

#[tokio::test]
async fn check_once_reports_stuck_when_the_marker_never_returns() {
    // A loop with its only worker permanently busy never runs the
    // posted marker, so the round trip times out.
    let watched = EventLoop::pool(1);
    watched.post(Duration::ZERO, || std::thread::sleep(Duration::from_secs(5)));
    let helper = EventLoop::pool(1);
    let monitor = Monitor::new(watched, helper, Duration::from_millis(50));
    assert!(monitor.check_once().await.is_err());
}
