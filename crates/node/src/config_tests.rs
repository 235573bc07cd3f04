// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serial_test::serial;

use super::*;

#[test]
#[serial]
fn default_listen_addr_is_loopback_any_port() {
    std::env::remove_var("MESHRPC_LISTEN_ADDR");
    let config = Config::load(Args { watchdog_latency: 0.0 }).unwrap();
    assert_eq!(config.listen_addr, "127.0.0.1:0".parse().unwrap());
    assert!(config.watchdog_latency.is_none());
}

#[test]
#[serial]
fn listen_addr_is_read_from_the_environment() {
    std::env::set_var("MESHRPC_LISTEN_ADDR", "0.0.0.0:9999");
    let config = Config::load(Args { watchdog_latency: 0.0 }).unwrap();
    std::env::remove_var("MESHRPC_LISTEN_ADDR");
    assert_eq!(config.listen_addr, "0.0.0.0:9999".parse().unwrap());
}

#[test]
#[serial]
fn a_positive_watchdog_latency_becomes_a_duration() {
    std::env::remove_var("MESHRPC_LISTEN_ADDR");
    let config = Config::load(Args { watchdog_latency: 2.5 }).unwrap();
    assert_eq!(config.watchdog_latency, Some(std::time::Duration::from_secs_f64(2.5)));
}

#[test]
#[serial]
fn an_invalid_listen_addr_is_rejected() {
    std::env::set_var("MESHRPC_LISTEN_ADDR", "not-an-address");
    let result = Config::load(Args { watchdog_latency: 0.0 });
    std::env::remove_var("MESHRPC_LISTEN_ADDR");
    assert!(result.is_err());
}
