// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process configuration: `MESHRPC_LISTEN_ADDR` and the watchdog-latency
//! flag, following the teacher's `env.rs` one-function-per-variable shape.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:0";

#[derive(Debug, Parser)]
#[command(name = "meshrpcd", about = "MeshRPC service directory node")]
pub struct Args {
    /// Best-effort event-loop watchdog round-trip budget, in seconds.
    /// `0` disables the watchdog.
    #[arg(long, default_value_t = 0.0)]
    pub watchdog_latency: f64,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub watchdog_latency: Option<Duration>,
}

impl Config {
    pub fn load(args: Args) -> Result<Self, std::net::AddrParseError> {
        let listen_addr = std::env::var("MESHRPC_LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()?;
        let watchdog_latency =
            (args.watchdog_latency > 0.0).then(|| Duration::from_secs_f64(args.watchdog_latency));
        Ok(Self { listen_addr, watchdog_latency })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
