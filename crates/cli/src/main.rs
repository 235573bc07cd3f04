// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::SocketAddr;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use meshrpc_cli::{display, Client};
use meshrpc_wire::EndpointUrl;

#[derive(Parser)]
#[command(name = "meshrpc", about = "Thin client for a running meshrpcd node")]
struct Cli {
    /// Address of the node to talk to.
    #[arg(long, default_value = "127.0.0.1:0")]
    addr: SocketAddr,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every service currently registered with the directory.
    List,
    /// Call a method on a named service.
    Call {
        service: String,
        method: String,
        /// Positional call arguments; each is parsed as JSON if
        /// possible, otherwise taken as a bare string.
        args: Vec<String>,
    },
    /// Register a standalone service with the node's directory and mark
    /// it ready. Mainly useful for exercising a node from the outside.
    Register {
        name: String,
        /// Endpoint URLs, e.g. `tcp://127.0.0.1:45001`.
        endpoints: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = Client::connect(cli.addr).await?;

    match cli.command {
        Command::List => {
            for info in client.list().await? {
                println!("{} (#{}) {:?}", info.name, info.service_id, info.endpoints);
            }
        }
        Command::Call { service, method, args } => {
            let params = args.iter().map(|a| display::parse_arg(a)).collect();
            let result = client.call(&service, &method, params).await?;
            println!("{}", serde_json::to_string_pretty(&display::any_to_json(&result))?);
        }
        Command::Register { name, endpoints } => {
            let endpoints =
                endpoints.iter().map(|e| EndpointUrl::from_str(e)).collect::<Result<Vec<_>, _>>()?;
            let id = client.register(&name, endpoints).await?;
            if id == 0 {
                println!("already registered");
            } else {
                println!("registered {name} as #{id}");
            }
        }
    }

    Ok(())
}
