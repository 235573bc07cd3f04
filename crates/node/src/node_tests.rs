// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use meshrpc_core::AnyValue;
use meshrpc_eventloop::EventLoop;
use meshrpc_session::RemoteObject;
use meshrpc_transport::{Connector, Router, Socket, TcpConnector};
use meshrpc_wire::{EndpointUrl, ServiceId};

use super::*;

async fn start() -> (Node, tokio::sync::oneshot::Sender<()>) {
    let node = Node::bootstrap_on(
        "127.0.0.1:0".parse().unwrap(),
        None,
        EventLoop::pool(2),
        EventLoop::single(),
    )
    .await
    .unwrap();
    let (tx, _rx) = tokio::sync::oneshot::channel();
    (node, tx)
}

async fn dial(addr: std::net::SocketAddr) -> Socket {
    let transport = TcpConnector::new(Router::new())
        .dial(&EndpointUrl::new("tcp", addr.ip().to_string(), addr.port()))
        .await
        .unwrap();
    Socket::new(transport)
}

#[tokio::test]
async fn the_directory_is_registered_locally_under_its_own_name() {
    let (node, _tx) = start().await;
    let handle = node.resolver.service(DIRECTORY_SERVICE_NAME, "").await.unwrap();
    assert!(handle.is_local());
}

#[tokio::test]
async fn a_remote_client_can_call_the_bootstrapped_directory() {
    let (node, shutdown_tx) = start().await;
    let addr = node.local_addr().unwrap();
    let (_tx, rx) = tokio::sync::oneshot::channel();
    let run = tokio::spawn(node.run(rx));

    let socket = dial(addr).await;
    let remote = RemoteObject::bind(socket, ServiceId::DIRECTORY.0);
    let result = remote.call("services", vec![]).await.unwrap();
    let AnyValue::List(services) = result else {
        panic!("expected a list");
    };
    assert_eq!(services.len(), 1, "only the bootstrap entry should be registered yet");

    drop(shutdown_tx);
    let _ = run.await;
}

#[tokio::test]
async fn the_accept_loop_survives_a_client_disconnecting() {
    let (node, shutdown_tx) = start().await;
    let addr = node.local_addr().unwrap();
    let (_tx, rx) = tokio::sync::oneshot::channel();
    let run = tokio::spawn(node.run(rx));

    let socket = dial(addr).await;
    drop(socket);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!run.is_finished(), "the accept loop must keep running after a peer disconnects");

    drop(shutdown_tx);
    let _ = run.await;
}
