// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use meshrpc_core::AnyValue;
use meshrpc_eventloop::EventLoop;
use meshrpc_object::{DynamicObject, MetaCallType, ThreadingModel};

use super::*;

fn echo_object() -> DynamicObject {
    let object = DynamicObject::new(ThreadingModel::Default, EventLoop::pool(1));
    object.set_method(
        1,
        Arc::new(|params| Ok(params.first().cloned().unwrap_or(AnyValue::Nil))),
        MetaCallType::Auto,
    );
    object
}

#[tokio::test]
async fn call_round_trips_over_a_real_tcp_connection() {
    let router = Router::new();
    router.bind(2, 1, echo_object());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accept_router = router.clone();
    tokio::spawn(async move {
        let _ = accept(&listener, accept_router).await;
    });

    let connector = TcpConnector::new(Router::new());
    let url = EndpointUrl::new("tcp", "127.0.0.1", addr.port());
    let transport = connector.dial(&url).await.unwrap();

    let reply = transport
        .call(Message::call(2, 1, 1, AnyValue::Tuple(vec![AnyValue::Int(5)])))
        .await
        .unwrap();
    assert_eq!(reply.kind, MessageKind::Reply);
    assert_eq!(reply.payload, AnyValue::Int(5));
}

#[tokio::test]
async fn closed_resolves_after_the_peer_disconnects() {
    let router = Router::new();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);
    });

    let connector = TcpConnector::new(router);
    let url = EndpointUrl::new("tcp", "127.0.0.1", addr.port());
    let transport = connector.dial(&url).await.unwrap();

    tokio::time::timeout(std::time::Duration::from_secs(2), transport.closed())
        .await
        .expect("closed() should resolve once the peer drops the stream");
}

#[tokio::test]
async fn dial_to_a_closed_port_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let connector = TcpConnector::new(Router::new());
    let url = EndpointUrl::new("tcp", "127.0.0.1", addr.port());
    assert!(connector.dial(&url).await.is_err());
}
