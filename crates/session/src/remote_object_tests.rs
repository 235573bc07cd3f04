// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use meshrpc_core::{AnyValue, Signature};
use meshrpc_eventloop::EventLoop;
use meshrpc_object::{DynamicObject, MetaCallType, MetaMethod, MetaObject, ThreadingModel};
use meshrpc_transport::local::{listen, LocalConnector};
use meshrpc_transport::{Connector, Router, Socket};
use meshrpc_wire::EndpointUrl;

use super::*;

fn echo_object() -> DynamicObject {
    let object = DynamicObject::new(ThreadingModel::Default, EventLoop::pool(1));
    object.set_meta_object(MetaObject::new().with_method(MetaMethod {
        id: 1,
        name: "echo".to_string(),
        param_signature: Signature::Dynamic,
        return_signature: Signature::Dynamic,
    }));
    object.set_method(
        1,
        Arc::new(|params| Ok(params.first().cloned().unwrap_or(AnyValue::Nil))),
        MetaCallType::Auto,
    );
    object
}

async fn connect(name: &str, service_id: u32) -> Socket {
    let router = Router::new();
    router.bind(service_id, MAIN_OBJECT_ID, echo_object());
    let _listener = listen(name.to_string(), router);

    let transport = LocalConnector.dial(&EndpointUrl::local(name)).await.unwrap();
    Socket::new(transport)
}

#[tokio::test]
async fn fetch_meta_object_populates_the_catalog() {
    let socket = connect("remote-fetch", 7).await;
    let remote = RemoteObject::bind(socket, 7);
    remote.fetch_meta_object().await.unwrap();
    // A second fetch must not re-dial: idempotent via `OnceCell`.
    remote.fetch_meta_object().await.unwrap();
}

#[tokio::test]
async fn call_round_trips_by_method_name() {
    let socket = connect("remote-call", 8).await;
    let remote = RemoteObject::bind(socket, 8);
    let result = remote.call("echo", vec![AnyValue::Int(42)]).await.unwrap();
    assert_eq!(result, AnyValue::Int(42));
}

#[tokio::test]
async fn calling_an_unknown_method_name_fails() {
    let socket = connect("remote-unknown", 9).await;
    let remote = RemoteObject::bind(socket, 9);
    assert!(remote.call("nope", vec![]).await.is_err());
}

#[tokio::test]
async fn a_closed_remote_object_refuses_further_calls() {
    let socket = connect("remote-closed", 10).await;
    let remote = RemoteObject::bind(socket, 10);
    remote.close();
    assert!(remote.call("echo", vec![AnyValue::Int(1)]).await.is_err());
}
