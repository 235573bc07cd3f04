// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use meshrpc_core::{AnyValue, CoreError, Signature};

use super::*;
use crate::meta::{MetaMethod, MetaProperty, MetaObject};

fn object() -> DynamicObject {
    DynamicObject::new(ThreadingModel::Default, EventLoop::pool(2))
}

#[tokio::test]
async fn meta_call_invokes_the_registered_method() {
    let obj = object();
    obj.set_method(
        1,
        Arc::new(|params: &[AnyValue]| Ok(params[0].clone())),
        MetaCallType::Auto,
    );
    let result = obj.meta_call(1, vec![AnyValue::Int(9)], MetaCallType::Direct, None).await;
    assert_eq!(result.unwrap(), AnyValue::Int(9));
}

#[tokio::test]
async fn meta_call_reports_missing_method() {
    let obj = object();
    let err = obj.meta_call(42, vec![], MetaCallType::Direct, None).await.unwrap_err();
    assert!(matches!(err, CoreError::MethodNotFound(42)));
}

#[tokio::test]
async fn meta_call_rejects_an_unconvertible_return_signature() {
    let obj = object();
    obj.set_method(1, Arc::new(|_: &[AnyValue]| Ok(AnyValue::Int(1))), MetaCallType::Auto);
    obj.set_meta_object(MetaObject::new().with_method(MetaMethod {
        id: 1,
        name: "m".to_string(),
        param_signature: Signature::Dynamic,
        return_signature: Signature::String,
    }));
    let err = obj
        .meta_call(1, vec![], MetaCallType::Direct, Some(Signature::Bool))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::SignatureMismatch(_)));
}

#[tokio::test]
async fn meta_call_accepts_a_dynamic_return_signature() {
    let obj = object();
    obj.set_method(1, Arc::new(|_: &[AnyValue]| Ok(AnyValue::Int(1))), MetaCallType::Auto);
    obj.set_meta_object(MetaObject::new().with_method(MetaMethod {
        id: 1,
        name: "m".to_string(),
        param_signature: Signature::Dynamic,
        return_signature: Signature::Int,
    }));
    let result =
        obj.meta_call(1, vec![], MetaCallType::Direct, Some(Signature::Dynamic)).await;
    assert!(result.is_ok());
}

#[test]
fn meta_connect_and_disconnect_round_trip() {
    let obj = object();
    obj.set_meta_object(MetaObject::new().with_signal(crate::meta::MetaSignal {
        id: 5,
        name: "changed".to_string(),
        param_signature: Signature::Dynamic,
    }));
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let link = obj
        .meta_connect(5, Arc::new(move |_: &[AnyValue]| {
            c.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
    assert_eq!(link.event_id(), 5);
    obj.meta_post(5, vec![]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    obj.meta_disconnect(link).unwrap();
    obj.meta_post(5, vec![]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn meta_disconnect_of_unknown_link_fails() {
    let obj = object();
    obj.set_meta_object(MetaObject::new().with_signal(crate::meta::MetaSignal {
        id: 5,
        name: "changed".to_string(),
        param_signature: Signature::Dynamic,
    }));
    let err = obj.meta_disconnect(SignalLink::pack(5, 999)).unwrap_err();
    assert!(matches!(err, CoreError::Resolution(_)));
}

#[test]
fn property_get_set_round_trip() {
    let obj = object();
    obj.set_meta_object(MetaObject::new().with_property(MetaProperty {
        id: 2,
        name: "volume".to_string(),
        signature: Signature::Int,
    }));
    assert_eq!(obj.meta_property(2).unwrap(), AnyValue::Nil);
    obj.meta_set_property(2, AnyValue::Int(11)).unwrap();
    assert_eq!(obj.meta_property(2).unwrap(), AnyValue::Int(11));
}

#[test]
fn connecting_to_a_property_id_subscribes_to_its_change_signal() {
    let obj = object();
    obj.set_meta_object(MetaObject::new().with_property(MetaProperty {
        id: 2,
        name: "volume".to_string(),
        signature: Signature::Int,
    }));
    let seen = Arc::new(StdMutex::new(None));
    let s = seen.clone();
    obj.meta_connect(
        2,
        Arc::new(move |params: &[AnyValue]| {
            *s.lock().unwrap() = params.first().cloned();
        }),
    )
    .unwrap();
    obj.meta_set_property(2, AnyValue::Int(3)).unwrap();
    assert_eq!(*seen.lock().unwrap(), Some(AnyValue::Int(3)));
}

#[test]
fn meta_post_to_unknown_event_is_a_harmless_no_op() {
    let obj = object();
    obj.meta_post(123, vec![]);
}

#[tokio::test]
async fn meta_post_on_a_method_id_dispatches_as_a_queued_call() {
    let obj = object();
    let ran = Arc::new(AtomicUsize::new(0));
    let r = ran.clone();
    obj.set_method(
        7,
        Arc::new(move |_: &[AnyValue]| {
            r.fetch_add(1, Ordering::SeqCst);
            Ok(AnyValue::Nil)
        }),
        MetaCallType::Auto,
    );
    obj.meta_post(7, vec![]);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn meta_call_on_the_reserved_action_returns_the_meta_object() {
    let obj = object();
    obj.set_meta_object(MetaObject::new().with_method(MetaMethod {
        id: 1,
        name: "ping".to_string(),
        param_signature: Signature::Nil,
        return_signature: Signature::Nil,
    }));
    let result =
        obj.meta_call(META_OBJECT_ACTION, vec![], MetaCallType::Direct, None).await.unwrap();
    let back = MetaObject::from_any(&result).unwrap();
    assert_eq!(back.method(1).unwrap().name, "ping");
}

#[test]
fn equality_is_by_identity_not_by_contents() {
    let a = object();
    let b = a.clone();
    let c = object();
    assert_eq!(a, b);
    assert_ne!(a, c);
}
