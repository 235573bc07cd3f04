// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AnyObject`: a handle to either a local [`DynamicObject`] or a
//! [`RemoteObject`], hiding which — spec.md's glossary entry, grounded on
//! `makeDynamicAnyObject`'s role in `onRemoteObjectComplete`.

use meshrpc_core::{AnyValue, CoreError};
use meshrpc_object::{DynamicObject, MetaCallType};

use crate::error::SessionError;
use crate::remote_object::RemoteObject;

#[derive(Clone, PartialEq, Eq)]
pub enum AnyObject {
    Local(DynamicObject),
    Remote(RemoteObject),
}

impl AnyObject {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Calls `method_name` through whichever backend this handle wraps.
    pub async fn call(&self, method_name: &str, params: Vec<AnyValue>) -> Result<AnyValue, SessionError> {
        match self {
            Self::Local(object) => {
                let action = object
                    .meta_object()
                    .find_method(method_name)
                    .map(|m| m.id)
                    .ok_or_else(|| CoreError::resolution(format!("no such method: {method_name}")))?;
                object.meta_call(action, params, MetaCallType::Auto, None).await.map_err(Into::into)
            }
            Self::Remote(remote) => remote.call(method_name, params).await,
        }
    }
}

#[cfg(test)]
#[path = "any_object_tests.rs"]
mod tests;
