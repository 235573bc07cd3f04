// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-level types shared by every crate that sends or receives
//! messages: endpoint URLs, service directory records, the message
//! envelope, and its length-prefixed JSON codec.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod codec;
pub mod message;
pub mod service_info;
pub mod url;

pub use codec::{decode, encode, read_message, write_message, ProtocolError, MAX_FRAME_LEN};
pub use message::{Message, MessageKind};
pub use service_info::{ServiceId, ServiceInfo};
pub use url::{EndpointUrl, UrlParseError};