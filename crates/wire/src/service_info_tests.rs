// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn directory_id_is_reserved_as_one() {
    assert!(ServiceId::DIRECTORY.is_directory());
    assert_eq!(ServiceId::DIRECTORY.0, 1);
}

#[test]
fn empty_service_info_reports_empty() {
    assert!(ServiceInfo::empty().is_empty());
}

#[test]
fn unregistered_service_info_has_no_id_yet() {
    let info = ServiceInfo::unregistered("echo", vec![]);
    assert_eq!(info.service_id, ServiceId(0));
    assert_eq!(info.name, "echo");
}

#[test]
fn endpoint_for_protocol_returns_first_when_filter_empty() {
    let info = ServiceInfo {
        endpoints: vec![
            EndpointUrl::new("tcp", "h", 1),
            EndpointUrl::new("tcps", "h", 2),
        ],
        ..ServiceInfo::unregistered("svc", vec![])
    };
    assert_eq!(info.endpoint_for_protocol("").unwrap().protocol, "tcp");
}

#[test]
fn endpoint_for_protocol_finds_matching_protocol() {
    let info = ServiceInfo {
        endpoints: vec![
            EndpointUrl::new("tcp", "h", 1),
            EndpointUrl::new("tcps", "h", 2),
        ],
        ..ServiceInfo::unregistered("svc", vec![])
    };
    assert_eq!(info.endpoint_for_protocol("tcps").unwrap().port, 2);
}

#[test]
fn endpoint_for_protocol_misses_when_absent() {
    let info = ServiceInfo::unregistered("svc", vec![EndpointUrl::new("tcp", "h", 1)]);
    assert!(info.endpoint_for_protocol("tcps").is_none());
}

#[test]
fn service_info_serde_round_trip() {
    let info = ServiceInfo {
        service_id: ServiceId(2),
        endpoints: vec![EndpointUrl::new("tcp", "127.0.0.1", 45001)],
        ..ServiceInfo::unregistered("echo", vec![])
    };
    let json = serde_json::to_string(&info).unwrap();
    let back: ServiceInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(info, back);
}

#[test]
fn service_info_any_value_round_trip() {
    let info = ServiceInfo {
        service_id: ServiceId(2),
        endpoints: vec![EndpointUrl::new("tcp", "127.0.0.1", 45001)],
        ..ServiceInfo::unregistered("echo", vec![])
    };
    let value = info.to_any();
    let back = ServiceInfo::from_any(&value).unwrap();
    assert_eq!(info, back);
}
