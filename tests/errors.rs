// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Error handling in edge cases: truncated buffers, malformed packets and
//! rejected constructions.

mod common;

use mqtt5_codec::{
    read, DecodeError, PacketId, PublishPacket, PublishProperties, QoS, SubscribePacket,
    SubscribeProperties, UnsubscribePacket, UnsubscribeProperties,
};

#[test]
fn test_read_incomplete_buffer() {
    for packet in common::sample_packets() {
        let buf = packet.write().unwrap();
        for index in 0..buf.len() {
            assert_eq!(
                read(&buf[..index]),
                Err(DecodeError::Truncated),
                "prefix of {index} bytes for {packet:?}"
            );
        }
    }
}

#[test]
fn test_read_malformed_packet() {
    // Byte sequences which cannot be a legal MQTT 5 packet, whatever comes
    // after them.
    let cases: &[(&[u8], &str)] = &[
        (&[0x00, 0x02, 0x00, 0x00], "reserved packet type 0"),
        (
            &[
                0x10, 0x0d, 0x00, 0x03, 0x53, 0x53, 0x48, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x01, 0x31,
            ],
            "connect: protocol name SSH",
        ),
        (
            &[
                0x10, 0x0e, 0x00, 0x04, 0x4d, 0x51, 0x54, 0x54, 0x04, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x01, 0x31,
            ],
            "connect: protocol version 4",
        ),
        (
            &[0x20, 0x83, 0x80, 0x80, 0x80, 0x00, 0x00, 0x00],
            "connack: var int continuation bit in 4th byte",
        ),
        (
            &[0x20, 0x83, 0x00, 0x00, 0x00, 0x00],
            "connack: overlong var int encoding",
        ),
        (
            &[0x20, 0x03, 0x00, 0x8b, 0x00],
            "connack: reason code 0x8b belongs to DISCONNECT",
        ),
        (
            &[0x20, 0x06, 0x00, 0x00, 0x03, 0x23, 0xff, 0xff],
            "connack: topic alias property is not legal",
        ),
        (
            &[0x20, 0x02, 0x00, 0x00],
            "connack: missing property length",
        ),
        (
            &[0x30, 0x02, 0x00, 0x00],
            "publish: missing property length",
        ),
        (
            &[0x32, 0x03, 0x00, 0x00, 0x00],
            "publish: qos 1 without packet id",
        ),
        (
            &[0x34, 0x03, 0x00, 0x00, 0x00],
            "publish: qos 2 without packet id",
        ),
        (
            &[0x32, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00],
            "publish: qos 1 with zero packet id",
        ),
        (&[0x36, 0x03, 0x00, 0x00, 0x00], "publish: qos 3"),
        (
            &[0x60, 0x04, 0xff, 0xff, 0x00, 0x00],
            "pubrel: flag nibble 0x0 instead of 0x2",
        ),
        (
            &[0x72, 0x04, 0xff, 0xff, 0x00, 0x00],
            "pubcomp: flag nibble 0x2 instead of 0x0",
        ),
        (
            &[0x80, 0x06, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00],
            "subscribe: flag nibble 0x0 instead of 0x2",
        ),
        (
            &[0xa0, 0x05, 0xff, 0xff, 0x00, 0x00, 0x00],
            "unsubscribe: flag nibble 0x0 instead of 0x2",
        ),
        (
            &[0x40, 0x03, 0x00, 0x01, 0x00],
            "puback: reason code without property length",
        ),
        (
            &[0x82, 0x05, 0x04, 0xd2, 0x00, 0x00, 0x00],
            "subscribe: malformed topic filter list",
        ),
        (&[0xc0, 0x01, 0x00], "pingreq: non-zero remaining length"),
        (
            &[0x20, 0x04, 0x00, 0x00, 0x00, 0x00],
            "connack: byte left over after the declared fields",
        ),
    ];

    for (buf, name) in cases {
        let err = read(buf).expect_err(name);
        assert!(err.is_malformed(), "{name}: got {err:?}");
    }
}

#[test]
fn test_truncated_is_not_malformed() {
    let err = read(&[0xc0]).unwrap_err();
    assert!(err.is_truncated());
    assert!(!err.is_malformed());
}

#[test]
fn test_write_invalid_arguments() {
    // QoS 0 with a packet id.
    let ret = PublishPacket::new(
        "foo/bar",
        QoS::AtMostOnce,
        b"",
        Some(PacketId::new(1)),
        false,
        false,
        PublishProperties::new(),
    );
    assert!(ret.is_err());

    // QoS 1 without a packet id.
    let ret = PublishPacket::new(
        "foo/bar",
        QoS::AtLeastOnce,
        b"",
        None,
        false,
        false,
        PublishProperties::new(),
    );
    assert!(ret.is_err());

    // QoS 2 without a packet id.
    let ret = PublishPacket::new(
        "foo/bar",
        QoS::ExactOnce,
        b"",
        None,
        false,
        false,
        PublishProperties::new(),
    );
    assert!(ret.is_err());

    // DUP on a QoS 0 message.
    let ret = PublishPacket::new(
        "foo/bar",
        QoS::AtMostOnce,
        b"",
        None,
        true,
        false,
        PublishProperties::new(),
    );
    assert!(ret.is_err());

    // Empty subscription and unsubscription lists.
    let ret = SubscribePacket::new(PacketId::new(1), Vec::new(), SubscribeProperties::new());
    assert!(ret.is_err());
    let ret = UnsubscribePacket::new(PacketId::new(1), &[], UnsubscribeProperties::new());
    assert!(ret.is_err());

    // Zero packet ids where a non-zero one is required.
    let ret = SubscribePacket::new(PacketId::new(0), Vec::new(), SubscribeProperties::new());
    assert!(ret.is_err());
    let ret = PublishPacket::new(
        "foo/bar",
        QoS::AtLeastOnce,
        b"",
        Some(PacketId::new(0)),
        false,
        false,
        PublishProperties::new(),
    );
    assert!(ret.is_err());
}

#[test]
fn test_construction_error_names_field() {
    let err = PublishPacket::new(
        "t",
        QoS::AtLeastOnce,
        b"",
        None,
        false,
        false,
        PublishProperties::new(),
    )
    .unwrap_err();
    assert_eq!(err.field(), "packet_id");
    assert!(!err.reason().is_empty());
}
