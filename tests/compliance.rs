// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Golden byte sequences checked against a reference MQTT 5
//! implementation. The two byte short form for acknowledgement packets is
//! a documented carve-out: the reference encoder always writes the reason
//! code and property length, this codec omits both when they carry no
//! information, and both decoders accept both forms.

use mqtt5_codec::{
    read, AckProperties, ConnectAckPacket, ConnectAckProperties, ConnectPacket,
    ConnectProperties, DisconnectPacket, DisconnectProperties, Packet, PacketId,
    PingRequestPacket, PingResponsePacket, PublishAckPacket, PublishPacket, PublishProperties,
    QoS, ReasonCode, SubscribePacket, SubscribeProperties, SubscribeTopic, UnsubscribePacket,
    UnsubscribeProperties,
};

fn assert_wire_form(packet: &Packet, expected: &[u8]) {
    let buf = packet.write().unwrap();
    assert_eq!(&buf, expected, "encoding of {packet:?}");

    let (decoded, consumed) = read(expected).unwrap();
    assert_eq!(consumed, expected.len());
    assert_eq!(&decoded, packet, "decoding of {packet:?}");
}

#[test]
fn test_ping_request() {
    let packet = Packet::PingRequest(PingRequestPacket::new());
    assert_wire_form(&packet, &[0xc0, 0x00]);
}

#[test]
fn test_ping_response() {
    let packet = Packet::PingResponse(PingResponsePacket::new());
    assert_wire_form(&packet, &[0xd0, 0x00]);
}

#[test]
fn test_connect_ack() {
    let packet = Packet::ConnectAck(
        ConnectAckPacket::new(false, ReasonCode::Success, ConnectAckProperties::new()).unwrap(),
    );
    assert_wire_form(&packet, &[0x20, 0x03, 0x00, 0x00, 0x00]);
}

#[test]
fn test_publish_ack_short_form() {
    let packet = Packet::PublishAck(
        PublishAckPacket::new(PacketId::new(999), ReasonCode::Success, AckProperties::new())
            .unwrap(),
    );
    // Short form: the reason code and property length are omitted.
    assert_wire_form(&packet, &[0x40, 0x02, 0x03, 0xe7]);

    // The reference long form decodes to the same value.
    let long_form = [0x40, 0x04, 0x03, 0xe7, 0x00, 0x00];
    let (decoded, consumed) = read(&long_form).unwrap();
    assert_eq!(consumed, long_form.len());
    assert_eq!(decoded, packet);
}

#[test]
fn test_connect() {
    let packet = Packet::Connect(
        ConnectPacket::new(
            "Bulbasaur",
            true,
            60,
            None,
            None,
            None,
            ConnectProperties::new(),
        )
        .unwrap(),
    );
    assert_wire_form(
        &packet,
        &[
            0x10, 0x16, 0x00, 0x04, 0x4d, 0x51, 0x54, 0x54, 0x05, 0x02, 0x00, 0x3c, 0x00, 0x00,
            0x09, 0x42, 0x75, 0x6c, 0x62, 0x61, 0x73, 0x61, 0x75, 0x72,
        ],
    );
}

#[test]
fn test_publish() {
    let packet = Packet::Publish(
        PublishPacket::new(
            "t",
            QoS::AtMostOnce,
            b"hello",
            None,
            false,
            false,
            PublishProperties::new(),
        )
        .unwrap(),
    );
    assert_wire_form(
        &packet,
        &[0x30, 0x09, 0x00, 0x01, 0x74, 0x00, 0x68, 0x65, 0x6c, 0x6c, 0x6f],
    );
}

#[test]
fn test_subscribe() {
    let packet = Packet::Subscribe(
        SubscribePacket::new(
            PacketId::new(1234),
            vec![SubscribeTopic::new("foo/bar/+", QoS::AtMostOnce).unwrap()],
            SubscribeProperties::new(),
        )
        .unwrap(),
    );
    assert_wire_form(
        &packet,
        &[
            0x82, 0x0f, 0x04, 0xd2, 0x00, 0x00, 0x09, 0x66, 0x6f, 0x6f, 0x2f, 0x62, 0x61, 0x72,
            0x2f, 0x2b, 0x00,
        ],
    );
}

#[test]
fn test_unsubscribe() {
    let packet = Packet::Unsubscribe(
        UnsubscribePacket::new(
            PacketId::new(1234),
            &["foo/bar/+"],
            UnsubscribeProperties::new(),
        )
        .unwrap(),
    );
    assert_wire_form(
        &packet,
        &[
            0xa2, 0x0e, 0x04, 0xd2, 0x00, 0x00, 0x09, 0x66, 0x6f, 0x6f, 0x2f, 0x62, 0x61, 0x72,
            0x2f, 0x2b,
        ],
    );
}

#[test]
fn test_disconnect_short_form() {
    let packet = Packet::Disconnect(
        DisconnectPacket::new(ReasonCode::Success, DisconnectProperties::new()).unwrap(),
    );
    // Short form: a bare fixed header with remaining length 0.
    assert_wire_form(&packet, &[0xe0, 0x00]);

    // The reference long form decodes to the same value.
    let long_form = [0xe0, 0x02, 0x00, 0x00];
    let (decoded, consumed) = read(&long_form).unwrap();
    assert_eq!(consumed, long_form.len());
    assert_eq!(decoded, packet);
}

#[test]
fn test_publish_with_properties() {
    let mut properties = PublishProperties::new();
    properties.set_payload_format_indicator(Some(true));
    properties.set_message_expiry_interval(Some(30));
    let packet = Packet::Publish(
        PublishPacket::new(
            "t",
            QoS::AtLeastOnce,
            b"x",
            Some(PacketId::new(1)),
            false,
            false,
            properties,
        )
        .unwrap(),
    );
    assert_wire_form(
        &packet,
        &[
            0x32, 0x0e, 0x00, 0x01, 0x74, 0x00, 0x01, 0x07, 0x01, 0x01, 0x02, 0x00, 0x00, 0x00,
            0x1e, 0x78,
        ],
    );
}
