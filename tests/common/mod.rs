// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use mqtt5_codec::{
    AckProperties, AuthPacket, AuthProperties, ConnectAckPacket, ConnectAckProperties,
    ConnectPacket, ConnectProperties, DisconnectPacket, DisconnectProperties, Packet, PacketId,
    PingRequestPacket, PingResponsePacket, PublishAckPacket, PublishCompletePacket,
    PublishPacket, PublishProperties, PublishReceivedPacket, PublishReleasePacket, QoS,
    ReasonCode, RetainHandling, SubscribeAckPacket, SubscribePacket, SubscribeProperties,
    SubscribeTopic, UnsubscribeAckPacket, UnsubscribePacket, UnsubscribeProperties, Will,
    WillProperties,
};

/// One representative value per packet type, plus variants that exercise
/// the optional parts: will message, credentials, properties, `QoS` 2
/// delivery and non-default reason codes.
#[allow(clippy::too_many_lines)]
pub fn sample_packets() -> Vec<Packet> {
    let connect = ConnectPacket::new(
        "Bulbasaur",
        true,
        60,
        None,
        None,
        None,
        ConnectProperties::new(),
    )
    .unwrap();

    let mut will_properties = WillProperties::new();
    will_properties.set_will_delay_interval(Some(10));
    will_properties.set_payload_format_indicator(Some(true));
    will_properties.add_user_property("scope", "will").unwrap();
    let will = Will::new(
        "will/topic",
        b"gone",
        QoS::AtLeastOnce,
        true,
        will_properties,
    )
    .unwrap();
    let mut connect_properties = ConnectProperties::new();
    connect_properties.set_session_expiry_interval(Some(0));
    connect_properties.set_receive_maximum(Some(24)).unwrap();
    connect_properties.set_topic_alias_maximum(Some(16));
    let connect_full = ConnectPacket::new(
        "",
        false,
        30,
        Some(will),
        Some("user"),
        Some(b"secret"),
        connect_properties,
    )
    .unwrap();

    let connect_ack =
        ConnectAckPacket::new(false, ReasonCode::Success, ConnectAckProperties::new()).unwrap();
    let mut connect_ack_properties = ConnectAckProperties::new();
    connect_ack_properties
        .set_assigned_client_identifier(Some("Pikachu"))
        .unwrap();
    connect_ack_properties
        .set_maximum_qos(Some(QoS::AtLeastOnce))
        .unwrap();
    connect_ack_properties.set_server_keep_alive(Some(120));
    let connect_ack_full =
        ConnectAckPacket::new(true, ReasonCode::NotAuthorized, connect_ack_properties).unwrap();

    let publish = PublishPacket::new(
        "foo/bar/+",
        QoS::AtMostOnce,
        &[0x12; 256],
        None,
        false,
        false,
        PublishProperties::new(),
    )
    .unwrap();
    let mut publish_properties = PublishProperties::new();
    publish_properties.set_message_expiry_interval(Some(0));
    publish_properties.set_topic_alias(Some(8)).unwrap();
    publish_properties.set_content_type(Some("text/plain")).unwrap();
    publish_properties.add_subscription_identifier(1).unwrap();
    publish_properties
        .add_subscription_identifier(268_435_455)
        .unwrap();
    publish_properties.add_user_property("k", "v1").unwrap();
    publish_properties.add_user_property("k", "v2").unwrap();
    let publish_qos2 = PublishPacket::new(
        "a/b",
        QoS::ExactOnce,
        b"",
        Some(PacketId::new(77)),
        true,
        true,
        publish_properties,
    )
    .unwrap();

    let publish_ack = PublishAckPacket::new(
        PacketId::new(1234),
        ReasonCode::Success,
        AckProperties::new(),
    )
    .unwrap();
    let mut publish_ack_properties = AckProperties::new();
    publish_ack_properties.set_reason_string(Some("over quota")).unwrap();
    let publish_ack_full = PublishAckPacket::new(
        PacketId::new(9),
        ReasonCode::QuotaExceeded,
        publish_ack_properties,
    )
    .unwrap();

    let publish_received = PublishReceivedPacket::new(
        PacketId::new(1234),
        ReasonCode::Success,
        AckProperties::new(),
    )
    .unwrap();
    let publish_release = PublishReleasePacket::new(
        PacketId::new(1234),
        ReasonCode::PacketIdentifierNotFound,
        AckProperties::new(),
    )
    .unwrap();
    let publish_complete = PublishCompletePacket::new(
        PacketId::new(1234),
        ReasonCode::Success,
        AckProperties::new(),
    )
    .unwrap();

    let subscribe = SubscribePacket::new(
        PacketId::new(1234),
        vec![SubscribeTopic::new("foo/bar/+", QoS::AtMostOnce).unwrap()],
        SubscribeProperties::new(),
    )
    .unwrap();
    let mut options = SubscribeTopic::new("sensors/#", QoS::ExactOnce).unwrap();
    options
        .set_no_local(true)
        .set_retain_as_published(true)
        .set_retain_handling(RetainHandling::NoSend);
    let mut subscribe_properties = SubscribeProperties::new();
    subscribe_properties.set_subscription_identifier(Some(7)).unwrap();
    let subscribe_full = SubscribePacket::new(
        PacketId::new(2),
        vec![
            options,
            SubscribeTopic::new("plain", QoS::AtLeastOnce).unwrap(),
        ],
        subscribe_properties,
    )
    .unwrap();

    let subscribe_ack = SubscribeAckPacket::new(
        PacketId::new(1234),
        vec![ReasonCode::Success, ReasonCode::GrantedQoS2],
        AckProperties::new(),
    )
    .unwrap();

    let unsubscribe = UnsubscribePacket::new(
        PacketId::new(1234),
        &["foo/bar/+"],
        UnsubscribeProperties::new(),
    )
    .unwrap();

    let unsubscribe_ack = UnsubscribeAckPacket::new(
        PacketId::new(1234),
        vec![ReasonCode::Success, ReasonCode::NoSubscriptionExisted],
        AckProperties::new(),
    )
    .unwrap();

    let disconnect =
        DisconnectPacket::new(ReasonCode::Success, DisconnectProperties::new()).unwrap();
    let mut disconnect_properties = DisconnectProperties::new();
    disconnect_properties.set_session_expiry_interval(Some(300));
    disconnect_properties.set_reason_string(Some("maintenance")).unwrap();
    let disconnect_full =
        DisconnectPacket::new(ReasonCode::ServerShuttingDown, disconnect_properties).unwrap();

    let auth = AuthPacket::new(ReasonCode::Success, AuthProperties::new()).unwrap();
    let mut auth_properties = AuthProperties::new();
    auth_properties.set_authentication_method(Some("SCRAM-SHA-1")).unwrap();
    auth_properties.set_authentication_data(Some(b"challenge")).unwrap();
    let auth_full =
        AuthPacket::new(ReasonCode::ContinueAuthentication, auth_properties).unwrap();

    vec![
        Packet::Connect(connect),
        Packet::Connect(connect_full),
        Packet::ConnectAck(connect_ack),
        Packet::ConnectAck(connect_ack_full),
        Packet::Publish(publish),
        Packet::Publish(publish_qos2),
        Packet::PublishAck(publish_ack),
        Packet::PublishAck(publish_ack_full),
        Packet::PublishReceived(publish_received),
        Packet::PublishRelease(publish_release),
        Packet::PublishComplete(publish_complete),
        Packet::Subscribe(subscribe),
        Packet::Subscribe(subscribe_full),
        Packet::SubscribeAck(subscribe_ack),
        Packet::Unsubscribe(unsubscribe),
        Packet::UnsubscribeAck(unsubscribe_ack),
        Packet::PingRequest(PingRequestPacket::new()),
        Packet::PingResponse(PingResponsePacket::new()),
        Packet::Disconnect(disconnect),
        Packet::Disconnect(disconnect_full),
        Packet::Auth(auth),
        Packet::Auth(auth_full),
    ]
}
