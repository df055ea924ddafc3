// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::base::{DecodePacket, EncodePacket};
use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};

/// A Reason Code is a one byte unsigned value that indicates the result of
/// an operation.
///
/// The same numeric space is shared by CONNACK, PUBACK, PUBREC, PUBREL,
/// PUBCOMP, SUBACK, UNSUBACK, DISCONNECT and AUTH, but each packet type
/// accepts only its own subset. The per-packet subsets are defined as
/// constant tables next to the packet they belong to, e.g.
/// `PUBLISH_ACK_REASONS`; decoding a code outside the packet's table is a
/// malformed packet.
///
/// Reason Codes less than 0x80 indicate successful completion of an
/// operation. Reason Codes of 0x80 or greater indicate failure.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    /// Also `Normal disconnection` in DISCONNECT and `Granted QoS 0` in
    /// SUBACK, which share the value 0x00.
    #[default]
    Success = 0x00,

    /// SUBACK: the subscription is accepted and the maximum `QoS` sent
    /// will be `QoS` 1.
    GrantedQoS1 = 0x01,

    /// SUBACK: the subscription is accepted and the maximum `QoS` sent
    /// will be `QoS` 2.
    GrantedQoS2 = 0x02,

    /// DISCONNECT: the client wishes to disconnect but requires that the
    /// server also publishes its Will Message.
    DisconnectWithWillMessage = 0x04,

    /// The message is accepted but there are no subscribers.
    NoMatchingSubscribers = 0x10,

    /// UNSUBACK: no matching topic filter is being used by the client.
    NoSubscriptionExisted = 0x11,

    /// AUTH: continue the authentication with another step.
    ContinueAuthentication = 0x18,

    /// AUTH: initiate a re-authentication.
    ReAuthenticate = 0x19,

    /// The sender does not wish to reveal the reason for the failure, or
    /// none of the other codes apply.
    UnspecifiedError = 0x80,

    /// Data within the packet could not be correctly parsed.
    MalformedPacket = 0x81,

    /// Data in the packet does not conform to this specification.
    ProtocolError = 0x82,

    /// The packet is valid but is not accepted by this receiver.
    ImplementationSpecificError = 0x83,

    /// CONNACK: the server does not support the requested protocol version.
    UnsupportedProtocolVersion = 0x84,

    /// CONNACK: the client identifier is a valid string but is not allowed
    /// by the server.
    ClientIdentifierNotValid = 0x85,

    /// CONNACK: the server does not accept the user name or password.
    BadUserNameOrPassword = 0x86,

    /// The request is not authorized.
    NotAuthorized = 0x87,

    /// CONNACK: the MQTT server is not available.
    ServerUnavailable = 0x88,

    /// The server is busy.
    ServerBusy = 0x89,

    /// CONNACK: the client has been banned by administrative action.
    Banned = 0x8a,

    /// DISCONNECT: the server is shutting down.
    ServerShuttingDown = 0x8b,

    /// CONNACK: the authentication method is not supported or does not
    /// match the method currently in use.
    BadAuthenticationMethod = 0x8c,

    /// DISCONNECT: the connection is closed because no packet has been
    /// received for 1.5 times the keep alive time.
    KeepAliveTimeout = 0x8d,

    /// DISCONNECT: another connection using the same client id has
    /// connected, causing this connection to be closed.
    SessionTakenOver = 0x8e,

    /// The topic filter is correctly formed but is not accepted.
    TopicFilterInvalid = 0x8f,

    /// The topic name is correctly formed but is not accepted.
    TopicNameInvalid = 0x90,

    /// The packet identifier is already in use.
    PacketIdentifierInUse = 0x91,

    /// PUBREL, PUBCOMP: the packet identifier is not known.
    PacketIdentifierNotFound = 0x92,

    /// DISCONNECT: more than Receive Maximum publications have been sent
    /// without receiving acknowledgements.
    ReceiveMaximumExceeded = 0x93,

    /// DISCONNECT: a topic alias is invalid for this connection.
    TopicAliasInvalid = 0x94,

    /// The packet exceeded the maximum permissible size.
    PacketTooLarge = 0x95,

    /// DISCONNECT: the received data rate is too high.
    MessageRateTooHigh = 0x96,

    /// An implementation or administrative imposed limit has been exceeded.
    QuotaExceeded = 0x97,

    /// DISCONNECT: the connection is closed due to an administrative
    /// action.
    AdministrativeAction = 0x98,

    /// The payload format does not match the payload format indicator.
    PayloadFormatInvalid = 0x99,

    /// The server does not support retained messages.
    RetainNotSupported = 0x9a,

    /// The `QoS` is greater than the maximum `QoS` the server supports.
    QoSNotSupported = 0x9b,

    /// The client should temporarily use another server.
    UseAnotherServer = 0x9c,

    /// The client should permanently use another server.
    ServerMoved = 0x9d,

    /// The server does not support shared subscriptions.
    SharedSubscriptionNotSupported = 0x9e,

    /// The connection rate limit has been exceeded.
    ConnectionRateExceeded = 0x9f,

    /// DISCONNECT: the maximum connection time authorized for this
    /// connection has been exceeded.
    MaximumConnectTime = 0xa0,

    /// The server does not support subscription identifiers.
    SubscriptionIdentifiersNotSupported = 0xa1,

    /// The server does not support wildcard subscriptions.
    WildcardSubscriptionsNotSupported = 0xa2,
}

impl ReasonCode {
    /// Get byte length used in packet.
    #[must_use]
    #[inline]
    pub const fn bytes() -> usize {
        1
    }
}

impl TryFrom<u8> for ReasonCode {
    type Error = DecodeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0x00 => Ok(Self::Success),
            0x01 => Ok(Self::GrantedQoS1),
            0x02 => Ok(Self::GrantedQoS2),
            0x04 => Ok(Self::DisconnectWithWillMessage),
            0x10 => Ok(Self::NoMatchingSubscribers),
            0x11 => Ok(Self::NoSubscriptionExisted),
            0x18 => Ok(Self::ContinueAuthentication),
            0x19 => Ok(Self::ReAuthenticate),
            0x80 => Ok(Self::UnspecifiedError),
            0x81 => Ok(Self::MalformedPacket),
            0x82 => Ok(Self::ProtocolError),
            0x83 => Ok(Self::ImplementationSpecificError),
            0x84 => Ok(Self::UnsupportedProtocolVersion),
            0x85 => Ok(Self::ClientIdentifierNotValid),
            0x86 => Ok(Self::BadUserNameOrPassword),
            0x87 => Ok(Self::NotAuthorized),
            0x88 => Ok(Self::ServerUnavailable),
            0x89 => Ok(Self::ServerBusy),
            0x8a => Ok(Self::Banned),
            0x8b => Ok(Self::ServerShuttingDown),
            0x8c => Ok(Self::BadAuthenticationMethod),
            0x8d => Ok(Self::KeepAliveTimeout),
            0x8e => Ok(Self::SessionTakenOver),
            0x8f => Ok(Self::TopicFilterInvalid),
            0x90 => Ok(Self::TopicNameInvalid),
            0x91 => Ok(Self::PacketIdentifierInUse),
            0x92 => Ok(Self::PacketIdentifierNotFound),
            0x93 => Ok(Self::ReceiveMaximumExceeded),
            0x94 => Ok(Self::TopicAliasInvalid),
            0x95 => Ok(Self::PacketTooLarge),
            0x96 => Ok(Self::MessageRateTooHigh),
            0x97 => Ok(Self::QuotaExceeded),
            0x98 => Ok(Self::AdministrativeAction),
            0x99 => Ok(Self::PayloadFormatInvalid),
            0x9a => Ok(Self::RetainNotSupported),
            0x9b => Ok(Self::QoSNotSupported),
            0x9c => Ok(Self::UseAnotherServer),
            0x9d => Ok(Self::ServerMoved),
            0x9e => Ok(Self::SharedSubscriptionNotSupported),
            0x9f => Ok(Self::ConnectionRateExceeded),
            0xa0 => Ok(Self::MaximumConnectTime),
            0xa1 => Ok(Self::SubscriptionIdentifiersNotSupported),
            0xa2 => Ok(Self::WildcardSubscriptionsNotSupported),
            _ => Err(DecodeError::InvalidReasonCode),
        }
    }
}

impl DecodePacket for ReasonCode {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let byte = ba.read_byte()?;
        Self::try_from(byte)
    }
}

impl EncodePacket for ReasonCode {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        buf.push(*self as u8);
        Ok(Self::bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ReasonCode::try_from(0x03), Err(DecodeError::InvalidReasonCode));
        assert_eq!(ReasonCode::try_from(0xff), Err(DecodeError::InvalidReasonCode));
    }

    #[test]
    fn test_roundtrip() {
        let mut buf = Vec::new();
        ReasonCode::QuotaExceeded.encode(&mut buf).unwrap();
        assert_eq!(&buf, &[0x97]);
        let mut ba = ByteArray::new(&buf);
        assert_eq!(ReasonCode::decode(&mut ba), Ok(ReasonCode::QuotaExceeded));
    }
}
