// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::auth::AuthPacket;
use crate::base::{DecodePacket, EncodePacket};
use crate::byte_array::ByteArray;
use crate::connect::ConnectPacket;
use crate::connect_ack::ConnectAckPacket;
use crate::disconnect::DisconnectPacket;
use crate::error::{DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::ping_request::PingRequestPacket;
use crate::ping_response::PingResponsePacket;
use crate::publish::PublishPacket;
use crate::publish_ack::PublishAckPacket;
use crate::publish_complete::PublishCompletePacket;
use crate::publish_received::PublishReceivedPacket;
use crate::publish_release::PublishReleasePacket;
use crate::subscribe::SubscribePacket;
use crate::subscribe_ack::SubscribeAckPacket;
use crate::unsubscribe::UnsubscribePacket;
use crate::unsubscribe_ack::UnsubscribeAckPacket;
use crate::var_int::{VarIntError, MAX_PACKET_LEN};

/// A tagged union over the fifteen MQTT 5.0 control packets.
///
/// Returned by [`read`]; the encoder dispatches on the tag. There is no
/// inheritance and no dynamic dispatch involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Connect(ConnectPacket),
    ConnectAck(ConnectAckPacket),
    Publish(PublishPacket),
    PublishAck(PublishAckPacket),
    PublishReceived(PublishReceivedPacket),
    PublishRelease(PublishReleasePacket),
    PublishComplete(PublishCompletePacket),
    Subscribe(SubscribePacket),
    SubscribeAck(SubscribeAckPacket),
    Unsubscribe(UnsubscribePacket),
    UnsubscribeAck(UnsubscribeAckPacket),
    PingRequest(PingRequestPacket),
    PingResponse(PingResponsePacket),
    Disconnect(DisconnectPacket),
    Auth(AuthPacket),
}

impl Packet {
    /// Get packet type of the inner packet.
    #[must_use]
    pub fn packet_type(&self) -> PacketType {
        match self {
            Self::Connect(..) => PacketType::Connect,
            Self::ConnectAck(..) => PacketType::ConnectAck,
            Self::Publish(packet) => PacketType::Publish {
                dup: packet.dup(),
                qos: packet.qos(),
                retain: packet.retain(),
            },
            Self::PublishAck(..) => PacketType::PublishAck,
            Self::PublishReceived(..) => PacketType::PublishReceived,
            Self::PublishRelease(..) => PacketType::PublishRelease,
            Self::PublishComplete(..) => PacketType::PublishComplete,
            Self::Subscribe(..) => PacketType::Subscribe,
            Self::SubscribeAck(..) => PacketType::SubscribeAck,
            Self::Unsubscribe(..) => PacketType::Unsubscribe,
            Self::UnsubscribeAck(..) => PacketType::UnsubscribeAck,
            Self::PingRequest(..) => PacketType::PingRequest,
            Self::PingResponse(..) => PacketType::PingResponse,
            Self::Disconnect(..) => PacketType::Disconnect,
            Self::Auth(..) => PacketType::Auth,
        }
    }

    /// Get byte length of the whole packet on the wire.
    ///
    /// # Errors
    ///
    /// Returns error if the packet is too large.
    pub fn bytes(&self) -> Result<usize, VarIntError> {
        match self {
            Self::Connect(packet) => packet.bytes(),
            Self::ConnectAck(packet) => packet.bytes(),
            Self::Publish(packet) => packet.bytes(),
            Self::PublishAck(packet) => packet.bytes(),
            Self::PublishReceived(packet) => packet.bytes(),
            Self::PublishRelease(packet) => packet.bytes(),
            Self::PublishComplete(packet) => packet.bytes(),
            Self::Subscribe(packet) => packet.bytes(),
            Self::SubscribeAck(packet) => packet.bytes(),
            Self::Unsubscribe(packet) => packet.bytes(),
            Self::UnsubscribeAck(packet) => packet.bytes(),
            Self::PingRequest(..) => Ok(PingRequestPacket::bytes()),
            Self::PingResponse(..) => Ok(PingResponsePacket::bytes()),
            Self::Disconnect(packet) => packet.bytes(),
            Self::Auth(packet) => packet.bytes(),
        }
    }

    /// Encode the packet into a freshly allocated byte buffer.
    ///
    /// # Errors
    ///
    /// Returns error if a field does not fit its wire representation.
    pub fn write(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.write_into(&mut buf)?;
        Ok(buf)
    }

    /// Append the wire form of the packet to `buf`, returning the number
    /// of bytes written. Produces the same bytes as [`Packet::write`].
    ///
    /// # Errors
    ///
    /// Returns error if a field does not fit its wire representation.
    pub fn write_into(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        self.encode(buf)
    }
}

impl EncodePacket for Packet {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        match self {
            Self::Connect(packet) => packet.encode(buf),
            Self::ConnectAck(packet) => packet.encode(buf),
            Self::Publish(packet) => packet.encode(buf),
            Self::PublishAck(packet) => packet.encode(buf),
            Self::PublishReceived(packet) => packet.encode(buf),
            Self::PublishRelease(packet) => packet.encode(buf),
            Self::PublishComplete(packet) => packet.encode(buf),
            Self::Subscribe(packet) => packet.encode(buf),
            Self::SubscribeAck(packet) => packet.encode(buf),
            Self::Unsubscribe(packet) => packet.encode(buf),
            Self::UnsubscribeAck(packet) => packet.encode(buf),
            Self::PingRequest(packet) => packet.encode(buf),
            Self::PingResponse(packet) => packet.encode(buf),
            Self::Disconnect(packet) => packet.encode(buf),
            Self::Auth(packet) => packet.encode(buf),
        }
    }
}

impl From<ConnectPacket> for Packet {
    fn from(packet: ConnectPacket) -> Self {
        Self::Connect(packet)
    }
}

impl From<ConnectAckPacket> for Packet {
    fn from(packet: ConnectAckPacket) -> Self {
        Self::ConnectAck(packet)
    }
}

impl From<PublishPacket> for Packet {
    fn from(packet: PublishPacket) -> Self {
        Self::Publish(packet)
    }
}

impl From<PublishAckPacket> for Packet {
    fn from(packet: PublishAckPacket) -> Self {
        Self::PublishAck(packet)
    }
}

impl From<PublishReceivedPacket> for Packet {
    fn from(packet: PublishReceivedPacket) -> Self {
        Self::PublishReceived(packet)
    }
}

impl From<PublishReleasePacket> for Packet {
    fn from(packet: PublishReleasePacket) -> Self {
        Self::PublishRelease(packet)
    }
}

impl From<PublishCompletePacket> for Packet {
    fn from(packet: PublishCompletePacket) -> Self {
        Self::PublishComplete(packet)
    }
}

impl From<SubscribePacket> for Packet {
    fn from(packet: SubscribePacket) -> Self {
        Self::Subscribe(packet)
    }
}

impl From<SubscribeAckPacket> for Packet {
    fn from(packet: SubscribeAckPacket) -> Self {
        Self::SubscribeAck(packet)
    }
}

impl From<UnsubscribePacket> for Packet {
    fn from(packet: UnsubscribePacket) -> Self {
        Self::Unsubscribe(packet)
    }
}

impl From<UnsubscribeAckPacket> for Packet {
    fn from(packet: UnsubscribeAckPacket) -> Self {
        Self::UnsubscribeAck(packet)
    }
}

impl From<PingRequestPacket> for Packet {
    fn from(packet: PingRequestPacket) -> Self {
        Self::PingRequest(packet)
    }
}

impl From<PingResponsePacket> for Packet {
    fn from(packet: PingResponsePacket) -> Self {
        Self::PingResponse(packet)
    }
}

impl From<DisconnectPacket> for Packet {
    fn from(packet: DisconnectPacket) -> Self {
        Self::Disconnect(packet)
    }
}

impl From<AuthPacket> for Packet {
    fn from(packet: AuthPacket) -> Self {
        Self::Auth(packet)
    }
}

fn decode_packet(packet_type: PacketType, ba: &mut ByteArray) -> Result<Packet, DecodeError> {
    match packet_type {
        PacketType::Connect => ConnectPacket::decode(ba).map(Packet::Connect),
        PacketType::ConnectAck => ConnectAckPacket::decode(ba).map(Packet::ConnectAck),
        PacketType::Publish { .. } => PublishPacket::decode(ba).map(Packet::Publish),
        PacketType::PublishAck => PublishAckPacket::decode(ba).map(Packet::PublishAck),
        PacketType::PublishReceived => {
            PublishReceivedPacket::decode(ba).map(Packet::PublishReceived)
        }
        PacketType::PublishRelease => {
            PublishReleasePacket::decode(ba).map(Packet::PublishRelease)
        }
        PacketType::PublishComplete => {
            PublishCompletePacket::decode(ba).map(Packet::PublishComplete)
        }
        PacketType::Subscribe => SubscribePacket::decode(ba).map(Packet::Subscribe),
        PacketType::SubscribeAck => SubscribeAckPacket::decode(ba).map(Packet::SubscribeAck),
        PacketType::Unsubscribe => UnsubscribePacket::decode(ba).map(Packet::Unsubscribe),
        PacketType::UnsubscribeAck => {
            UnsubscribeAckPacket::decode(ba).map(Packet::UnsubscribeAck)
        }
        PacketType::PingRequest => PingRequestPacket::decode(ba).map(Packet::PingRequest),
        PacketType::PingResponse => PingResponsePacket::decode(ba).map(Packet::PingResponse),
        PacketType::Disconnect => DisconnectPacket::decode(ba).map(Packet::Disconnect),
        PacketType::Auth => AuthPacket::decode(ba).map(Packet::Auth),
    }
}

/// Parse one control packet from the front of `buf`.
///
/// On success returns the packet and the number of bytes it occupied;
/// bytes after that count belong to the next packet and are not touched.
///
/// Equivalent to [`read_limited`] with a limit of [`MAX_PACKET_LEN`].
///
/// # Errors
///
/// Returns [`DecodeError::Truncated`] if `buf` ends inside the packet; the
/// caller may retry with more bytes. Every other error is terminal.
pub fn read(buf: &[u8]) -> Result<(Packet, usize), DecodeError> {
    read_limited(buf, MAX_PACKET_LEN)
}

/// Parse one control packet from the front of `buf`, rejecting packets
/// whose declared remaining length exceeds `max_packet_len` before
/// anything is allocated for them.
///
/// With a limit of [`MAX_PACKET_LEN`] no wire-legal packet is rejected;
/// pass the negotiated maximum packet size to bound memory tighter.
///
/// # Errors
///
/// Returns [`DecodeError::Truncated`] if `buf` ends inside the packet, or
/// [`DecodeError::PacketTooLarge`] if the declared length is over the
/// limit. Every other error is terminal.
pub fn read_limited(buf: &[u8], max_packet_len: usize) -> Result<(Packet, usize), DecodeError> {
    let mut header_bytes = ByteArray::new(buf);
    let fixed_header = FixedHeader::decode(&mut header_bytes)?;

    let total = fixed_header.bytes() + fixed_header.remaining_length();
    if fixed_header.remaining_length() > max_packet_len {
        return Err(DecodeError::PacketTooLarge);
    }
    if buf.len() < total {
        return Err(DecodeError::Truncated);
    }

    // The handler sees exactly the declared packet, nothing more. Running
    // out of bytes inside a length-verified slice means the lengths inside
    // the packet are inconsistent, which is a malformed packet rather than
    // a short read.
    let mut ba = ByteArray::new(&buf[..total]);
    let packet = match decode_packet(fixed_header.packet_type(), &mut ba) {
        Ok(packet) => packet,
        Err(DecodeError::Truncated) => return Err(DecodeError::InvalidRemainingLength),
        Err(err) => return Err(err),
    };
    if ba.remaining_bytes() != 0 {
        return Err(DecodeError::InvalidRemainingLength);
    }

    Ok((packet, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::PacketId;
    use crate::property::AckProperties;
    use crate::reason_code::ReasonCode;

    #[test]
    fn test_read_ping_request() {
        let (packet, consumed) = read(&[0xc0, 0x00]).unwrap();
        assert_eq!(packet, Packet::PingRequest(PingRequestPacket::new()));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_read_reserved_type() {
        assert_eq!(
            read(&[0x00, 0x02, 0x00, 0x00]),
            Err(DecodeError::InvalidPacketType)
        );
    }

    #[test]
    fn test_read_leaves_next_packet_alone() {
        // A PUBACK followed by the first byte of a PINGREQ.
        let buf = [0x40, 0x02, 0x03, 0xe7, 0xc0];
        let (packet, consumed) = read(&buf).unwrap();
        assert_eq!(consumed, 4);
        let expected = PublishAckPacket::new(
            PacketId::new(999),
            ReasonCode::Success,
            AckProperties::new(),
        )
        .unwrap();
        assert_eq!(packet, Packet::PublishAck(expected));
    }

    #[test]
    fn test_read_limited() {
        let ping = [0xc0, 0x00];
        assert!(read_limited(&ping, 0).is_ok());

        let puback = [0x40, 0x02, 0x03, 0xe7];
        assert!(read_limited(&puback, 2).is_ok());
        assert_eq!(read_limited(&puback, 1), Err(DecodeError::PacketTooLarge));
    }

    #[test]
    fn test_read_truncated_header() {
        assert_eq!(read(&[]), Err(DecodeError::Truncated));
        assert_eq!(read(&[0x10]), Err(DecodeError::Truncated));
        assert_eq!(read(&[0x10, 0x84]), Err(DecodeError::Truncated));
    }

    #[test]
    fn test_read_inner_length_overrun_is_malformed() {
        // CONNACK claims 4 remaining bytes, but its property block claims
        // 9 more bytes than the packet holds.
        let buf = [0x20, 0x04, 0x00, 0x00, 0x09, 0x1f];
        assert_eq!(read(&buf), Err(DecodeError::InvalidRemainingLength));
    }
}
