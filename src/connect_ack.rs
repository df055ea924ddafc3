// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::base::{DecodePacket, EncodePacket};
use crate::byte_array::ByteArray;
use crate::error::{ConstructionError, DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::property::ConnectAckProperties;
use crate::reason_code::ReasonCode;
use crate::var_int::VarIntError;

/// `ConnectAckPacket` is sent by the server in response to a CONNECT packet
/// received from a client.
///
/// Basic packet structure:
/// ```text
///  7                  0
/// +--------------------+
/// | Fixed header       |
/// |                    |
/// +--------------------+
/// | Ack flags          |
/// +--------------------+
/// | Reason Code        |
/// +--------------------+
/// | Property Length    |
/// +--------------------+
/// | Properties ...     |
/// +--------------------+
/// ```
///
/// This type of packet does not contain payload.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectAckPacket {
    /// The session present flag informs the client whether the server is
    /// using session state from a previous connection for this client id.
    ///
    /// If the server accepts a connection with clean start set to 1, it
    /// MUST set session present to 0 in the CONNACK packet [MQTT-3.2.2-2].
    session_present: bool,

    /// If a well formed CONNECT packet is received by the server, but the
    /// server is unable to complete the connection the server MAY send a
    /// CONNACK packet containing the appropriate reason code [MQTT-3.2.2-8].
    reason_code: ReasonCode,

    properties: ConnectAckProperties,
}

/// The server sending the CONNACK packet MUST use one of the connect reason
/// code values [MQTT-3.2.2-8].
pub const CONNECT_ACK_REASONS: &[ReasonCode] = &[
    ReasonCode::Success,
    ReasonCode::UnspecifiedError,
    ReasonCode::MalformedPacket,
    ReasonCode::ProtocolError,
    ReasonCode::ImplementationSpecificError,
    ReasonCode::UnsupportedProtocolVersion,
    ReasonCode::ClientIdentifierNotValid,
    ReasonCode::BadUserNameOrPassword,
    ReasonCode::NotAuthorized,
    ReasonCode::ServerUnavailable,
    ReasonCode::ServerBusy,
    ReasonCode::Banned,
    ReasonCode::BadAuthenticationMethod,
    ReasonCode::TopicNameInvalid,
    ReasonCode::PacketTooLarge,
    ReasonCode::QuotaExceeded,
    ReasonCode::PayloadFormatInvalid,
    ReasonCode::RetainNotSupported,
    ReasonCode::QoSNotSupported,
    ReasonCode::UseAnotherServer,
    ReasonCode::ServerMoved,
    ReasonCode::ConnectionRateExceeded,
];

impl ConnectAckPacket {
    /// Create a new connect ack packet.
    ///
    /// # Errors
    ///
    /// Returns error if `reason_code` is not a CONNACK reason code.
    pub fn new(
        session_present: bool,
        reason_code: ReasonCode,
        properties: ConnectAckProperties,
    ) -> Result<Self, ConstructionError> {
        if !CONNECT_ACK_REASONS.contains(&reason_code) {
            return Err(ConstructionError::new(
                "reason_code",
                "not defined for CONNACK packets",
            ));
        }
        Ok(Self {
            session_present,
            reason_code,
            properties,
        })
    }

    #[must_use]
    pub const fn session_present(&self) -> bool {
        self.session_present
    }

    #[must_use]
    pub const fn reason_code(&self) -> ReasonCode {
        self.reason_code
    }

    #[must_use]
    pub const fn properties(&self) -> &ConnectAckProperties {
        &self.properties
    }

    fn get_fixed_header(&self) -> Result<FixedHeader, VarIntError> {
        let remaining_length = 1 + ReasonCode::bytes() + self.properties.bytes();
        FixedHeader::new(PacketType::ConnectAck, remaining_length)
    }

    /// Get byte length of the whole packet.
    ///
    /// # Errors
    ///
    /// Returns error if the packet is too large.
    pub fn bytes(&self) -> Result<usize, VarIntError> {
        let fixed_header = self.get_fixed_header()?;
        Ok(fixed_header.bytes() + fixed_header.remaining_length())
    }
}

impl EncodePacket for ConnectAckPacket {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let old_len = buf.len();

        let fixed_header = self.get_fixed_header()?;
        fixed_header.encode(buf)?;

        let ack_flags = u8::from(self.session_present);
        buf.push(ack_flags);
        self.reason_code.encode(buf)?;
        self.properties.encode(buf)?;

        Ok(buf.len() - old_len)
    }
}

impl DecodePacket for ConnectAckPacket {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let fixed_header = FixedHeader::decode(ba)?;
        if fixed_header.packet_type() != PacketType::ConnectAck {
            return Err(DecodeError::InvalidPacketType);
        }
        // Ack flags, reason code and the property length are all required.
        if fixed_header.remaining_length() < 1 + ReasonCode::bytes() + 1 {
            return Err(DecodeError::InvalidRemainingLength);
        }

        // Bits 7-1 of the ack flags byte are reserved and MUST be set
        // to 0 [MQTT-3.2.2-1].
        let ack_flags = ba.read_byte()?;
        if ack_flags & 0b1111_1110 != 0b0000_0000 {
            return Err(DecodeError::InvalidPacketFlags);
        }
        let session_present = ack_flags & 0b0000_0001 == 0b0000_0001;

        let reason_code = ReasonCode::decode(ba)?;
        if !CONNECT_ACK_REASONS.contains(&reason_code) {
            log::error!("connect_ack: invalid reason code {reason_code:?}");
            return Err(DecodeError::InvalidReasonCode);
        }

        let properties = ConnectAckProperties::decode(ba)?;

        Ok(Self {
            session_present,
            reason_code,
            properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty() {
        let packet =
            ConnectAckPacket::new(false, ReasonCode::Success, ConnectAckProperties::new()).unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        assert_eq!(&buf, &[0x20, 0x03, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_decode_invalid_reason_code() {
        // 0x8b is ServerShuttingDown, a DISCONNECT-only reason code.
        let buf = [0x20, 0x03, 0x00, 0x8b, 0x00];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(
            ConnectAckPacket::decode(&mut ba),
            Err(DecodeError::InvalidReasonCode)
        );
    }

    #[test]
    fn test_decode_missing_property_length() {
        let buf = [0x20, 0x02, 0x00, 0x00];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(
            ConnectAckPacket::decode(&mut ba),
            Err(DecodeError::InvalidRemainingLength)
        );
    }

    #[test]
    fn test_construction_rejects_foreign_reason() {
        let ret = ConnectAckPacket::new(
            false,
            ReasonCode::ServerShuttingDown,
            ConnectAckProperties::new(),
        );
        assert!(ret.is_err());
    }
}
