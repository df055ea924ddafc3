// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::base::{DecodePacket, EncodePacket};
use crate::byte_array::ByteArray;
use crate::error::{ConstructionError, DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::property::DisconnectProperties;
use crate::reason_code::ReasonCode;
use crate::var_int::VarIntError;

/// The `DisconnectPacket` is the final control packet sent from the client
/// or the server. It indicates the reason why the network connection is
/// being closed.
///
/// Basic packet structure:
/// ```text
///  7                  0
/// +--------------------+
/// | Fixed header       |
/// |                    |
/// +--------------------+
/// | Reason Code        |
/// +--------------------+
/// | Property Length    |
/// +--------------------+
/// | Properties ...     |
/// +--------------------+
/// ```
///
/// The reason code and property length can be omitted if the reason code
/// is 0x00 (Normal disconnection) and there are no properties. In this
/// case the DISCONNECT has a remaining length of 0.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisconnectPacket {
    /// Byte 1 in the variable header is the disconnect reason code. The
    /// value 0x00 is named `Normal disconnection` here; the connection is
    /// closed normally and the will message is not published.
    reason_code: ReasonCode,

    properties: DisconnectProperties,
}

/// The client or server sending the DISCONNECT packet MUST use one of the
/// disconnect reason codes [MQTT-3.14.2-1].
pub const DISCONNECT_REASONS: &[ReasonCode] = &[
    ReasonCode::Success,
    ReasonCode::DisconnectWithWillMessage,
    ReasonCode::UnspecifiedError,
    ReasonCode::MalformedPacket,
    ReasonCode::ProtocolError,
    ReasonCode::ImplementationSpecificError,
    ReasonCode::NotAuthorized,
    ReasonCode::ServerBusy,
    ReasonCode::ServerShuttingDown,
    ReasonCode::KeepAliveTimeout,
    ReasonCode::SessionTakenOver,
    ReasonCode::TopicFilterInvalid,
    ReasonCode::TopicNameInvalid,
    ReasonCode::ReceiveMaximumExceeded,
    ReasonCode::TopicAliasInvalid,
    ReasonCode::PacketTooLarge,
    ReasonCode::MessageRateTooHigh,
    ReasonCode::QuotaExceeded,
    ReasonCode::AdministrativeAction,
    ReasonCode::PayloadFormatInvalid,
    ReasonCode::RetainNotSupported,
    ReasonCode::QoSNotSupported,
    ReasonCode::UseAnotherServer,
    ReasonCode::ServerMoved,
    ReasonCode::SharedSubscriptionNotSupported,
    ReasonCode::ConnectionRateExceeded,
    ReasonCode::MaximumConnectTime,
    ReasonCode::SubscriptionIdentifiersNotSupported,
    ReasonCode::WildcardSubscriptionsNotSupported,
];

impl DisconnectPacket {
    /// Create a new disconnect packet.
    ///
    /// # Errors
    ///
    /// Returns error if `reason_code` is not a DISCONNECT reason code.
    pub fn new(
        reason_code: ReasonCode,
        properties: DisconnectProperties,
    ) -> Result<Self, ConstructionError> {
        if !DISCONNECT_REASONS.contains(&reason_code) {
            return Err(ConstructionError::new(
                "reason_code",
                "not defined for DISCONNECT packets",
            ));
        }
        Ok(Self {
            reason_code,
            properties,
        })
    }

    #[must_use]
    pub const fn reason_code(&self) -> ReasonCode {
        self.reason_code
    }

    #[must_use]
    pub const fn properties(&self) -> &DisconnectProperties {
        &self.properties
    }

    fn get_fixed_header(&self) -> Result<FixedHeader, VarIntError> {
        let mut remaining_length = 0;
        if self.reason_code != ReasonCode::Success || !self.properties.is_empty() {
            remaining_length += ReasonCode::bytes() + self.properties.bytes();
        }
        FixedHeader::new(PacketType::Disconnect, remaining_length)
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

impl EncodePacket for DisconnectPacket {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let old_len = buf.len();

        let fixed_header = self.get_fixed_header()?;
        fixed_header.encode(buf)?;
        if self.reason_code != ReasonCode::Success || !self.properties.is_empty() {
            self.reason_code.encode(buf)?;
            self.properties.encode(buf)?;
        }

        Ok(buf.len() - old_len)
    }
}

impl DecodePacket for DisconnectPacket {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let fixed_header = FixedHeader::decode(ba)?;
        if fixed_header.packet_type() != PacketType::Disconnect {
            return Err(DecodeError::InvalidPacketType);
        }

        let remaining_length = fixed_header.remaining_length();
        let (reason_code, properties) = if remaining_length == 0 {
            // Short form, the reason code defaults to Normal disconnection.
            (ReasonCode::default(), DisconnectProperties::new())
        } else if remaining_length == ReasonCode::bytes() {
            // A reason code without the property length byte.
            return Err(DecodeError::InvalidRemainingLength);
        } else {
            let reason_code = ReasonCode::decode(ba)?;
            (reason_code, DisconnectProperties::decode(ba)?)
        };

        if !DISCONNECT_REASONS.contains(&reason_code) {
            log::error!("disconnect: invalid reason code {reason_code:?}");
            return Err(DecodeError::InvalidReasonCode);
        }

        Ok(Self {
            reason_code,
            properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_short_form() {
        let packet =
            DisconnectPacket::new(ReasonCode::Success, DisconnectProperties::new()).unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        assert_eq!(&buf, &[0xe0, 0x00]);
    }

    #[test]
    fn test_decode_both_forms() {
        let short = [0xe0, 0x00];
        let mut ba = ByteArray::new(&short);
        let packet = DisconnectPacket::decode(&mut ba).unwrap();
        assert_eq!(packet.reason_code(), ReasonCode::Success);

        let long = [0xe0, 0x02, 0x00, 0x00];
        let mut ba = ByteArray::new(&long);
        assert_eq!(DisconnectPacket::decode(&mut ba), Ok(packet));
    }

    #[test]
    fn test_roundtrip_with_reason() {
        let mut properties = DisconnectProperties::new();
        properties.set_reason_string(Some("bye")).unwrap();
        let packet = DisconnectPacket::new(ReasonCode::ServerShuttingDown, properties).unwrap();

        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let mut ba = ByteArray::new(&buf);
        assert_eq!(DisconnectPacket::decode(&mut ba), Ok(packet));
    }
}
