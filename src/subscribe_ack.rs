// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::base::{DecodePacket, EncodePacket, PacketId};
use crate::byte_array::ByteArray;
use crate::error::{ConstructionError, DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::property::AckProperties;
use crate::reason_code::ReasonCode;
use crate::var_int::VarIntError;

/// `SubscribeAckPacket` is sent by the server to the client to confirm
/// receipt and processing of a Subscribe packet.
///
/// Basic struct of packet:
///
/// ```text
/// +---------------------------+
/// | Fixed header              |
/// |                           |
/// +---------------------------+
/// | Packet Id                 |
/// |                           |
/// +---------------------------+
/// | Properties ...            |
/// +---------------------------+
/// | Reason Codes ...          |
/// +---------------------------+
/// ```
///
/// The payload contains one reason code per topic filter of the Subscribe
/// packet being acknowledged, in the same order [MQTT-3.9.3-1].
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubscribeAckPacket {
    /// `packet_id` field is identical in Subscribe packet.
    packet_id: PacketId,

    properties: AckProperties,

    reason_codes: Vec<ReasonCode>,
}

/// The server sending a SUBACK packet MUST use one of the subscribe reason
/// codes for each topic filter received [MQTT-3.9.3-2].
pub const SUBSCRIBE_ACK_REASONS: &[ReasonCode] = &[
    ReasonCode::Success,
    ReasonCode::GrantedQoS1,
    ReasonCode::GrantedQoS2,
    ReasonCode::UnspecifiedError,
    ReasonCode::ImplementationSpecificError,
    ReasonCode::NotAuthorized,
    ReasonCode::TopicFilterInvalid,
    ReasonCode::PacketIdentifierInUse,
    ReasonCode::QuotaExceeded,
    ReasonCode::SharedSubscriptionNotSupported,
    ReasonCode::SubscriptionIdentifiersNotSupported,
    ReasonCode::WildcardSubscriptionsNotSupported,
];

impl SubscribeAckPacket {
    /// Create a new subscribe ack packet.
    ///
    /// # Errors
    ///
    /// Returns error if `reason_codes` is empty or contains a code that is
    /// not a SUBACK reason code.
    pub fn new(
        packet_id: PacketId,
        reason_codes: Vec<ReasonCode>,
        properties: AckProperties,
    ) -> Result<Self, ConstructionError> {
        if reason_codes.is_empty() {
            return Err(ConstructionError::new(
                "reason_codes",
                "at least one reason code is required",
            ));
        }
        if reason_codes
            .iter()
            .any(|code| !SUBSCRIBE_ACK_REASONS.contains(code))
        {
            return Err(ConstructionError::new(
                "reason_codes",
                "not defined for SUBACK packets",
            ));
        }
        Ok(Self {
            packet_id,
            properties,
            reason_codes,
        })
    }

    #[must_use]
    pub const fn packet_id(&self) -> PacketId {
        self.packet_id
    }

    #[must_use]
    pub const fn properties(&self) -> &AckProperties {
        &self.properties
    }

    #[must_use]
    pub fn reason_codes(&self) -> &[ReasonCode] {
        &self.reason_codes
    }

    fn get_fixed_header(&self) -> Result<FixedHeader, VarIntError> {
        let remaining_length = PacketId::bytes()
            + self.properties.bytes()
            + self.reason_codes.len() * ReasonCode::bytes();
        FixedHeader::new(PacketType::SubscribeAck, remaining_length)
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

impl EncodePacket for SubscribeAckPacket {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let old_len = buf.len();

        let fixed_header = self.get_fixed_header()?;
        fixed_header.encode(buf)?;

        // Variable header.
        self.packet_id.encode(buf)?;
        self.properties.encode(buf)?;

        // Payload.
        for code in &self.reason_codes {
            code.encode(buf)?;
        }

        Ok(buf.len() - old_len)
    }
}

impl DecodePacket for SubscribeAckPacket {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let fixed_header = FixedHeader::decode(ba)?;
        if fixed_header.packet_type() != PacketType::SubscribeAck {
            return Err(DecodeError::InvalidPacketType);
        }

        let variable_start = ba.offset();
        let packet_id = PacketId::decode(ba)?;
        let properties = AckProperties::decode(ba)?;

        let mut reason_codes = Vec::new();
        while ba.offset() - variable_start < fixed_header.remaining_length() {
            let reason_code = ReasonCode::decode(ba)?;
            if !SUBSCRIBE_ACK_REASONS.contains(&reason_code) {
                log::error!("subscribe_ack: invalid reason code {reason_code:?}");
                return Err(DecodeError::InvalidReasonCode);
            }
            reason_codes.push(reason_code);
        }
        if ba.offset() - variable_start != fixed_header.remaining_length() {
            return Err(DecodeError::InvalidRemainingLength);
        }

        Ok(Self {
            packet_id,
            properties,
            reason_codes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let packet = SubscribeAckPacket::new(
            PacketId::new(1234),
            vec![ReasonCode::GrantedQoS1, ReasonCode::NotAuthorized],
            AckProperties::new(),
        )
        .unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        assert_eq!(&buf, &[0x90, 0x05, 0x04, 0xd2, 0x00, 0x01, 0x87]);

        let mut ba = ByteArray::new(&buf);
        assert_eq!(SubscribeAckPacket::decode(&mut ba), Ok(packet));
    }

    #[test]
    fn test_foreign_reason_rejected() {
        let ret = SubscribeAckPacket::new(
            PacketId::new(1),
            vec![ReasonCode::Banned],
            AckProperties::new(),
        );
        assert!(ret.is_err());
    }
}
