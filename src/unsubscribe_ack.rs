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

/// `UnsubscribeAckPacket` is sent by the server to the client to confirm
/// receipt of an Unsubscribe packet.
///
/// Basic struct of packet:
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
/// The payload contains one reason code per topic filter of the
/// Unsubscribe packet being acknowledged, in the same order
/// [MQTT-3.11.3-1].
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnsubscribeAckPacket {
    /// `packet_id` field is identical in Unsubscribe packet.
    packet_id: PacketId,

    properties: AckProperties,

    reason_codes: Vec<ReasonCode>,
}

/// The server sending an UNSUBACK packet MUST use one of the unsubscribe
/// reason codes for each topic filter received [MQTT-3.11.3-2].
pub const UNSUBSCRIBE_ACK_REASONS: &[ReasonCode] = &[
    ReasonCode::Success,
    ReasonCode::NoSubscriptionExisted,
    ReasonCode::UnspecifiedError,
    ReasonCode::ImplementationSpecificError,
    ReasonCode::NotAuthorized,
    ReasonCode::TopicFilterInvalid,
    ReasonCode::PacketIdentifierInUse,
];

impl UnsubscribeAckPacket {
    /// Create a new unsubscribe ack packet.
    ///
    /// # Errors
    ///
    /// Returns error if `reason_codes` is empty or contains a code that is
    /// not an UNSUBACK reason code.
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
            .any(|code| !UNSUBSCRIBE_ACK_REASONS.contains(code))
        {
            return Err(ConstructionError::new(
                "reason_codes",
                "not defined for UNSUBACK packets",
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
        FixedHeader::new(PacketType::UnsubscribeAck, remaining_length)
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

impl EncodePacket for UnsubscribeAckPacket {
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

impl DecodePacket for UnsubscribeAckPacket {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let fixed_header = FixedHeader::decode(ba)?;
        if fixed_header.packet_type() != PacketType::UnsubscribeAck {
            return Err(DecodeError::InvalidPacketType);
        }

        let variable_start = ba.offset();
        let packet_id = PacketId::decode(ba)?;
        let properties = AckProperties::decode(ba)?;

        let mut reason_codes = Vec::new();
        while ba.offset() - variable_start < fixed_header.remaining_length() {
            let reason_code = ReasonCode::decode(ba)?;
            if !UNSUBSCRIBE_ACK_REASONS.contains(&reason_code) {
                log::error!("unsubscribe_ack: invalid reason code {reason_code:?}");
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
