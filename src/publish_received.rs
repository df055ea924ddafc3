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

/// `PublishReceivedPacket` is the response to a Publish packet with `QoS` 2.
/// It is the second packet of the `QoS` 2 protocol exchange.
///
/// Basic packet structure:
/// ```text
///  7                  0
/// +--------------------+
/// | Fixed header       |
/// |                    |
/// +--------------------+
/// | Packet id          |
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
/// is 0x00 (Success) and there are no properties.
///
/// This type of packet does not contain payload.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReceivedPacket {
    packet_id: PacketId,

    /// If the remaining length is 2, there is no reason code and the value
    /// 0x00 (Success) is used.
    reason_code: ReasonCode,

    properties: AckProperties,
}

/// The client or server sending the PUBREC packet MUST use one of the
/// PUBREC reason codes [MQTT-3.5.2-1].
pub const PUBLISH_RECEIVED_REASONS: &[ReasonCode] = &[
    ReasonCode::Success,
    ReasonCode::NoMatchingSubscribers,
    ReasonCode::UnspecifiedError,
    ReasonCode::ImplementationSpecificError,
    ReasonCode::NotAuthorized,
    ReasonCode::TopicNameInvalid,
    ReasonCode::PacketIdentifierInUse,
    ReasonCode::QuotaExceeded,
    ReasonCode::PayloadFormatInvalid,
];

impl PublishReceivedPacket {
    /// Create a new publish received packet.
    ///
    /// # Errors
    ///
    /// Returns error if `reason_code` is not a PUBREC reason code.
    pub fn new(
        packet_id: PacketId,
        reason_code: ReasonCode,
        properties: AckProperties,
    ) -> Result<Self, ConstructionError> {
        if !PUBLISH_RECEIVED_REASONS.contains(&reason_code) {
            return Err(ConstructionError::new(
                "reason_code",
                "not defined for PUBREC packets",
            ));
        }
        Ok(Self {
            packet_id,
            reason_code,
            properties,
        })
    }

    #[must_use]
    pub const fn packet_id(&self) -> PacketId {
        self.packet_id
    }

    #[must_use]
    pub const fn reason_code(&self) -> ReasonCode {
        self.reason_code
    }

    #[must_use]
    pub const fn properties(&self) -> &AckProperties {
        &self.properties
    }

    fn get_fixed_header(&self) -> Result<FixedHeader, VarIntError> {
        let mut remaining_length = PacketId::bytes();
        if self.reason_code != ReasonCode::Success || !self.properties.is_empty() {
            remaining_length += ReasonCode::bytes() + self.properties.bytes();
        }
        FixedHeader::new(PacketType::PublishReceived, remaining_length)
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

impl EncodePacket for PublishReceivedPacket {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let old_len = buf.len();

        let fixed_header = self.get_fixed_header()?;
        fixed_header.encode(buf)?;
        self.packet_id.encode(buf)?;
        if self.reason_code != ReasonCode::Success || !self.properties.is_empty() {
            self.reason_code.encode(buf)?;
            self.properties.encode(buf)?;
        }

        Ok(buf.len() - old_len)
    }
}

impl DecodePacket for PublishReceivedPacket {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let fixed_header = FixedHeader::decode(ba)?;
        if fixed_header.packet_type() != PacketType::PublishReceived {
            return Err(DecodeError::InvalidPacketType);
        }

        let remaining_length = fixed_header.remaining_length();
        if remaining_length < PacketId::bytes() {
            return Err(DecodeError::InvalidRemainingLength);
        }
        let packet_id = PacketId::decode(ba)?;

        let (reason_code, properties) = if remaining_length == PacketId::bytes() {
            (ReasonCode::default(), AckProperties::new())
        } else if remaining_length == PacketId::bytes() + ReasonCode::bytes() {
            return Err(DecodeError::InvalidRemainingLength);
        } else {
            let reason_code = ReasonCode::decode(ba)?;
            (reason_code, AckProperties::decode(ba)?)
        };

        if !PUBLISH_RECEIVED_REASONS.contains(&reason_code) {
            log::error!("publish_received: invalid reason code {reason_code:?}");
            return Err(DecodeError::InvalidReasonCode);
        }

        Ok(Self {
            packet_id,
            reason_code,
            properties,
        })
    }
}
