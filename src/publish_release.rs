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

/// `PublishReleasePacket` is the response to a Publish received packet.
/// It is the third packet of the `QoS` 2 protocol exchange.
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
/// Bits 3, 2, 1 and 0 of the fixed header byte are reserved and MUST be
/// 0, 0, 1 and 0 respectively [MQTT-3.6.1-1].
///
/// The reason code and property length can be omitted if the reason code
/// is 0x00 (Success) and there are no properties.
///
/// This type of packet does not contain payload.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReleasePacket {
    packet_id: PacketId,

    /// If the remaining length is 2, there is no reason code and the value
    /// 0x00 (Success) is used.
    reason_code: ReasonCode,

    properties: AckProperties,
}

/// The client or server sending the PUBREL packet MUST use one of the
/// PUBREL reason codes [MQTT-3.6.2-1].
pub const PUBLISH_RELEASE_REASONS: &[ReasonCode] = &[
    ReasonCode::Success,
    ReasonCode::PacketIdentifierNotFound,
];

impl PublishReleasePacket {
    /// Create a new publish release packet.
    ///
    /// # Errors
    ///
    /// Returns error if `reason_code` is not a PUBREL reason code.
    pub fn new(
        packet_id: PacketId,
        reason_code: ReasonCode,
        properties: AckProperties,
    ) -> Result<Self, ConstructionError> {
        if !PUBLISH_RELEASE_REASONS.contains(&reason_code) {
            return Err(ConstructionError::new(
                "reason_code",
                "not defined for PUBREL packets",
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
        FixedHeader::new(PacketType::PublishRelease, remaining_length)
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

impl EncodePacket for PublishReleasePacket {
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

impl DecodePacket for PublishReleasePacket {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let fixed_header = FixedHeader::decode(ba)?;
        if fixed_header.packet_type() != PacketType::PublishRelease {
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

        if !PUBLISH_RELEASE_REASONS.contains(&reason_code) {
            log::error!("publish_release: invalid reason code {reason_code:?}");
            return Err(DecodeError::InvalidReasonCode);
        }

        Ok(Self {
            packet_id,
            reason_code,
            properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wrong_flags() {
        // Flag nibble must be 0b0010.
        let buf = [0x60, 0x04, 0xff, 0xff, 0x00, 0x00];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(
            PublishReleasePacket::decode(&mut ba),
            Err(DecodeError::InvalidPacketFlags)
        );
    }

    #[test]
    fn test_roundtrip() {
        let packet = PublishReleasePacket::new(
            PacketId::new(17),
            ReasonCode::PacketIdentifierNotFound,
            AckProperties::new(),
        )
        .unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        assert_eq!(&buf, &[0x62, 0x04, 0x00, 0x11, 0x92, 0x00]);

        let mut ba = ByteArray::new(&buf);
        assert_eq!(PublishReleasePacket::decode(&mut ba), Ok(packet));
    }
}
