// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::base::{DecodePacket, EncodePacket, PacketId};
use crate::byte_array::ByteArray;
use crate::error::{ConstructionError, DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::property::UnsubscribeProperties;
use crate::string_data::StringData;
use crate::var_int::VarIntError;

/// `UnsubscribePacket` is sent from the client to the server to unsubscribe
/// from topics.
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
/// | Topic Filter 0            |
/// |                           |
/// +---------------------------+
/// | Topic Filter 1            |
/// |                           |
/// +---------------------------+
/// | ...                       |
/// +---------------------------+
/// ```
///
/// The topic filters in an UNSUBSCRIBE packet MUST be compared
/// character-by-character with the current set of subscriptions; the
/// comparison itself happens outside this codec.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnsubscribePacket {
    /// Used by the server to reply with an Unsubscribe ack packet.
    packet_id: PacketId,

    properties: UnsubscribeProperties,

    /// Topic filters to be unsubscribed from.
    topics: Vec<StringData>,
}

impl UnsubscribePacket {
    /// Create a new unsubscribe packet.
    ///
    /// # Errors
    ///
    /// Returns error if `packet_id` is zero [MQTT-2.2.1-3], `topics` is
    /// empty [MQTT-3.10.3-2], or a topic filter is not a valid MQTT
    /// string.
    pub fn new(
        packet_id: PacketId,
        topics: &[&str],
        properties: UnsubscribeProperties,
    ) -> Result<Self, ConstructionError> {
        if packet_id.value() == 0 {
            return Err(ConstructionError::new("packet_id", "must not be zero"));
        }
        if topics.is_empty() {
            return Err(ConstructionError::new(
                "topics",
                "at least one topic filter is required",
            ));
        }
        let topics = topics
            .iter()
            .map(|topic| StringData::from(topic))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_e| ConstructionError::new("topics", "not a valid MQTT string"))?;
        Ok(Self {
            packet_id,
            properties,
            topics,
        })
    }

    #[must_use]
    pub const fn packet_id(&self) -> PacketId {
        self.packet_id
    }

    #[must_use]
    pub const fn properties(&self) -> &UnsubscribeProperties {
        &self.properties
    }

    /// Get a reference to the topic filter list.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(AsRef::as_ref)
    }

    fn get_fixed_header(&self) -> Result<FixedHeader, VarIntError> {
        let mut remaining_length = PacketId::bytes() + self.properties.bytes();
        for topic in &self.topics {
            remaining_length += topic.bytes();
        }
        FixedHeader::new(PacketType::Unsubscribe, remaining_length)
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

impl EncodePacket for UnsubscribePacket {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let old_len = buf.len();

        let fixed_header = self.get_fixed_header()?;
        fixed_header.encode(buf)?;

        // Variable header.
        self.packet_id.encode(buf)?;
        self.properties.encode(buf)?;

        // Payload.
        for topic in &self.topics {
            topic.encode(buf)?;
        }

        Ok(buf.len() - old_len)
    }
}

impl DecodePacket for UnsubscribePacket {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let fixed_header = FixedHeader::decode(ba)?;
        if fixed_header.packet_type() != PacketType::Unsubscribe {
            return Err(DecodeError::InvalidPacketType);
        }

        let variable_start = ba.offset();
        let packet_id = PacketId::decode(ba)?;
        if packet_id.value() == 0 {
            return Err(DecodeError::InvalidPacketId);
        }

        let properties = UnsubscribeProperties::decode(ba)?;

        let mut topics = Vec::new();
        while ba.offset() - variable_start < fixed_header.remaining_length() {
            topics.push(StringData::decode(ba)?);
        }
        if ba.offset() - variable_start != fixed_header.remaining_length() {
            return Err(DecodeError::InvalidRemainingLength);
        }

        // The payload of an UNSUBSCRIBE packet MUST contain at least one
        // topic filter [MQTT-3.10.3-2].
        if topics.is_empty() {
            return Err(DecodeError::EmptyTopicFilter);
        }

        Ok(Self {
            packet_id,
            properties,
            topics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let packet = UnsubscribePacket::new(
            PacketId::new(42),
            &["foo/bar", "baz/#"],
            UnsubscribeProperties::new(),
        )
        .unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();

        let mut ba = ByteArray::new(&buf);
        let decoded = UnsubscribePacket::decode(&mut ba).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(decoded.topics().collect::<Vec<_>>(), vec!["foo/bar", "baz/#"]);
    }

    #[test]
    fn test_empty_topics_rejected() {
        let ret = UnsubscribePacket::new(PacketId::new(1), &[], UnsubscribeProperties::new());
        assert!(ret.is_err());
    }
}
