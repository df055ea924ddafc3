// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use bytes::Bytes;
use std::io::Write;

use crate::base::{DecodePacket, EncodePacket, PacketId, QoS};
use crate::byte_array::ByteArray;
use crate::error::{ConstructionError, DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::property::PublishProperties;
use crate::string_data::StringData;
use crate::var_int::VarIntError;

/// `PublishPacket` is used to transport application messages from the
/// client to the server, or from the server to the client.
///
/// Basic structure of packet:
///
/// ```text
///  7                     0
/// +-----------------------+
/// | Fixed header          |
/// |                       |
/// +-----------------------+
/// | Topic name            |
/// |                       |
/// +-----------------------+
/// | Packet Identifier     |
/// |                       |
/// +-----------------------+
/// | Properties ...        |
/// +-----------------------+
/// | Msg payload ...       |
/// +-----------------------+
/// ```
///
/// Note that the packet identifier only appears in `QoS` 1 and `QoS` 2
/// packets [MQTT-2.2.1-2].
///
/// Response of `PublishPacket`:
/// - `QoS` 0, no response
/// - `QoS` 1, `PublishAckPacket`
/// - `QoS` 2, `PublishReceivedPacket`
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishPacket {
    /// If the DUP flag is set, this packet might be a re-delivery of an
    /// earlier attempt. The DUP flag MUST be set to 0 for all `QoS` 0
    /// messages [MQTT-3.3.1-2].
    dup: bool,

    /// The level of assurance for delivery of this application message.
    qos: QoS,

    /// If the RETAIN flag is set, the server stores the application
    /// message as the retained message for its topic and delivers it to
    /// future matching subscribers [MQTT-3.3.1-5].
    retain: bool,

    /// The topic name identifies the information channel to which payload
    /// data is published. It MUST be present as the first field in the
    /// variable header [MQTT-3.3.2-1]. It may be empty when a topic alias
    /// property carries the channel instead.
    topic: StringData,

    /// Present if and only if the `QoS` level is 1 or 2, and then non-zero
    /// [MQTT-2.2.1-3].
    packet_id: Option<PacketId>,

    properties: PublishProperties,

    /// The application message. It is valid for the payload to be empty.
    payload: Bytes,
}

impl PublishPacket {
    /// Create a new publish packet.
    ///
    /// # Errors
    ///
    /// Returns error if `topic` is invalid, if `packet_id` presence does
    /// not match the `QoS` level, or if `dup` is set on a `QoS` 0 packet.
    pub fn new(
        topic: &str,
        qos: QoS,
        payload: &[u8],
        packet_id: Option<PacketId>,
        dup: bool,
        retain: bool,
        properties: PublishProperties,
    ) -> Result<Self, ConstructionError> {
        let topic = StringData::from(topic)
            .map_err(|_e| ConstructionError::new("topic", "not a valid MQTT string"))?;

        // A PUBLISH packet MUST NOT contain a packet identifier if its QoS
        // value is set to 0 [MQTT-2.2.1-2]; at QoS 1 and 2 it MUST contain
        // a non-zero one [MQTT-2.2.1-3].
        match (qos, packet_id) {
            (QoS::AtMostOnce, Some(_)) => {
                return Err(ConstructionError::new(
                    "packet_id",
                    "must be absent when qos is 0",
                ));
            }
            (QoS::AtLeastOnce | QoS::ExactOnce, None) => {
                return Err(ConstructionError::new(
                    "packet_id",
                    "required when qos is 1 or 2",
                ));
            }
            (QoS::AtLeastOnce | QoS::ExactOnce, Some(packet_id)) if packet_id.value() == 0 => {
                return Err(ConstructionError::new("packet_id", "must not be zero"));
            }
            _ => (),
        }

        // The DUP flag MUST be set to 0 for all QoS 0 messages
        // [MQTT-3.3.1-2].
        if dup && qos == QoS::AtMostOnce {
            return Err(ConstructionError::new(
                "dup",
                "must not be set when qos is 0",
            ));
        }

        Ok(Self {
            dup,
            qos,
            retain,
            topic,
            packet_id,
            properties,
            payload: Bytes::copy_from_slice(payload),
        })
    }

    #[must_use]
    pub const fn dup(&self) -> bool {
        self.dup
    }

    #[must_use]
    pub const fn qos(&self) -> QoS {
        self.qos
    }

    #[must_use]
    pub const fn retain(&self) -> bool {
        self.retain
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        self.topic.as_ref()
    }

    #[must_use]
    pub const fn packet_id(&self) -> Option<PacketId> {
        self.packet_id
    }

    #[must_use]
    pub const fn properties(&self) -> &PublishProperties {
        &self.properties
    }

    /// Get a reference to the application message.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn get_fixed_header(&self) -> Result<FixedHeader, VarIntError> {
        let mut remaining_length =
            self.topic.bytes() + self.properties.bytes() + self.payload.len();
        if self.packet_id.is_some() {
            remaining_length += PacketId::bytes();
        }

        let packet_type = PacketType::Publish {
            dup: self.dup,
            qos: self.qos,
            retain: self.retain,
        };
        FixedHeader::new(packet_type, remaining_length)
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

impl EncodePacket for PublishPacket {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let old_len = buf.len();

        let fixed_header = self.get_fixed_header()?;
        fixed_header.encode(buf)?;

        // Variable header.
        self.topic.encode(buf)?;
        if let Some(packet_id) = self.packet_id {
            packet_id.encode(buf)?;
        }
        self.properties.encode(buf)?;

        // Payload.
        buf.write_all(&self.payload)?;

        Ok(buf.len() - old_len)
    }
}

impl DecodePacket for PublishPacket {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let fixed_header = FixedHeader::decode(ba)?;
        let PacketType::Publish { dup, qos, retain } = fixed_header.packet_type() else {
            return Err(DecodeError::InvalidPacketType);
        };

        // The DUP flag MUST be set to 0 for all QoS 0 messages
        // [MQTT-3.3.1-2].
        if dup && qos == QoS::AtMostOnce {
            return Err(DecodeError::InvalidPacketFlags);
        }

        let variable_start = ba.offset();
        let topic = StringData::decode(ba)?;

        let packet_id = if qos == QoS::AtMostOnce {
            None
        } else {
            let packet_id = PacketId::decode(ba)?;
            if packet_id.value() == 0 {
                return Err(DecodeError::InvalidPacketId);
            }
            Some(packet_id)
        };

        let properties = PublishProperties::decode(ba)?;

        // It is valid for a PUBLISH packet to contain a zero length
        // payload.
        let consumed = ba.offset() - variable_start;
        if fixed_header.remaining_length() < consumed {
            return Err(DecodeError::InvalidRemainingLength);
        }
        let payload_len = fixed_header.remaining_length() - consumed;
        let payload = Bytes::copy_from_slice(ba.read_bytes(payload_len)?);

        Ok(Self {
            dup,
            qos,
            retain,
            topic,
            packet_id,
            properties,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_qos0() {
        let packet = PublishPacket::new(
            "foo/bar/+",
            QoS::AtMostOnce,
            &[0x12; 256],
            None,
            false,
            false,
            PublishProperties::new(),
        )
        .unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();

        let mut ba = ByteArray::new(&buf);
        let decoded = PublishPacket::decode(&mut ba).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(decoded.payload().len(), 256);
    }

    #[test]
    fn test_qos0_with_packet_id_rejected() {
        let ret = PublishPacket::new(
            "t",
            QoS::AtMostOnce,
            b"",
            Some(PacketId::new(1)),
            false,
            false,
            PublishProperties::new(),
        );
        assert!(ret.is_err());
        assert_eq!(ret.unwrap_err().field(), "packet_id");
    }

    #[test]
    fn test_qos1_without_packet_id_rejected() {
        let ret = PublishPacket::new(
            "t",
            QoS::AtLeastOnce,
            b"",
            None,
            false,
            false,
            PublishProperties::new(),
        );
        assert!(ret.is_err());
    }

    #[test]
    fn test_decode_missing_property_length() {
        // Empty topic, then the packet ends before the property length.
        let buf = [0x30, 0x02, 0x00, 0x00];
        let mut ba = ByteArray::new(&buf);
        assert!(PublishPacket::decode(&mut ba).is_err());
    }

    #[test]
    fn test_decode_qos1_without_packet_id() {
        let buf = [0x32, 0x03, 0x00, 0x00, 0x00];
        let mut ba = ByteArray::new(&buf);
        assert!(PublishPacket::decode(&mut ba).is_err());
    }
}
