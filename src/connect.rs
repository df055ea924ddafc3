// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::base::{
    DecodePacket, EncodePacket, QoS, PROTOCOL_LEVEL, PROTOCOL_NAME,
};
use crate::binary_data::BinaryData;
use crate::byte_array::ByteArray;
use crate::connect_flags::ConnectFlags;
use crate::error::{ConstructionError, DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::property::{ConnectProperties, WillProperties};
use crate::string_data::StringData;
use crate::u16_data::U16Data;
use crate::var_int::VarIntError;

/// The will message stored on the server side when the client connects.
///
/// It is published to its topic when the network connection is closed
/// abnormally, unless it has been deleted by the server on receipt of a
/// DISCONNECT packet with reason code 0x00.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Will {
    qos: QoS,
    retain: bool,
    topic: StringData,
    message: BinaryData,
    properties: WillProperties,
}

impl Will {
    /// Create a new will message.
    ///
    /// # Errors
    ///
    /// Returns error if `topic` is not a valid MQTT string or `message` is
    /// longer than 65535 bytes.
    pub fn new(
        topic: &str,
        message: &[u8],
        qos: QoS,
        retain: bool,
        properties: WillProperties,
    ) -> Result<Self, ConstructionError> {
        let topic = StringData::from(topic)
            .map_err(|_e| ConstructionError::new("topic", "not a valid MQTT string"))?;
        let message = BinaryData::from_slice(message)
            .map_err(|_e| ConstructionError::new("message", "longer than 65535 bytes"))?;
        Ok(Self {
            qos,
            retain,
            topic,
            message,
            properties,
        })
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
    pub fn message(&self) -> &[u8] {
        self.message.as_ref()
    }

    #[must_use]
    pub const fn properties(&self) -> &WillProperties {
        &self.properties
    }

    fn bytes(&self) -> usize {
        self.properties.bytes() + self.topic.bytes() + self.message.bytes()
    }
}

/// `ConnectPacket` is the first packet sent from the client to the server
/// after a network connection is established [MQTT-3.1.0-1].
///
/// Basic struct of `ConnectPacket` is as below:
/// ```text
///  7                          0
/// +----------------------------+
/// | Fixed header               |
/// |                            |
/// +----------------------------+
/// | Protocol name              |
/// |                            |
/// +----------------------------+
/// | Protocol version           |
/// +----------------------------+
/// | Connect flags              |
/// +----------------------------+
/// | Keep alive                 |
/// |                            |
/// +----------------------------+
/// | Properties ...             |
/// +----------------------------+
/// | Client id                  |
/// |                            |
/// +----------------------------+
/// | Will properties ...        |
/// +----------------------------+
/// | Will topic                 |
/// |                            |
/// +----------------------------+
/// | Will message               |
/// |                            |
/// +----------------------------+
/// | Username                   |
/// |                            |
/// +----------------------------+
/// | Password                   |
/// |                            |
/// +----------------------------+
/// ```
///
/// The payload fields after the client id are present only when the
/// corresponding connect flag is set, in the order client id, will
/// properties, will topic, will payload, username, password [MQTT-3.1.3-1].
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectPacket {
    /// The client id identifies the client to the server and is used to
    /// locate session state. It may be empty, in which case the server
    /// assigns a unique id and returns it in the CONNACK packet
    /// [MQTT-3.1.3-6].
    client_id: StringData,

    /// If set, the client and server discard any previous session state
    /// and start a new session.
    clean_start: bool,

    /// The keep alive is a time interval measured in seconds. It is the
    /// maximum time interval that is permitted to elapse between the point
    /// at which the client finishes transmitting one control packet and
    /// the point it starts sending the next. A value of 0 turns the keep
    /// alive mechanism off.
    keep_alive: u16,

    /// Optional will message, published by the server when the network
    /// connection is closed abnormally.
    will: Option<Will>,

    username: Option<StringData>,

    password: Option<BinaryData>,

    properties: ConnectProperties,
}

impl ConnectPacket {
    /// Create a new connect packet.
    ///
    /// # Errors
    ///
    /// Returns error if a string field is invalid, if `password` is present
    /// without `username` [MQTT-3.1.2-22], or if a field does not fit its
    /// wire form.
    pub fn new(
        client_id: &str,
        clean_start: bool,
        keep_alive: u16,
        will: Option<Will>,
        username: Option<&str>,
        password: Option<&[u8]>,
        properties: ConnectProperties,
    ) -> Result<Self, ConstructionError> {
        let client_id = StringData::from(client_id)
            .map_err(|_e| ConstructionError::new("client_id", "not a valid MQTT string"))?;
        if username.is_none() && password.is_some() {
            return Err(ConstructionError::new(
                "password",
                "username must be present when password is set",
            ));
        }
        let username = match username {
            Some(username) => Some(
                StringData::from(username)
                    .map_err(|_e| ConstructionError::new("username", "not a valid MQTT string"))?,
            ),
            None => None,
        };
        let password = match password {
            Some(password) => Some(BinaryData::from_slice(password).map_err(|_e| {
                ConstructionError::new("password", "longer than 65535 bytes")
            })?),
            None => None,
        };
        Ok(Self {
            client_id,
            clean_start,
            keep_alive,
            will,
            username,
            password,
            properties,
        })
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        self.client_id.as_ref()
    }

    #[must_use]
    pub const fn clean_start(&self) -> bool {
        self.clean_start
    }

    #[must_use]
    pub const fn keep_alive(&self) -> u16 {
        self.keep_alive
    }

    #[must_use]
    pub const fn will(&self) -> Option<&Will> {
        self.will.as_ref()
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_ref().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn password(&self) -> Option<&[u8]> {
        self.password.as_ref().map(AsRef::as_ref)
    }

    #[must_use]
    pub const fn properties(&self) -> &ConnectProperties {
        &self.properties
    }

    fn connect_flags(&self) -> ConnectFlags {
        let (will, will_qos, will_retain) = match &self.will {
            Some(will) => (true, will.qos(), will.retain()),
            None => (false, QoS::AtMostOnce, false),
        };
        ConnectFlags::new(
            self.username.is_some(),
            self.password.is_some(),
            will_retain,
            will_qos,
            will,
            self.clean_start,
        )
    }

    fn get_fixed_header(&self) -> Result<FixedHeader, VarIntError> {
        let mut remaining_length = 2
            + PROTOCOL_NAME.len()
            + 1
            + ConnectFlags::bytes()
            + U16Data::bytes()
            + self.properties.bytes()
            + self.client_id.bytes();

        if let Some(will) = &self.will {
            remaining_length += will.bytes();
        }
        if let Some(username) = &self.username {
            remaining_length += username.bytes();
        }
        if let Some(password) = &self.password {
            remaining_length += password.bytes();
        }

        FixedHeader::new(PacketType::Connect, remaining_length)
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

impl EncodePacket for ConnectPacket {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let old_len = buf.len();

        let fixed_header = self.get_fixed_header()?;
        fixed_header.encode(buf)?;

        // Variable header.
        StringData::from(PROTOCOL_NAME)
            .map_err(|_e| EncodeError::InvalidData)?
            .encode(buf)?;
        buf.push(PROTOCOL_LEVEL);
        self.connect_flags().encode(buf)?;
        U16Data::new(self.keep_alive).encode(buf)?;
        self.properties.encode(buf)?;

        // Payload.
        self.client_id.encode(buf)?;
        if let Some(will) = &self.will {
            will.properties.encode(buf)?;
            will.topic.encode(buf)?;
            will.message.encode(buf)?;
        }
        if let Some(username) = &self.username {
            username.encode(buf)?;
        }
        if let Some(password) = &self.password {
            password.encode(buf)?;
        }

        Ok(buf.len() - old_len)
    }
}

impl DecodePacket for ConnectPacket {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let fixed_header = FixedHeader::decode(ba)?;
        if fixed_header.packet_type() != PacketType::Connect {
            return Err(DecodeError::InvalidPacketType);
        }

        // The protocol name MUST be the UTF-8 string "MQTT" [MQTT-3.1.2-1].
        let protocol_name = StringData::decode(ba)?;
        if protocol_name.as_ref() != PROTOCOL_NAME {
            return Err(DecodeError::InvalidProtocolName);
        }

        // The protocol version MUST be 5 for this codec [MQTT-3.1.2-2].
        let protocol_level = ba.read_byte()?;
        if protocol_level != PROTOCOL_LEVEL {
            return Err(DecodeError::InvalidProtocolLevel);
        }

        let connect_flags = ConnectFlags::decode(ba)?;
        // Will QoS and will retain are only meaningful together with the
        // will flag [MQTT-3.1.2-11].
        if !connect_flags.will()
            && (connect_flags.will_qos() != QoS::AtMostOnce || connect_flags.will_retain())
        {
            return Err(DecodeError::InvalidConnectFlags);
        }

        let keep_alive = ba.read_u16()?;
        let properties = ConnectProperties::decode(ba)?;

        let client_id = StringData::decode(ba)?;

        let will = if connect_flags.will() {
            let will_properties = WillProperties::decode(ba)?;
            let will_topic = StringData::decode(ba)?;
            let will_message = BinaryData::decode(ba)?;
            Some(Will {
                qos: connect_flags.will_qos(),
                retain: connect_flags.will_retain(),
                topic: will_topic,
                message: will_message,
                properties: will_properties,
            })
        } else {
            None
        };

        let username = if connect_flags.has_username() {
            Some(StringData::decode(ba)?)
        } else {
            None
        };

        let password = if connect_flags.has_password() {
            Some(BinaryData::decode(ba)?)
        } else {
            None
        };

        Ok(Self {
            client_id,
            clean_start: connect_flags.clean_start(),
            keep_alive,
            will,
            username,
            password,
            properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let buf: Vec<u8> = vec![
            0x10, 0x15, 0x00, 0x04, 0x4d, 0x51, 0x54, 0x54, 0x05, 0x02, 0x00, 0x3c, 0x00, 0x00,
            0x08, 0x77, 0x76, 0x50, 0x54, 0x58, 0x63, 0x43, 0x77,
        ];
        let mut ba = ByteArray::new(&buf);
        let packet = ConnectPacket::decode(&mut ba).unwrap();
        assert_eq!(packet.client_id(), "wvPTXcCw");
        assert!(packet.clean_start());
        assert_eq!(packet.keep_alive(), 60);
        assert!(packet.will().is_none());
    }

    #[test]
    fn test_invalid_protocol_name() {
        let buf: Vec<u8> = vec![
            0x10, 0x0d, 0x00, 0x03, 0x53, 0x53, 0x48, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
            0x31,
        ];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(
            ConnectPacket::decode(&mut ba),
            Err(DecodeError::InvalidProtocolName)
        );
    }

    #[test]
    fn test_invalid_protocol_level() {
        let buf: Vec<u8> = vec![
            0x10, 0x0e, 0x00, 0x04, 0x4d, 0x51, 0x54, 0x54, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x01, 0x31,
        ];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(
            ConnectPacket::decode(&mut ba),
            Err(DecodeError::InvalidProtocolLevel)
        );
    }

    #[test]
    fn test_password_requires_username() {
        let ret = ConnectPacket::new(
            "client",
            true,
            60,
            None,
            None,
            Some(b"secret"),
            ConnectProperties::new(),
        );
        assert!(ret.is_err());
        assert_eq!(ret.unwrap_err().field(), "password");
    }

    #[test]
    fn test_roundtrip_with_will() {
        let mut will_properties = WillProperties::new();
        will_properties.set_will_delay_interval(Some(5));
        let will = Will::new(
            "will/topic",
            b"gone",
            QoS::AtLeastOnce,
            true,
            will_properties,
        )
        .unwrap();
        let packet = ConnectPacket::new(
            "connecting",
            false,
            30,
            Some(will),
            Some("user"),
            Some(b"pass"),
            ConnectProperties::new(),
        )
        .unwrap();

        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let mut ba = ByteArray::new(&buf);
        let decoded = ConnectPacket::decode(&mut ba).unwrap();
        assert_eq!(decoded, packet);
    }
}
