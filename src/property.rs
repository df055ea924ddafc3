// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! A property block is a Variable Byte Integer property length followed by
//! that many bytes of (identifier, value) entries in any order.
//!
//! Which identifiers are legal depends on the packet type, so each packet
//! family gets its own typed property struct with one optional field per
//! legal identifier. Unknown identifiers, identifiers that are not legal in
//! the packet at hand, and duplicates of non-repeatable identifiers are all
//! malformed. User properties and subscription identifiers are the only
//! repeatable identifiers; user properties keep their insertion order and
//! may contain duplicate names.
//!
//! The encoder walks the struct fields in declaration order, which yields a
//! stable byte sequence for equal values. Absent fields are not encoded at
//! all; an absent four byte integer is distinguishable from one sent as 0.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::base::{DecodePacket, EncodePacket, QoS};
use crate::binary_data::BinaryData;
use crate::bool_data::BoolData;
use crate::byte_array::ByteArray;
use crate::error::{ConstructionError, DecodeError, EncodeError};
use crate::string_data::StringData;
use crate::string_pair_data::StringPairData;
use crate::u16_data::U16Data;
use crate::u32_data::U32Data;
use crate::var_int::{VarInt, MAX_PACKET_LEN};

/// Property identifier, sent on the wire as a Variable Byte Integer.
///
/// All identifiers defined in MQTT 5.0 fit in a single byte.
#[allow(clippy::module_name_repetitions)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    PayloadFormatIndicator = 0x01,
    MessageExpiryInterval = 0x02,
    ContentType = 0x03,
    ResponseTopic = 0x08,
    CorrelationData = 0x09,
    SubscriptionIdentifier = 0x0b,
    SessionExpiryInterval = 0x11,
    AssignedClientIdentifier = 0x12,
    ServerKeepAlive = 0x13,
    AuthenticationMethod = 0x15,
    AuthenticationData = 0x16,
    RequestProblemInformation = 0x17,
    WillDelayInterval = 0x18,
    RequestResponseInformation = 0x19,
    ResponseInformation = 0x1a,
    ServerReference = 0x1c,
    ReasonString = 0x1f,
    ReceiveMaximum = 0x21,
    TopicAliasMaximum = 0x22,
    TopicAlias = 0x23,
    MaximumQoS = 0x24,
    RetainAvailable = 0x25,
    UserProperty = 0x26,
    MaximumPacketSize = 0x27,
    WildcardSubscriptionAvailable = 0x28,
    SubscriptionIdentifierAvailable = 0x29,
    SharedSubscriptionAvailable = 0x2a,
}

impl PropertyType {
    /// Get byte length used in packet.
    #[must_use]
    #[inline]
    pub const fn bytes() -> usize {
        1
    }
}

impl TryFrom<u8> for PropertyType {
    type Error = DecodeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0x01 => Ok(Self::PayloadFormatIndicator),
            0x02 => Ok(Self::MessageExpiryInterval),
            0x03 => Ok(Self::ContentType),
            0x08 => Ok(Self::ResponseTopic),
            0x09 => Ok(Self::CorrelationData),
            0x0b => Ok(Self::SubscriptionIdentifier),
            0x11 => Ok(Self::SessionExpiryInterval),
            0x12 => Ok(Self::AssignedClientIdentifier),
            0x13 => Ok(Self::ServerKeepAlive),
            0x15 => Ok(Self::AuthenticationMethod),
            0x16 => Ok(Self::AuthenticationData),
            0x17 => Ok(Self::RequestProblemInformation),
            0x18 => Ok(Self::WillDelayInterval),
            0x19 => Ok(Self::RequestResponseInformation),
            0x1a => Ok(Self::ResponseInformation),
            0x1c => Ok(Self::ServerReference),
            0x1f => Ok(Self::ReasonString),
            0x21 => Ok(Self::ReceiveMaximum),
            0x22 => Ok(Self::TopicAliasMaximum),
            0x23 => Ok(Self::TopicAlias),
            0x24 => Ok(Self::MaximumQoS),
            0x25 => Ok(Self::RetainAvailable),
            0x26 => Ok(Self::UserProperty),
            0x27 => Ok(Self::MaximumPacketSize),
            0x28 => Ok(Self::WildcardSubscriptionAvailable),
            0x29 => Ok(Self::SubscriptionIdentifierAvailable),
            0x2a => Ok(Self::SharedSubscriptionAvailable),
            _ => Err(DecodeError::InvalidPropertyType),
        }
    }
}

/// Read the property length prefix and return the offset one past the last
/// property byte.
fn decode_property_len(ba: &mut ByteArray) -> Result<usize, DecodeError> {
    let len = VarInt::decode(ba)?;
    Ok(ba.offset() + len.value())
}

/// Verify that the property entries ended exactly on the declared boundary.
fn check_property_end(ba: &ByteArray, end: usize) -> Result<(), DecodeError> {
    if ba.offset() == end {
        Ok(())
    } else {
        Err(DecodeError::InvalidRemainingLength)
    }
}

/// Properties in the CONNECT packet variable header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectProperties {
    session_expiry_interval: Option<u32>,
    receive_maximum: Option<u16>,
    maximum_packet_size: Option<u32>,
    topic_alias_maximum: Option<u16>,
    request_response_information: Option<bool>,
    request_problem_information: Option<bool>,
    authentication_method: Option<StringData>,
    authentication_data: Option<BinaryData>,
    user_properties: Vec<StringPairData>,
}

impl ConnectProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// If the Session Expiry Interval is absent the value 0 is used and the
    /// session ends when the network connection is closed.
    pub fn set_session_expiry_interval(&mut self, interval: Option<u32>) -> &mut Self {
        self.session_expiry_interval = interval;
        self
    }

    #[must_use]
    pub const fn session_expiry_interval(&self) -> Option<u32> {
        self.session_expiry_interval
    }

    /// The Receive Maximum limits the number of `QoS` 1 and `QoS` 2
    /// publications the client is willing to process concurrently.
    ///
    /// # Errors
    ///
    /// Returns error if `max` is zero.
    pub fn set_receive_maximum(
        &mut self,
        max: Option<u16>,
    ) -> Result<&mut Self, ConstructionError> {
        if max == Some(0) {
            return Err(ConstructionError::new(
                "receive_maximum",
                "must not be zero",
            ));
        }
        self.receive_maximum = max;
        Ok(self)
    }

    #[must_use]
    pub const fn receive_maximum(&self) -> Option<u16> {
        self.receive_maximum
    }

    /// # Errors
    ///
    /// Returns error if `max` is zero.
    pub fn set_maximum_packet_size(
        &mut self,
        max: Option<u32>,
    ) -> Result<&mut Self, ConstructionError> {
        if max == Some(0) {
            return Err(ConstructionError::new(
                "maximum_packet_size",
                "must not be zero",
            ));
        }
        self.maximum_packet_size = max;
        Ok(self)
    }

    #[must_use]
    pub const fn maximum_packet_size(&self) -> Option<u32> {
        self.maximum_packet_size
    }

    pub fn set_topic_alias_maximum(&mut self, max: Option<u16>) -> &mut Self {
        self.topic_alias_maximum = max;
        self
    }

    #[must_use]
    pub const fn topic_alias_maximum(&self) -> Option<u16> {
        self.topic_alias_maximum
    }

    pub fn set_request_response_information(&mut self, on: Option<bool>) -> &mut Self {
        self.request_response_information = on;
        self
    }

    #[must_use]
    pub const fn request_response_information(&self) -> Option<bool> {
        self.request_response_information
    }

    pub fn set_request_problem_information(&mut self, on: Option<bool>) -> &mut Self {
        self.request_problem_information = on;
        self
    }

    #[must_use]
    pub const fn request_problem_information(&self) -> Option<bool> {
        self.request_problem_information
    }

    /// # Errors
    ///
    /// Returns error if `method` is not a valid MQTT string.
    pub fn set_authentication_method(
        &mut self,
        method: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.authentication_method = match method {
            Some(method) => Some(StringData::from(method).map_err(|_e| {
                ConstructionError::new("authentication_method", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn authentication_method(&self) -> Option<&str> {
        self.authentication_method.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `data` is longer than 65535 bytes.
    pub fn set_authentication_data(
        &mut self,
        data: Option<&[u8]>,
    ) -> Result<&mut Self, ConstructionError> {
        self.authentication_data = match data {
            Some(data) => Some(BinaryData::from_slice(data).map_err(|_e| {
                ConstructionError::new("authentication_data", "longer than 65535 bytes")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn authentication_data(&self) -> Option<&[u8]> {
        self.authentication_data.as_ref().map(AsRef::as_ref)
    }

    /// Append a user property pair. Pairs keep their insertion order and
    /// duplicate names are allowed.
    ///
    /// # Errors
    ///
    /// Returns error if `key` or `value` is not a valid MQTT string.
    pub fn add_user_property(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, ConstructionError> {
        let pair = StringPairData::new(key, value).map_err(|_e| {
            ConstructionError::new("user_properties", "not a valid MQTT string pair")
        })?;
        self.user_properties.push(pair);
        Ok(self)
    }

    #[must_use]
    pub fn user_properties(&self) -> &[StringPairData] {
        &self.user_properties
    }

    fn property_len(&self) -> usize {
        let mut len = 0;
        if self.session_expiry_interval.is_some() {
            len += PropertyType::bytes() + U32Data::bytes();
        }
        if self.receive_maximum.is_some() {
            len += PropertyType::bytes() + U16Data::bytes();
        }
        if self.maximum_packet_size.is_some() {
            len += PropertyType::bytes() + U32Data::bytes();
        }
        if self.topic_alias_maximum.is_some() {
            len += PropertyType::bytes() + U16Data::bytes();
        }
        if self.request_response_information.is_some() {
            len += PropertyType::bytes() + BoolData::bytes();
        }
        if self.request_problem_information.is_some() {
            len += PropertyType::bytes() + BoolData::bytes();
        }
        if let Some(method) = &self.authentication_method {
            len += PropertyType::bytes() + method.bytes();
        }
        if let Some(data) = &self.authentication_data {
            len += PropertyType::bytes() + data.bytes();
        }
        for pair in &self.user_properties {
            len += PropertyType::bytes() + pair.bytes();
        }
        len
    }

    /// Get byte length in packet, including the property length prefix.
    #[must_use]
    pub fn bytes(&self) -> usize {
        let len = self.property_len();
        VarInt::width(len) + len
    }

    /// Returns true if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_len() == 0
    }
}

impl EncodePacket for ConnectProperties {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let len = self.property_len();
        VarInt::from(len)?.encode(buf)?;
        if let Some(interval) = self.session_expiry_interval {
            buf.push(PropertyType::SessionExpiryInterval as u8);
            U32Data::new(interval).encode(buf)?;
        }
        if let Some(max) = self.receive_maximum {
            buf.push(PropertyType::ReceiveMaximum as u8);
            U16Data::new(max).encode(buf)?;
        }
        if let Some(max) = self.maximum_packet_size {
            buf.push(PropertyType::MaximumPacketSize as u8);
            U32Data::new(max).encode(buf)?;
        }
        if let Some(max) = self.topic_alias_maximum {
            buf.push(PropertyType::TopicAliasMaximum as u8);
            U16Data::new(max).encode(buf)?;
        }
        if let Some(on) = self.request_response_information {
            buf.push(PropertyType::RequestResponseInformation as u8);
            BoolData::new(on).encode(buf)?;
        }
        if let Some(on) = self.request_problem_information {
            buf.push(PropertyType::RequestProblemInformation as u8);
            BoolData::new(on).encode(buf)?;
        }
        if let Some(method) = &self.authentication_method {
            buf.push(PropertyType::AuthenticationMethod as u8);
            method.encode(buf)?;
        }
        if let Some(data) = &self.authentication_data {
            buf.push(PropertyType::AuthenticationData as u8);
            data.encode(buf)?;
        }
        for pair in &self.user_properties {
            buf.push(PropertyType::UserProperty as u8);
            pair.encode(buf)?;
        }
        Ok(VarInt::width(len) + len)
    }
}

impl DecodePacket for ConnectProperties {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let end = decode_property_len(ba)?;
        let mut properties = Self::default();
        while ba.offset() < end {
            let property_type = PropertyType::try_from(ba.read_byte()?)?;
            match property_type {
                PropertyType::SessionExpiryInterval => {
                    if properties.session_expiry_interval.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.session_expiry_interval = Some(U32Data::decode(ba)?.value());
                }
                PropertyType::ReceiveMaximum => {
                    if properties.receive_maximum.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    let max = U16Data::decode(ba)?.value();
                    if max == 0 {
                        return Err(DecodeError::InvalidPropertyValue);
                    }
                    properties.receive_maximum = Some(max);
                }
                PropertyType::MaximumPacketSize => {
                    if properties.maximum_packet_size.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    let max = U32Data::decode(ba)?.value();
                    if max == 0 {
                        return Err(DecodeError::InvalidPropertyValue);
                    }
                    properties.maximum_packet_size = Some(max);
                }
                PropertyType::TopicAliasMaximum => {
                    if properties.topic_alias_maximum.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.topic_alias_maximum = Some(U16Data::decode(ba)?.value());
                }
                PropertyType::RequestResponseInformation => {
                    if properties.request_response_information.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.request_response_information =
                        Some(BoolData::decode(ba)?.value());
                }
                PropertyType::RequestProblemInformation => {
                    if properties.request_problem_information.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.request_problem_information = Some(BoolData::decode(ba)?.value());
                }
                PropertyType::AuthenticationMethod => {
                    if properties.authentication_method.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.authentication_method = Some(StringData::decode(ba)?);
                }
                PropertyType::AuthenticationData => {
                    if properties.authentication_data.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.authentication_data = Some(BinaryData::decode(ba)?);
                }
                PropertyType::UserProperty => {
                    properties.user_properties.push(StringPairData::decode(ba)?);
                }
                property_type => {
                    log::error!("connect: property {property_type:?} is not valid here");
                    return Err(DecodeError::InvalidPropertyType);
                }
            }
        }
        check_property_end(ba, end)?;
        Ok(properties)
    }
}

/// Properties attached to the will message in the CONNECT payload.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WillProperties {
    will_delay_interval: Option<u32>,
    payload_format_indicator: Option<bool>,
    message_expiry_interval: Option<u32>,
    content_type: Option<StringData>,
    response_topic: Option<StringData>,
    correlation_data: Option<BinaryData>,
    user_properties: Vec<StringPairData>,
}

impl WillProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The server delays publishing the will message until the delay has
    /// passed or the session ends, whichever happens first.
    pub fn set_will_delay_interval(&mut self, interval: Option<u32>) -> &mut Self {
        self.will_delay_interval = interval;
        self
    }

    #[must_use]
    pub const fn will_delay_interval(&self) -> Option<u32> {
        self.will_delay_interval
    }

    pub fn set_payload_format_indicator(&mut self, on: Option<bool>) -> &mut Self {
        self.payload_format_indicator = on;
        self
    }

    #[must_use]
    pub const fn payload_format_indicator(&self) -> Option<bool> {
        self.payload_format_indicator
    }

    pub fn set_message_expiry_interval(&mut self, interval: Option<u32>) -> &mut Self {
        self.message_expiry_interval = interval;
        self
    }

    #[must_use]
    pub const fn message_expiry_interval(&self) -> Option<u32> {
        self.message_expiry_interval
    }

    /// # Errors
    ///
    /// Returns error if `content_type` is not a valid MQTT string.
    pub fn set_content_type(
        &mut self,
        content_type: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.content_type = match content_type {
            Some(content_type) => Some(StringData::from(content_type).map_err(|_e| {
                ConstructionError::new("content_type", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `topic` is not a valid MQTT string.
    pub fn set_response_topic(
        &mut self,
        topic: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.response_topic = match topic {
            Some(topic) => Some(StringData::from(topic).map_err(|_e| {
                ConstructionError::new("response_topic", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn response_topic(&self) -> Option<&str> {
        self.response_topic.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `data` is longer than 65535 bytes.
    pub fn set_correlation_data(
        &mut self,
        data: Option<&[u8]>,
    ) -> Result<&mut Self, ConstructionError> {
        self.correlation_data = match data {
            Some(data) => Some(BinaryData::from_slice(data).map_err(|_e| {
                ConstructionError::new("correlation_data", "longer than 65535 bytes")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn correlation_data(&self) -> Option<&[u8]> {
        self.correlation_data.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `key` or `value` is not a valid MQTT string.
    pub fn add_user_property(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, ConstructionError> {
        let pair = StringPairData::new(key, value).map_err(|_e| {
            ConstructionError::new("user_properties", "not a valid MQTT string pair")
        })?;
        self.user_properties.push(pair);
        Ok(self)
    }

    #[must_use]
    pub fn user_properties(&self) -> &[StringPairData] {
        &self.user_properties
    }

    fn property_len(&self) -> usize {
        let mut len = 0;
        if self.will_delay_interval.is_some() {
            len += PropertyType::bytes() + U32Data::bytes();
        }
        if self.payload_format_indicator.is_some() {
            len += PropertyType::bytes() + BoolData::bytes();
        }
        if self.message_expiry_interval.is_some() {
            len += PropertyType::bytes() + U32Data::bytes();
        }
        if let Some(content_type) = &self.content_type {
            len += PropertyType::bytes() + content_type.bytes();
        }
        if let Some(topic) = &self.response_topic {
            len += PropertyType::bytes() + topic.bytes();
        }
        if let Some(data) = &self.correlation_data {
            len += PropertyType::bytes() + data.bytes();
        }
        for pair in &self.user_properties {
            len += PropertyType::bytes() + pair.bytes();
        }
        len
    }

    /// Get byte length in packet, including the property length prefix.
    #[must_use]
    pub fn bytes(&self) -> usize {
        let len = self.property_len();
        VarInt::width(len) + len
    }

    /// Returns true if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_len() == 0
    }
}

impl EncodePacket for WillProperties {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let len = self.property_len();
        VarInt::from(len)?.encode(buf)?;
        if let Some(interval) = self.will_delay_interval {
            buf.push(PropertyType::WillDelayInterval as u8);
            U32Data::new(interval).encode(buf)?;
        }
        if let Some(on) = self.payload_format_indicator {
            buf.push(PropertyType::PayloadFormatIndicator as u8);
            BoolData::new(on).encode(buf)?;
        }
        if let Some(interval) = self.message_expiry_interval {
            buf.push(PropertyType::MessageExpiryInterval as u8);
            U32Data::new(interval).encode(buf)?;
        }
        if let Some(content_type) = &self.content_type {
            buf.push(PropertyType::ContentType as u8);
            content_type.encode(buf)?;
        }
        if let Some(topic) = &self.response_topic {
            buf.push(PropertyType::ResponseTopic as u8);
            topic.encode(buf)?;
        }
        if let Some(data) = &self.correlation_data {
            buf.push(PropertyType::CorrelationData as u8);
            data.encode(buf)?;
        }
        for pair in &self.user_properties {
            buf.push(PropertyType::UserProperty as u8);
            pair.encode(buf)?;
        }
        Ok(VarInt::width(len) + len)
    }
}

impl DecodePacket for WillProperties {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let end = decode_property_len(ba)?;
        let mut properties = Self::default();
        while ba.offset() < end {
            let property_type = PropertyType::try_from(ba.read_byte()?)?;
            match property_type {
                PropertyType::WillDelayInterval => {
                    if properties.will_delay_interval.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.will_delay_interval = Some(U32Data::decode(ba)?.value());
                }
                PropertyType::PayloadFormatIndicator => {
                    if properties.payload_format_indicator.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.payload_format_indicator = Some(BoolData::decode(ba)?.value());
                }
                PropertyType::MessageExpiryInterval => {
                    if properties.message_expiry_interval.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.message_expiry_interval = Some(U32Data::decode(ba)?.value());
                }
                PropertyType::ContentType => {
                    if properties.content_type.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.content_type = Some(StringData::decode(ba)?);
                }
                PropertyType::ResponseTopic => {
                    if properties.response_topic.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.response_topic = Some(StringData::decode(ba)?);
                }
                PropertyType::CorrelationData => {
                    if properties.correlation_data.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.correlation_data = Some(BinaryData::decode(ba)?);
                }
                PropertyType::UserProperty => {
                    properties.user_properties.push(StringPairData::decode(ba)?);
                }
                property_type => {
                    log::error!("will: property {property_type:?} is not valid here");
                    return Err(DecodeError::InvalidPropertyType);
                }
            }
        }
        check_property_end(ba, end)?;
        Ok(properties)
    }
}

/// Properties in the CONNACK packet variable header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectAckProperties {
    session_expiry_interval: Option<u32>,
    receive_maximum: Option<u16>,
    maximum_qos: Option<QoS>,
    retain_available: Option<bool>,
    maximum_packet_size: Option<u32>,
    assigned_client_identifier: Option<StringData>,
    topic_alias_maximum: Option<u16>,
    reason_string: Option<StringData>,
    wildcard_subscription_available: Option<bool>,
    subscription_identifier_available: Option<bool>,
    shared_subscription_available: Option<bool>,
    server_keep_alive: Option<u16>,
    response_information: Option<StringData>,
    server_reference: Option<StringData>,
    authentication_method: Option<StringData>,
    authentication_data: Option<BinaryData>,
    user_properties: Vec<StringPairData>,
}

impl ConnectAckProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_session_expiry_interval(&mut self, interval: Option<u32>) -> &mut Self {
        self.session_expiry_interval = interval;
        self
    }

    #[must_use]
    pub const fn session_expiry_interval(&self) -> Option<u32> {
        self.session_expiry_interval
    }

    /// # Errors
    ///
    /// Returns error if `max` is zero.
    pub fn set_receive_maximum(
        &mut self,
        max: Option<u16>,
    ) -> Result<&mut Self, ConstructionError> {
        if max == Some(0) {
            return Err(ConstructionError::new(
                "receive_maximum",
                "must not be zero",
            ));
        }
        self.receive_maximum = max;
        Ok(self)
    }

    #[must_use]
    pub const fn receive_maximum(&self) -> Option<u16> {
        self.receive_maximum
    }

    /// If a server does not support `QoS` 1 or `QoS` 2 PUBLISH packets it
    /// MUST send a Maximum `QoS` in the CONNACK packet [MQTT-3.2.2-9].
    ///
    /// # Errors
    ///
    /// Returns error if `qos` is `QoS` 2; only 0 and 1 may be sent.
    pub fn set_maximum_qos(&mut self, qos: Option<QoS>) -> Result<&mut Self, ConstructionError> {
        if qos == Some(QoS::ExactOnce) {
            return Err(ConstructionError::new("maximum_qos", "must be 0 or 1"));
        }
        self.maximum_qos = qos;
        Ok(self)
    }

    #[must_use]
    pub const fn maximum_qos(&self) -> Option<QoS> {
        self.maximum_qos
    }

    pub fn set_retain_available(&mut self, available: Option<bool>) -> &mut Self {
        self.retain_available = available;
        self
    }

    #[must_use]
    pub const fn retain_available(&self) -> Option<bool> {
        self.retain_available
    }

    /// # Errors
    ///
    /// Returns error if `max` is zero.
    pub fn set_maximum_packet_size(
        &mut self,
        max: Option<u32>,
    ) -> Result<&mut Self, ConstructionError> {
        if max == Some(0) {
            return Err(ConstructionError::new(
                "maximum_packet_size",
                "must not be zero",
            ));
        }
        self.maximum_packet_size = max;
        Ok(self)
    }

    #[must_use]
    pub const fn maximum_packet_size(&self) -> Option<u32> {
        self.maximum_packet_size
    }

    /// The client identifier which was assigned by the server because a
    /// zero length client identifier was found in the CONNECT packet.
    ///
    /// # Errors
    ///
    /// Returns error if `client_id` is not a valid MQTT string.
    pub fn set_assigned_client_identifier(
        &mut self,
        client_id: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.assigned_client_identifier = match client_id {
            Some(client_id) => Some(StringData::from(client_id).map_err(|_e| {
                ConstructionError::new("assigned_client_identifier", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn assigned_client_identifier(&self) -> Option<&str> {
        self.assigned_client_identifier.as_ref().map(AsRef::as_ref)
    }

    pub fn set_topic_alias_maximum(&mut self, max: Option<u16>) -> &mut Self {
        self.topic_alias_maximum = max;
        self
    }

    #[must_use]
    pub const fn topic_alias_maximum(&self) -> Option<u16> {
        self.topic_alias_maximum
    }

    /// # Errors
    ///
    /// Returns error if `reason` is not a valid MQTT string.
    pub fn set_reason_string(
        &mut self,
        reason: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.reason_string = match reason {
            Some(reason) => Some(StringData::from(reason).map_err(|_e| {
                ConstructionError::new("reason_string", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn reason_string(&self) -> Option<&str> {
        self.reason_string.as_ref().map(AsRef::as_ref)
    }

    pub fn set_wildcard_subscription_available(&mut self, available: Option<bool>) -> &mut Self {
        self.wildcard_subscription_available = available;
        self
    }

    #[must_use]
    pub const fn wildcard_subscription_available(&self) -> Option<bool> {
        self.wildcard_subscription_available
    }

    pub fn set_subscription_identifier_available(
        &mut self,
        available: Option<bool>,
    ) -> &mut Self {
        self.subscription_identifier_available = available;
        self
    }

    #[must_use]
    pub const fn subscription_identifier_available(&self) -> Option<bool> {
        self.subscription_identifier_available
    }

    pub fn set_shared_subscription_available(&mut self, available: Option<bool>) -> &mut Self {
        self.shared_subscription_available = available;
        self
    }

    #[must_use]
    pub const fn shared_subscription_available(&self) -> Option<bool> {
        self.shared_subscription_available
    }

    /// If present, the client MUST use this keep alive value instead of the
    /// one it sent on CONNECT [MQTT-3.2.2-21].
    pub fn set_server_keep_alive(&mut self, keep_alive: Option<u16>) -> &mut Self {
        self.server_keep_alive = keep_alive;
        self
    }

    #[must_use]
    pub const fn server_keep_alive(&self) -> Option<u16> {
        self.server_keep_alive
    }

    /// # Errors
    ///
    /// Returns error if `info` is not a valid MQTT string.
    pub fn set_response_information(
        &mut self,
        info: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.response_information = match info {
            Some(info) => Some(StringData::from(info).map_err(|_e| {
                ConstructionError::new("response_information", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn response_information(&self) -> Option<&str> {
        self.response_information.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `reference` is not a valid MQTT string.
    pub fn set_server_reference(
        &mut self,
        reference: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.server_reference = match reference {
            Some(reference) => Some(StringData::from(reference).map_err(|_e| {
                ConstructionError::new("server_reference", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn server_reference(&self) -> Option<&str> {
        self.server_reference.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `method` is not a valid MQTT string.
    pub fn set_authentication_method(
        &mut self,
        method: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.authentication_method = match method {
            Some(method) => Some(StringData::from(method).map_err(|_e| {
                ConstructionError::new("authentication_method", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn authentication_method(&self) -> Option<&str> {
        self.authentication_method.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `data` is longer than 65535 bytes.
    pub fn set_authentication_data(
        &mut self,
        data: Option<&[u8]>,
    ) -> Result<&mut Self, ConstructionError> {
        self.authentication_data = match data {
            Some(data) => Some(BinaryData::from_slice(data).map_err(|_e| {
                ConstructionError::new("authentication_data", "longer than 65535 bytes")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn authentication_data(&self) -> Option<&[u8]> {
        self.authentication_data.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `key` or `value` is not a valid MQTT string.
    pub fn add_user_property(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, ConstructionError> {
        let pair = StringPairData::new(key, value).map_err(|_e| {
            ConstructionError::new("user_properties", "not a valid MQTT string pair")
        })?;
        self.user_properties.push(pair);
        Ok(self)
    }

    #[must_use]
    pub fn user_properties(&self) -> &[StringPairData] {
        &self.user_properties
    }

    fn property_len(&self) -> usize {
        let mut len = 0;
        if self.session_expiry_interval.is_some() {
            len += PropertyType::bytes() + U32Data::bytes();
        }
        if self.receive_maximum.is_some() {
            len += PropertyType::bytes() + U16Data::bytes();
        }
        if self.maximum_qos.is_some() {
            len += PropertyType::bytes() + QoS::bytes();
        }
        if self.retain_available.is_some() {
            len += PropertyType::bytes() + BoolData::bytes();
        }
        if self.maximum_packet_size.is_some() {
            len += PropertyType::bytes() + U32Data::bytes();
        }
        if let Some(client_id) = &self.assigned_client_identifier {
            len += PropertyType::bytes() + client_id.bytes();
        }
        if self.topic_alias_maximum.is_some() {
            len += PropertyType::bytes() + U16Data::bytes();
        }
        if let Some(reason) = &self.reason_string {
            len += PropertyType::bytes() + reason.bytes();
        }
        if self.wildcard_subscription_available.is_some() {
            len += PropertyType::bytes() + BoolData::bytes();
        }
        if self.subscription_identifier_available.is_some() {
            len += PropertyType::bytes() + BoolData::bytes();
        }
        if self.shared_subscription_available.is_some() {
            len += PropertyType::bytes() + BoolData::bytes();
        }
        if self.server_keep_alive.is_some() {
            len += PropertyType::bytes() + U16Data::bytes();
        }
        if let Some(info) = &self.response_information {
            len += PropertyType::bytes() + info.bytes();
        }
        if let Some(reference) = &self.server_reference {
            len += PropertyType::bytes() + reference.bytes();
        }
        if let Some(method) = &self.authentication_method {
            len += PropertyType::bytes() + method.bytes();
        }
        if let Some(data) = &self.authentication_data {
            len += PropertyType::bytes() + data.bytes();
        }
        for pair in &self.user_properties {
            len += PropertyType::bytes() + pair.bytes();
        }
        len
    }

    /// Get byte length in packet, including the property length prefix.
    #[must_use]
    pub fn bytes(&self) -> usize {
        let len = self.property_len();
        VarInt::width(len) + len
    }

    /// Returns true if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_len() == 0
    }
}

impl EncodePacket for ConnectAckProperties {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let len = self.property_len();
        VarInt::from(len)?.encode(buf)?;
        if let Some(interval) = self.session_expiry_interval {
            buf.push(PropertyType::SessionExpiryInterval as u8);
            U32Data::new(interval).encode(buf)?;
        }
        if let Some(max) = self.receive_maximum {
            buf.push(PropertyType::ReceiveMaximum as u8);
            U16Data::new(max).encode(buf)?;
        }
        if let Some(qos) = self.maximum_qos {
            buf.push(PropertyType::MaximumQoS as u8);
            qos.encode(buf)?;
        }
        if let Some(available) = self.retain_available {
            buf.push(PropertyType::RetainAvailable as u8);
            BoolData::new(available).encode(buf)?;
        }
        if let Some(max) = self.maximum_packet_size {
            buf.push(PropertyType::MaximumPacketSize as u8);
            U32Data::new(max).encode(buf)?;
        }
        if let Some(client_id) = &self.assigned_client_identifier {
            buf.push(PropertyType::AssignedClientIdentifier as u8);
            client_id.encode(buf)?;
        }
        if let Some(max) = self.topic_alias_maximum {
            buf.push(PropertyType::TopicAliasMaximum as u8);
            U16Data::new(max).encode(buf)?;
        }
        if let Some(reason) = &self.reason_string {
            buf.push(PropertyType::ReasonString as u8);
            reason.encode(buf)?;
        }
        if let Some(available) = self.wildcard_subscription_available {
            buf.push(PropertyType::WildcardSubscriptionAvailable as u8);
            BoolData::new(available).encode(buf)?;
        }
        if let Some(available) = self.subscription_identifier_available {
            buf.push(PropertyType::SubscriptionIdentifierAvailable as u8);
            BoolData::new(available).encode(buf)?;
        }
        if let Some(available) = self.shared_subscription_available {
            buf.push(PropertyType::SharedSubscriptionAvailable as u8);
            BoolData::new(available).encode(buf)?;
        }
        if let Some(keep_alive) = self.server_keep_alive {
            buf.push(PropertyType::ServerKeepAlive as u8);
            U16Data::new(keep_alive).encode(buf)?;
        }
        if let Some(info) = &self.response_information {
            buf.push(PropertyType::ResponseInformation as u8);
            info.encode(buf)?;
        }
        if let Some(reference) = &self.server_reference {
            buf.push(PropertyType::ServerReference as u8);
            reference.encode(buf)?;
        }
        if let Some(method) = &self.authentication_method {
            buf.push(PropertyType::AuthenticationMethod as u8);
            method.encode(buf)?;
        }
        if let Some(data) = &self.authentication_data {
            buf.push(PropertyType::AuthenticationData as u8);
            data.encode(buf)?;
        }
        for pair in &self.user_properties {
            buf.push(PropertyType::UserProperty as u8);
            pair.encode(buf)?;
        }
        Ok(VarInt::width(len) + len)
    }
}

impl DecodePacket for ConnectAckProperties {
    #[allow(clippy::too_many_lines)]
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let end = decode_property_len(ba)?;
        let mut properties = Self::default();
        while ba.offset() < end {
            let property_type = PropertyType::try_from(ba.read_byte()?)?;
            match property_type {
                PropertyType::SessionExpiryInterval => {
                    if properties.session_expiry_interval.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.session_expiry_interval = Some(U32Data::decode(ba)?.value());
                }
                PropertyType::ReceiveMaximum => {
                    if properties.receive_maximum.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    let max = U16Data::decode(ba)?.value();
                    if max == 0 {
                        return Err(DecodeError::InvalidPropertyValue);
                    }
                    properties.receive_maximum = Some(max);
                }
                PropertyType::MaximumQoS => {
                    if properties.maximum_qos.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    let qos = QoS::decode(ba)?;
                    if qos == QoS::ExactOnce {
                        return Err(DecodeError::InvalidPropertyValue);
                    }
                    properties.maximum_qos = Some(qos);
                }
                PropertyType::RetainAvailable => {
                    if properties.retain_available.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.retain_available = Some(BoolData::decode(ba)?.value());
                }
                PropertyType::MaximumPacketSize => {
                    if properties.maximum_packet_size.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    let max = U32Data::decode(ba)?.value();
                    if max == 0 {
                        return Err(DecodeError::InvalidPropertyValue);
                    }
                    properties.maximum_packet_size = Some(max);
                }
                PropertyType::AssignedClientIdentifier => {
                    if properties.assigned_client_identifier.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.assigned_client_identifier = Some(StringData::decode(ba)?);
                }
                PropertyType::TopicAliasMaximum => {
                    if properties.topic_alias_maximum.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.topic_alias_maximum = Some(U16Data::decode(ba)?.value());
                }
                PropertyType::ReasonString => {
                    if properties.reason_string.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.reason_string = Some(StringData::decode(ba)?);
                }
                PropertyType::WildcardSubscriptionAvailable => {
                    if properties.wildcard_subscription_available.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.wildcard_subscription_available =
                        Some(BoolData::decode(ba)?.value());
                }
                PropertyType::SubscriptionIdentifierAvailable => {
                    if properties.subscription_identifier_available.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.subscription_identifier_available =
                        Some(BoolData::decode(ba)?.value());
                }
                PropertyType::SharedSubscriptionAvailable => {
                    if properties.shared_subscription_available.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.shared_subscription_available =
                        Some(BoolData::decode(ba)?.value());
                }
                PropertyType::ServerKeepAlive => {
                    if properties.server_keep_alive.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.server_keep_alive = Some(U16Data::decode(ba)?.value());
                }
                PropertyType::ResponseInformation => {
                    if properties.response_information.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.response_information = Some(StringData::decode(ba)?);
                }
                PropertyType::ServerReference => {
                    if properties.server_reference.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.server_reference = Some(StringData::decode(ba)?);
                }
                PropertyType::AuthenticationMethod => {
                    if properties.authentication_method.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.authentication_method = Some(StringData::decode(ba)?);
                }
                PropertyType::AuthenticationData => {
                    if properties.authentication_data.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.authentication_data = Some(BinaryData::decode(ba)?);
                }
                PropertyType::UserProperty => {
                    properties.user_properties.push(StringPairData::decode(ba)?);
                }
                property_type => {
                    log::error!("connect_ack: property {property_type:?} is not valid here");
                    return Err(DecodeError::InvalidPropertyType);
                }
            }
        }
        check_property_end(ba, end)?;
        Ok(properties)
    }
}

/// Properties in the PUBLISH packet variable header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishProperties {
    payload_format_indicator: Option<bool>,
    message_expiry_interval: Option<u32>,
    topic_alias: Option<u16>,
    response_topic: Option<StringData>,
    correlation_data: Option<BinaryData>,
    subscription_identifiers: Vec<u32>,
    content_type: Option<StringData>,
    user_properties: Vec<StringPairData>,
}

impl PublishProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_payload_format_indicator(&mut self, on: Option<bool>) -> &mut Self {
        self.payload_format_indicator = on;
        self
    }

    #[must_use]
    pub const fn payload_format_indicator(&self) -> Option<bool> {
        self.payload_format_indicator
    }

    pub fn set_message_expiry_interval(&mut self, interval: Option<u32>) -> &mut Self {
        self.message_expiry_interval = interval;
        self
    }

    #[must_use]
    pub const fn message_expiry_interval(&self) -> Option<u32> {
        self.message_expiry_interval
    }

    /// A topic alias of 0 is not permitted [MQTT-3.3.2-8].
    ///
    /// # Errors
    ///
    /// Returns error if `alias` is zero.
    pub fn set_topic_alias(&mut self, alias: Option<u16>) -> Result<&mut Self, ConstructionError> {
        if alias == Some(0) {
            return Err(ConstructionError::new("topic_alias", "must not be zero"));
        }
        self.topic_alias = alias;
        Ok(self)
    }

    #[must_use]
    pub const fn topic_alias(&self) -> Option<u16> {
        self.topic_alias
    }

    /// # Errors
    ///
    /// Returns error if `topic` is not a valid MQTT string.
    pub fn set_response_topic(
        &mut self,
        topic: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.response_topic = match topic {
            Some(topic) => Some(StringData::from(topic).map_err(|_e| {
                ConstructionError::new("response_topic", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn response_topic(&self) -> Option<&str> {
        self.response_topic.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `data` is longer than 65535 bytes.
    pub fn set_correlation_data(
        &mut self,
        data: Option<&[u8]>,
    ) -> Result<&mut Self, ConstructionError> {
        self.correlation_data = match data {
            Some(data) => Some(BinaryData::from_slice(data).map_err(|_e| {
                ConstructionError::new("correlation_data", "longer than 65535 bytes")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn correlation_data(&self) -> Option<&[u8]> {
        self.correlation_data.as_ref().map(AsRef::as_ref)
    }

    /// Append a subscription identifier. Multiple identifiers are included
    /// if the publication is the result of a match to more than one
    /// subscription [MQTT-3.3.4-4].
    ///
    /// # Errors
    ///
    /// Returns error if `id` is zero or larger than 268,435,455.
    pub fn add_subscription_identifier(
        &mut self,
        id: u32,
    ) -> Result<&mut Self, ConstructionError> {
        if id == 0 || id as usize > MAX_PACKET_LEN {
            return Err(ConstructionError::new(
                "subscription_identifiers",
                "must be between 1 and 268435455",
            ));
        }
        self.subscription_identifiers.push(id);
        Ok(self)
    }

    #[must_use]
    pub fn subscription_identifiers(&self) -> &[u32] {
        &self.subscription_identifiers
    }

    /// # Errors
    ///
    /// Returns error if `content_type` is not a valid MQTT string.
    pub fn set_content_type(
        &mut self,
        content_type: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.content_type = match content_type {
            Some(content_type) => Some(StringData::from(content_type).map_err(|_e| {
                ConstructionError::new("content_type", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `key` or `value` is not a valid MQTT string.
    pub fn add_user_property(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, ConstructionError> {
        let pair = StringPairData::new(key, value).map_err(|_e| {
            ConstructionError::new("user_properties", "not a valid MQTT string pair")
        })?;
        self.user_properties.push(pair);
        Ok(self)
    }

    #[must_use]
    pub fn user_properties(&self) -> &[StringPairData] {
        &self.user_properties
    }

    fn property_len(&self) -> usize {
        let mut len = 0;
        if self.payload_format_indicator.is_some() {
            len += PropertyType::bytes() + BoolData::bytes();
        }
        if self.message_expiry_interval.is_some() {
            len += PropertyType::bytes() + U32Data::bytes();
        }
        if self.topic_alias.is_some() {
            len += PropertyType::bytes() + U16Data::bytes();
        }
        if let Some(topic) = &self.response_topic {
            len += PropertyType::bytes() + topic.bytes();
        }
        if let Some(data) = &self.correlation_data {
            len += PropertyType::bytes() + data.bytes();
        }
        for id in &self.subscription_identifiers {
            len += PropertyType::bytes() + VarInt::width(*id as usize);
        }
        if let Some(content_type) = &self.content_type {
            len += PropertyType::bytes() + content_type.bytes();
        }
        for pair in &self.user_properties {
            len += PropertyType::bytes() + pair.bytes();
        }
        len
    }

    /// Get byte length in packet, including the property length prefix.
    #[must_use]
    pub fn bytes(&self) -> usize {
        let len = self.property_len();
        VarInt::width(len) + len
    }

    /// Returns true if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_len() == 0
    }
}

impl EncodePacket for PublishProperties {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let len = self.property_len();
        VarInt::from(len)?.encode(buf)?;
        if let Some(on) = self.payload_format_indicator {
            buf.push(PropertyType::PayloadFormatIndicator as u8);
            BoolData::new(on).encode(buf)?;
        }
        if let Some(interval) = self.message_expiry_interval {
            buf.push(PropertyType::MessageExpiryInterval as u8);
            U32Data::new(interval).encode(buf)?;
        }
        if let Some(alias) = self.topic_alias {
            buf.push(PropertyType::TopicAlias as u8);
            U16Data::new(alias).encode(buf)?;
        }
        if let Some(topic) = &self.response_topic {
            buf.push(PropertyType::ResponseTopic as u8);
            topic.encode(buf)?;
        }
        if let Some(data) = &self.correlation_data {
            buf.push(PropertyType::CorrelationData as u8);
            data.encode(buf)?;
        }
        for id in &self.subscription_identifiers {
            buf.push(PropertyType::SubscriptionIdentifier as u8);
            VarInt::from(*id as usize)?.encode(buf)?;
        }
        if let Some(content_type) = &self.content_type {
            buf.push(PropertyType::ContentType as u8);
            content_type.encode(buf)?;
        }
        for pair in &self.user_properties {
            buf.push(PropertyType::UserProperty as u8);
            pair.encode(buf)?;
        }
        Ok(VarInt::width(len) + len)
    }
}

impl DecodePacket for PublishProperties {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let end = decode_property_len(ba)?;
        let mut properties = Self::default();
        while ba.offset() < end {
            let property_type = PropertyType::try_from(ba.read_byte()?)?;
            match property_type {
                PropertyType::PayloadFormatIndicator => {
                    if properties.payload_format_indicator.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.payload_format_indicator = Some(BoolData::decode(ba)?.value());
                }
                PropertyType::MessageExpiryInterval => {
                    if properties.message_expiry_interval.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.message_expiry_interval = Some(U32Data::decode(ba)?.value());
                }
                PropertyType::TopicAlias => {
                    if properties.topic_alias.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    let alias = U16Data::decode(ba)?.value();
                    if alias == 0 {
                        return Err(DecodeError::InvalidPropertyValue);
                    }
                    properties.topic_alias = Some(alias);
                }
                PropertyType::ResponseTopic => {
                    if properties.response_topic.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.response_topic = Some(StringData::decode(ba)?);
                }
                PropertyType::CorrelationData => {
                    if properties.correlation_data.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.correlation_data = Some(BinaryData::decode(ba)?);
                }
                PropertyType::SubscriptionIdentifier => {
                    let id = VarInt::decode(ba)?;
                    if id.is_empty() {
                        return Err(DecodeError::InvalidPropertyValue);
                    }
                    #[allow(clippy::cast_possible_truncation)]
                    properties.subscription_identifiers.push(id.value() as u32);
                }
                PropertyType::ContentType => {
                    if properties.content_type.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.content_type = Some(StringData::decode(ba)?);
                }
                PropertyType::UserProperty => {
                    properties.user_properties.push(StringPairData::decode(ba)?);
                }
                property_type => {
                    log::error!("publish: property {property_type:?} is not valid here");
                    return Err(DecodeError::InvalidPropertyType);
                }
            }
        }
        check_property_end(ba, end)?;
        Ok(properties)
    }
}

/// Properties shared by the acknowledgement packets: PUBACK, PUBREC,
/// PUBREL, PUBCOMP, SUBACK and UNSUBACK.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AckProperties {
    reason_string: Option<StringData>,
    user_properties: Vec<StringPairData>,
}

impl AckProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The sender uses the reason string to give additional, human readable
    /// information to the receiver. It SHOULD NOT be parsed.
    ///
    /// # Errors
    ///
    /// Returns error if `reason` is not a valid MQTT string.
    pub fn set_reason_string(
        &mut self,
        reason: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.reason_string = match reason {
            Some(reason) => Some(StringData::from(reason).map_err(|_e| {
                ConstructionError::new("reason_string", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn reason_string(&self) -> Option<&str> {
        self.reason_string.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `key` or `value` is not a valid MQTT string.
    pub fn add_user_property(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, ConstructionError> {
        let pair = StringPairData::new(key, value).map_err(|_e| {
            ConstructionError::new("user_properties", "not a valid MQTT string pair")
        })?;
        self.user_properties.push(pair);
        Ok(self)
    }

    #[must_use]
    pub fn user_properties(&self) -> &[StringPairData] {
        &self.user_properties
    }

    fn property_len(&self) -> usize {
        let mut len = 0;
        if let Some(reason) = &self.reason_string {
            len += PropertyType::bytes() + reason.bytes();
        }
        for pair in &self.user_properties {
            len += PropertyType::bytes() + pair.bytes();
        }
        len
    }

    /// Get byte length in packet, including the property length prefix.
    #[must_use]
    pub fn bytes(&self) -> usize {
        let len = self.property_len();
        VarInt::width(len) + len
    }

    /// Returns true if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_len() == 0
    }
}

impl EncodePacket for AckProperties {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let len = self.property_len();
        VarInt::from(len)?.encode(buf)?;
        if let Some(reason) = &self.reason_string {
            buf.push(PropertyType::ReasonString as u8);
            reason.encode(buf)?;
        }
        for pair in &self.user_properties {
            buf.push(PropertyType::UserProperty as u8);
            pair.encode(buf)?;
        }
        Ok(VarInt::width(len) + len)
    }
}

impl DecodePacket for AckProperties {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let end = decode_property_len(ba)?;
        let mut properties = Self::default();
        while ba.offset() < end {
            let property_type = PropertyType::try_from(ba.read_byte()?)?;
            match property_type {
                PropertyType::ReasonString => {
                    if properties.reason_string.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.reason_string = Some(StringData::decode(ba)?);
                }
                PropertyType::UserProperty => {
                    properties.user_properties.push(StringPairData::decode(ba)?);
                }
                property_type => {
                    log::error!("ack: property {property_type:?} is not valid here");
                    return Err(DecodeError::InvalidPropertyType);
                }
            }
        }
        check_property_end(ba, end)?;
        Ok(properties)
    }
}

/// Properties in the SUBSCRIBE packet variable header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubscribeProperties {
    subscription_identifier: Option<u32>,
    user_properties: Vec<StringPairData>,
}

impl SubscribeProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The subscription identifier is stored with the subscriptions this
    /// packet creates. It can have the value of 1 to 268,435,455; it is a
    /// protocol error for it to be 0 or to appear more than once.
    ///
    /// # Errors
    ///
    /// Returns error if `id` is zero or larger than 268,435,455.
    pub fn set_subscription_identifier(
        &mut self,
        id: Option<u32>,
    ) -> Result<&mut Self, ConstructionError> {
        if let Some(id) = id {
            if id == 0 || id as usize > MAX_PACKET_LEN {
                return Err(ConstructionError::new(
                    "subscription_identifier",
                    "must be between 1 and 268435455",
                ));
            }
        }
        self.subscription_identifier = id;
        Ok(self)
    }

    #[must_use]
    pub const fn subscription_identifier(&self) -> Option<u32> {
        self.subscription_identifier
    }

    /// # Errors
    ///
    /// Returns error if `key` or `value` is not a valid MQTT string.
    pub fn add_user_property(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, ConstructionError> {
        let pair = StringPairData::new(key, value).map_err(|_e| {
            ConstructionError::new("user_properties", "not a valid MQTT string pair")
        })?;
        self.user_properties.push(pair);
        Ok(self)
    }

    #[must_use]
    pub fn user_properties(&self) -> &[StringPairData] {
        &self.user_properties
    }

    fn property_len(&self) -> usize {
        let mut len = 0;
        if let Some(id) = self.subscription_identifier {
            len += PropertyType::bytes() + VarInt::width(id as usize);
        }
        for pair in &self.user_properties {
            len += PropertyType::bytes() + pair.bytes();
        }
        len
    }

    /// Get byte length in packet, including the property length prefix.
    #[must_use]
    pub fn bytes(&self) -> usize {
        let len = self.property_len();
        VarInt::width(len) + len
    }

    /// Returns true if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_len() == 0
    }
}

impl EncodePacket for SubscribeProperties {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let len = self.property_len();
        VarInt::from(len)?.encode(buf)?;
        if let Some(id) = self.subscription_identifier {
            buf.push(PropertyType::SubscriptionIdentifier as u8);
            VarInt::from(id as usize)?.encode(buf)?;
        }
        for pair in &self.user_properties {
            buf.push(PropertyType::UserProperty as u8);
            pair.encode(buf)?;
        }
        Ok(VarInt::width(len) + len)
    }
}

impl DecodePacket for SubscribeProperties {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let end = decode_property_len(ba)?;
        let mut properties = Self::default();
        while ba.offset() < end {
            let property_type = PropertyType::try_from(ba.read_byte()?)?;
            match property_type {
                PropertyType::SubscriptionIdentifier => {
                    if properties.subscription_identifier.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    let id = VarInt::decode(ba)?;
                    if id.is_empty() {
                        return Err(DecodeError::InvalidPropertyValue);
                    }
                    #[allow(clippy::cast_possible_truncation)]
                    {
                        properties.subscription_identifier = Some(id.value() as u32);
                    }
                }
                PropertyType::UserProperty => {
                    properties.user_properties.push(StringPairData::decode(ba)?);
                }
                property_type => {
                    log::error!("subscribe: property {property_type:?} is not valid here");
                    return Err(DecodeError::InvalidPropertyType);
                }
            }
        }
        check_property_end(ba, end)?;
        Ok(properties)
    }
}

/// Properties in the UNSUBSCRIBE packet variable header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnsubscribeProperties {
    user_properties: Vec<StringPairData>,
}

impl UnsubscribeProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns error if `key` or `value` is not a valid MQTT string.
    pub fn add_user_property(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, ConstructionError> {
        let pair = StringPairData::new(key, value).map_err(|_e| {
            ConstructionError::new("user_properties", "not a valid MQTT string pair")
        })?;
        self.user_properties.push(pair);
        Ok(self)
    }

    #[must_use]
    pub fn user_properties(&self) -> &[StringPairData] {
        &self.user_properties
    }

    fn property_len(&self) -> usize {
        self.user_properties
            .iter()
            .map(|pair| PropertyType::bytes() + pair.bytes())
            .sum()
    }

    /// Get byte length in packet, including the property length prefix.
    #[must_use]
    pub fn bytes(&self) -> usize {
        let len = self.property_len();
        VarInt::width(len) + len
    }

    /// Returns true if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_len() == 0
    }
}

impl EncodePacket for UnsubscribeProperties {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let len = self.property_len();
        VarInt::from(len)?.encode(buf)?;
        for pair in &self.user_properties {
            buf.push(PropertyType::UserProperty as u8);
            pair.encode(buf)?;
        }
        Ok(VarInt::width(len) + len)
    }
}

impl DecodePacket for UnsubscribeProperties {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let end = decode_property_len(ba)?;
        let mut properties = Self::default();
        while ba.offset() < end {
            let property_type = PropertyType::try_from(ba.read_byte()?)?;
            match property_type {
                PropertyType::UserProperty => {
                    properties.user_properties.push(StringPairData::decode(ba)?);
                }
                property_type => {
                    log::error!("unsubscribe: property {property_type:?} is not valid here");
                    return Err(DecodeError::InvalidPropertyType);
                }
            }
        }
        check_property_end(ba, end)?;
        Ok(properties)
    }
}

/// Properties in the DISCONNECT packet variable header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisconnectProperties {
    session_expiry_interval: Option<u32>,
    reason_string: Option<StringData>,
    server_reference: Option<StringData>,
    user_properties: Vec<StringPairData>,
}

impl DisconnectProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_session_expiry_interval(&mut self, interval: Option<u32>) -> &mut Self {
        self.session_expiry_interval = interval;
        self
    }

    #[must_use]
    pub const fn session_expiry_interval(&self) -> Option<u32> {
        self.session_expiry_interval
    }

    /// # Errors
    ///
    /// Returns error if `reason` is not a valid MQTT string.
    pub fn set_reason_string(
        &mut self,
        reason: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.reason_string = match reason {
            Some(reason) => Some(StringData::from(reason).map_err(|_e| {
                ConstructionError::new("reason_string", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn reason_string(&self) -> Option<&str> {
        self.reason_string.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `reference` is not a valid MQTT string.
    pub fn set_server_reference(
        &mut self,
        reference: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.server_reference = match reference {
            Some(reference) => Some(StringData::from(reference).map_err(|_e| {
                ConstructionError::new("server_reference", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn server_reference(&self) -> Option<&str> {
        self.server_reference.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `key` or `value` is not a valid MQTT string.
    pub fn add_user_property(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, ConstructionError> {
        let pair = StringPairData::new(key, value).map_err(|_e| {
            ConstructionError::new("user_properties", "not a valid MQTT string pair")
        })?;
        self.user_properties.push(pair);
        Ok(self)
    }

    #[must_use]
    pub fn user_properties(&self) -> &[StringPairData] {
        &self.user_properties
    }

    fn property_len(&self) -> usize {
        let mut len = 0;
        if self.session_expiry_interval.is_some() {
            len += PropertyType::bytes() + U32Data::bytes();
        }
        if let Some(reason) = &self.reason_string {
            len += PropertyType::bytes() + reason.bytes();
        }
        if let Some(reference) = &self.server_reference {
            len += PropertyType::bytes() + reference.bytes();
        }
        for pair in &self.user_properties {
            len += PropertyType::bytes() + pair.bytes();
        }
        len
    }

    /// Get byte length in packet, including the property length prefix.
    #[must_use]
    pub fn bytes(&self) -> usize {
        let len = self.property_len();
        VarInt::width(len) + len
    }

    /// Returns true if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_len() == 0
    }
}

impl EncodePacket for DisconnectProperties {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let len = self.property_len();
        VarInt::from(len)?.encode(buf)?;
        if let Some(interval) = self.session_expiry_interval {
            buf.push(PropertyType::SessionExpiryInterval as u8);
            U32Data::new(interval).encode(buf)?;
        }
        if let Some(reason) = &self.reason_string {
            buf.push(PropertyType::ReasonString as u8);
            reason.encode(buf)?;
        }
        if let Some(reference) = &self.server_reference {
            buf.push(PropertyType::ServerReference as u8);
            reference.encode(buf)?;
        }
        for pair in &self.user_properties {
            buf.push(PropertyType::UserProperty as u8);
            pair.encode(buf)?;
        }
        Ok(VarInt::width(len) + len)
    }
}

impl DecodePacket for DisconnectProperties {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let end = decode_property_len(ba)?;
        let mut properties = Self::default();
        while ba.offset() < end {
            let property_type = PropertyType::try_from(ba.read_byte()?)?;
            match property_type {
                PropertyType::SessionExpiryInterval => {
                    if properties.session_expiry_interval.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.session_expiry_interval = Some(U32Data::decode(ba)?.value());
                }
                PropertyType::ReasonString => {
                    if properties.reason_string.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.reason_string = Some(StringData::decode(ba)?);
                }
                PropertyType::ServerReference => {
                    if properties.server_reference.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.server_reference = Some(StringData::decode(ba)?);
                }
                PropertyType::UserProperty => {
                    properties.user_properties.push(StringPairData::decode(ba)?);
                }
                property_type => {
                    log::error!("disconnect: property {property_type:?} is not valid here");
                    return Err(DecodeError::InvalidPropertyType);
                }
            }
        }
        check_property_end(ba, end)?;
        Ok(properties)
    }
}

/// Properties in the AUTH packet variable header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthProperties {
    authentication_method: Option<StringData>,
    authentication_data: Option<BinaryData>,
    reason_string: Option<StringData>,
    user_properties: Vec<StringPairData>,
}

impl AuthProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns error if `method` is not a valid MQTT string.
    pub fn set_authentication_method(
        &mut self,
        method: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.authentication_method = match method {
            Some(method) => Some(StringData::from(method).map_err(|_e| {
                ConstructionError::new("authentication_method", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn authentication_method(&self) -> Option<&str> {
        self.authentication_method.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `data` is longer than 65535 bytes.
    pub fn set_authentication_data(
        &mut self,
        data: Option<&[u8]>,
    ) -> Result<&mut Self, ConstructionError> {
        self.authentication_data = match data {
            Some(data) => Some(BinaryData::from_slice(data).map_err(|_e| {
                ConstructionError::new("authentication_data", "longer than 65535 bytes")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn authentication_data(&self) -> Option<&[u8]> {
        self.authentication_data.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `reason` is not a valid MQTT string.
    pub fn set_reason_string(
        &mut self,
        reason: Option<&str>,
    ) -> Result<&mut Self, ConstructionError> {
        self.reason_string = match reason {
            Some(reason) => Some(StringData::from(reason).map_err(|_e| {
                ConstructionError::new("reason_string", "not a valid MQTT string")
            })?),
            None => None,
        };
        Ok(self)
    }

    #[must_use]
    pub fn reason_string(&self) -> Option<&str> {
        self.reason_string.as_ref().map(AsRef::as_ref)
    }

    /// # Errors
    ///
    /// Returns error if `key` or `value` is not a valid MQTT string.
    pub fn add_user_property(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<&mut Self, ConstructionError> {
        let pair = StringPairData::new(key, value).map_err(|_e| {
            ConstructionError::new("user_properties", "not a valid MQTT string pair")
        })?;
        self.user_properties.push(pair);
        Ok(self)
    }

    #[must_use]
    pub fn user_properties(&self) -> &[StringPairData] {
        &self.user_properties
    }

    fn property_len(&self) -> usize {
        let mut len = 0;
        if let Some(method) = &self.authentication_method {
            len += PropertyType::bytes() + method.bytes();
        }
        if let Some(data) = &self.authentication_data {
            len += PropertyType::bytes() + data.bytes();
        }
        if let Some(reason) = &self.reason_string {
            len += PropertyType::bytes() + reason.bytes();
        }
        for pair in &self.user_properties {
            len += PropertyType::bytes() + pair.bytes();
        }
        len
    }

    /// Get byte length in packet, including the property length prefix.
    #[must_use]
    pub fn bytes(&self) -> usize {
        let len = self.property_len();
        VarInt::width(len) + len
    }

    /// Returns true if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.property_len() == 0
    }
}

impl EncodePacket for AuthProperties {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let len = self.property_len();
        VarInt::from(len)?.encode(buf)?;
        if let Some(method) = &self.authentication_method {
            buf.push(PropertyType::AuthenticationMethod as u8);
            method.encode(buf)?;
        }
        if let Some(data) = &self.authentication_data {
            buf.push(PropertyType::AuthenticationData as u8);
            data.encode(buf)?;
        }
        if let Some(reason) = &self.reason_string {
            buf.push(PropertyType::ReasonString as u8);
            reason.encode(buf)?;
        }
        for pair in &self.user_properties {
            buf.push(PropertyType::UserProperty as u8);
            pair.encode(buf)?;
        }
        Ok(VarInt::width(len) + len)
    }
}

impl DecodePacket for AuthProperties {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let end = decode_property_len(ba)?;
        let mut properties = Self::default();
        while ba.offset() < end {
            let property_type = PropertyType::try_from(ba.read_byte()?)?;
            match property_type {
                PropertyType::AuthenticationMethod => {
                    if properties.authentication_method.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.authentication_method = Some(StringData::decode(ba)?);
                }
                PropertyType::AuthenticationData => {
                    if properties.authentication_data.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.authentication_data = Some(BinaryData::decode(ba)?);
                }
                PropertyType::ReasonString => {
                    if properties.reason_string.is_some() {
                        return Err(DecodeError::DuplicateProperty);
                    }
                    properties.reason_string = Some(StringData::decode(ba)?);
                }
                PropertyType::UserProperty => {
                    properties.user_properties.push(StringPairData::decode(ba)?);
                }
                property_type => {
                    log::error!("auth: property {property_type:?} is not valid here");
                    return Err(DecodeError::InvalidPropertyType);
                }
            }
        }
        check_property_end(ba, end)?;
        Ok(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_block_is_one_byte() {
        let properties = ConnectProperties::new();
        assert!(properties.is_empty());
        assert_eq!(properties.bytes(), 1);

        let mut buf = Vec::new();
        properties.encode(&mut buf).unwrap();
        assert_eq!(&buf, &[0x00]);
    }

    #[test]
    fn test_user_properties_keep_order_and_duplicates() {
        let mut properties = AckProperties::new();
        properties.add_user_property("k", "v1").unwrap();
        properties.add_user_property("k", "v2").unwrap();
        properties.add_user_property("a", "b").unwrap();

        let mut buf = Vec::new();
        properties.encode(&mut buf).unwrap();

        let mut ba = ByteArray::new(&buf);
        let decoded = AckProperties::decode(&mut ba).unwrap();
        assert_eq!(decoded, properties);
        assert_eq!(decoded.user_properties()[0].value(), "v1");
        assert_eq!(decoded.user_properties()[1].value(), "v2");
        assert_eq!(decoded.user_properties()[2].key(), "a");
    }

    #[test]
    fn test_duplicate_property_rejected() {
        // Two session expiry intervals.
        let buf = [0x0a, 0x11, 0x00, 0x00, 0x00, 0x01, 0x11, 0x00, 0x00, 0x00, 0x02];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(
            ConnectProperties::decode(&mut ba),
            Err(DecodeError::DuplicateProperty)
        );
    }

    #[test]
    fn test_illegal_property_rejected() {
        // Topic alias (0x23) is not valid in CONNECT.
        let buf = [0x03, 0x23, 0xff, 0xff];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(
            ConnectProperties::decode(&mut ba),
            Err(DecodeError::InvalidPropertyType)
        );
    }

    #[test]
    fn test_zero_topic_alias_rejected() {
        let buf = [0x03, 0x23, 0x00, 0x00];
        let mut ba = ByteArray::new(&buf);
        assert_eq!(
            PublishProperties::decode(&mut ba),
            Err(DecodeError::InvalidPropertyValue)
        );
    }

    #[test]
    fn test_absent_is_not_zero() {
        let mut sent_as_zero = ConnectProperties::new();
        sent_as_zero.set_session_expiry_interval(Some(0));
        let absent = ConnectProperties::new();
        assert_ne!(sent_as_zero, absent);
        assert_eq!(sent_as_zero.bytes(), 6);
        assert_eq!(absent.bytes(), 1);
    }
}
