// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use crate::base::{DecodePacket, EncodePacket};
use crate::byte_array::ByteArray;
use crate::error::{ConstructionError, DecodeError, EncodeError};
use crate::header::{FixedHeader, PacketType};
use crate::property::AuthProperties;
use crate::reason_code::ReasonCode;
use crate::var_int::VarIntError;

/// An `AuthPacket` is sent from the client to the server or from the server
/// to the client as part of an extended authentication exchange, such as
/// challenge / response authentication.
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
/// is 0x00 (Success) and there are no properties. In this case the AUTH
/// has a remaining length of 0.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthPacket {
    /// Byte 1 in the variable header is the authenticate reason code.
    reason_code: ReasonCode,

    properties: AuthProperties,
}

/// The client or server sending the AUTH packet MUST use one of the
/// authenticate reason codes [MQTT-3.15.2-1].
pub const AUTH_REASONS: &[ReasonCode] = &[
    ReasonCode::Success,
    ReasonCode::ContinueAuthentication,
    ReasonCode::ReAuthenticate,
];

impl AuthPacket {
    /// Create a new auth packet.
    ///
    /// # Errors
    ///
    /// Returns error if `reason_code` is not an AUTH reason code.
    pub fn new(
        reason_code: ReasonCode,
        properties: AuthProperties,
    ) -> Result<Self, ConstructionError> {
        if !AUTH_REASONS.contains(&reason_code) {
            return Err(ConstructionError::new(
                "reason_code",
                "not defined for AUTH packets",
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
    pub const fn properties(&self) -> &AuthProperties {
        &self.properties
    }

    fn get_fixed_header(&self) -> Result<FixedHeader, VarIntError> {
        let mut remaining_length = 0;
        if self.reason_code != ReasonCode::Success || !self.properties.is_empty() {
            remaining_length += ReasonCode::bytes() + self.properties.bytes();
        }
        FixedHeader::new(PacketType::Auth, remaining_length)
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

impl EncodePacket for AuthPacket {
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

impl DecodePacket for AuthPacket {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let fixed_header = FixedHeader::decode(ba)?;
        if fixed_header.packet_type() != PacketType::Auth {
            return Err(DecodeError::InvalidPacketType);
        }

        let remaining_length = fixed_header.remaining_length();
        let (reason_code, properties) = if remaining_length == 0 {
            (ReasonCode::default(), AuthProperties::new())
        } else if remaining_length == ReasonCode::bytes() {
            return Err(DecodeError::InvalidRemainingLength);
        } else {
            let reason_code = ReasonCode::decode(ba)?;
            (reason_code, AuthProperties::decode(ba)?)
        };

        if !AUTH_REASONS.contains(&reason_code) {
            log::error!("auth: invalid reason code {reason_code:?}");
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
        let packet = AuthPacket::new(ReasonCode::Success, AuthProperties::new()).unwrap();
        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        assert_eq!(&buf, &[0xf0, 0x00]);
    }

    #[test]
    fn test_roundtrip_challenge() {
        let mut properties = AuthProperties::new();
        properties.set_authentication_method(Some("SCRAM-SHA-1")).unwrap();
        properties.set_authentication_data(Some(b"challenge")).unwrap();
        let packet = AuthPacket::new(ReasonCode::ContinueAuthentication, properties).unwrap();

        let mut buf = Vec::new();
        packet.encode(&mut buf).unwrap();
        let mut ba = ByteArray::new(&buf);
        assert_eq!(AuthPacket::decode(&mut ba), Ok(packet));
    }
}
