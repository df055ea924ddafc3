// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use std::convert::TryFrom;

use crate::base::{DecodePacket, EncodePacket, QoS};
use crate::byte_array::ByteArray;
use crate::error::{DecodeError, EncodeError};

/// Structure of `ConnectFlags` is:
/// ```text
///         7               6              5          4-3          2            1            0
/// +---------------+---------------+-------------+----------+-----------+-------------+----------+
/// | Username Flag | Password Flag | Will Retain | Will QoS | Will Flag | Clean Start | Reserved |
/// +---------------+---------------+-------------+----------+-----------+-------------+----------+
/// ```
#[allow(clippy::struct_excessive_bools)]
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectFlags {
    /// Specifies whether a username is present in the payload.
    has_username: bool,

    /// Specifies whether a password is present in the payload.
    ///
    /// If the User Name Flag is set to 0, the Password Flag MUST be set
    /// to 0 [MQTT-3.1.2-22].
    has_password: bool,

    /// Specifies if the will message is to be retained when it is
    /// published. Must be false if the will flag is false.
    will_retain: bool,

    /// `QoS` level to be used when publishing the will message.
    will_qos: QoS,

    /// If set, a will message is stored on the server and published when
    /// the network connection is closed abnormally.
    will: bool,

    /// If set, the client and server discard any existing session and
    /// start a new one.
    clean_start: bool,
}

impl ConnectFlags {
    pub const fn new(
        has_username: bool,
        has_password: bool,
        will_retain: bool,
        will_qos: QoS,
        will: bool,
        clean_start: bool,
    ) -> Self {
        Self {
            has_username,
            has_password,
            will_retain,
            will_qos,
            will,
            clean_start,
        }
    }

    /// Get byte length in packet.
    #[must_use]
    #[inline]
    pub const fn bytes() -> usize {
        1
    }

    #[must_use]
    #[inline]
    pub const fn has_username(&self) -> bool {
        self.has_username
    }

    #[must_use]
    #[inline]
    pub const fn has_password(&self) -> bool {
        self.has_password
    }

    #[must_use]
    #[inline]
    pub const fn will_retain(&self) -> bool {
        self.will_retain
    }

    #[must_use]
    #[inline]
    pub const fn will_qos(&self) -> QoS {
        self.will_qos
    }

    #[must_use]
    #[inline]
    pub const fn will(&self) -> bool {
        self.will
    }

    #[must_use]
    #[inline]
    pub const fn clean_start(&self) -> bool {
        self.clean_start
    }
}

impl Default for ConnectFlags {
    fn default() -> Self {
        Self {
            has_username: false,
            has_password: false,
            will_retain: false,
            will_qos: QoS::AtMostOnce,
            will: false,
            clean_start: true,
        }
    }
}

impl EncodePacket for ConnectFlags {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
        let mut flags = 0b0000_0000;
        if self.has_username {
            flags |= 0b1000_0000;
        }
        if self.has_password {
            flags |= 0b0100_0000;
        }
        if self.will_retain {
            flags |= 0b0010_0000;
        }
        flags |= match self.will_qos {
            QoS::AtMostOnce => 0b0000_0000,
            QoS::AtLeastOnce => 0b0000_1000,
            QoS::ExactOnce => 0b0001_0000,
        };
        if self.will {
            flags |= 0b0000_0100;
        }
        if self.clean_start {
            flags |= 0b0000_0010;
        }
        buf.push(flags);

        Ok(Self::bytes())
    }
}

impl DecodePacket for ConnectFlags {
    fn decode(ba: &mut ByteArray) -> Result<Self, DecodeError> {
        let flags = ba.read_byte()?;
        let has_username = flags & 0b1000_0000 == 0b1000_0000;
        let has_password = flags & 0b0100_0000 == 0b0100_0000;
        let will_retain = flags & 0b0010_0000 == 0b0010_0000;
        let will_qos = QoS::try_from((flags & 0b0001_1000) >> 3)?;
        let will = flags & 0b0000_0100 == 0b0000_0100;
        let clean_start = flags & 0b0000_0010 == 0b0000_0010;

        // The server MUST validate that the reserved flag in the CONNECT
        // packet is set to zero [MQTT-3.1.2-3].
        if flags & 0b0000_0001 != 0b0000_0000 {
            return Err(DecodeError::InvalidConnectFlags);
        }

        // If the User Name Flag is set to 0, the Password Flag MUST be set
        // to 0 [MQTT-3.1.2-22].
        if !has_username && has_password {
            return Err(DecodeError::InvalidConnectFlags);
        }

        Ok(Self {
            has_username,
            has_password,
            will_retain,
            will_qos,
            will,
            clean_start,
        })
    }
}
