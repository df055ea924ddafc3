// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Packet codec for the MQTT 5.0 protocol.
//!
//! This crate converts in-memory control packet values to their wire form
//! and parses byte sequences back into strongly typed packet values. It
//! opens no sockets and keeps no connection state; sessions, keep alive
//! timers, topic matching and retransmission are up to the caller.
//!
//! Reading distinguishes two failure classes: [`DecodeError::Truncated`]
//! means more bytes are needed and the call can simply be repeated with a
//! longer buffer, while every other [`DecodeError`] means the bytes cannot
//! be a legal MQTT 5 packet and the connection has to go.
//!
//! ```
//! use mqtt5_codec::{read, Packet, PingRequestPacket};
//!
//! let packet = Packet::PingRequest(PingRequestPacket::new());
//! let buf = packet.write().unwrap();
//! assert_eq!(&buf, &[0xc0, 0x00]);
//!
//! let (decoded, consumed) = read(&buf).unwrap();
//! assert_eq!(decoded, packet);
//! assert_eq!(consumed, buf.len());
//! ```

mod auth;
mod base;
mod binary_data;
mod bool_data;
mod byte_array;
mod connect;
mod connect_ack;
mod connect_flags;
mod disconnect;
mod error;
mod header;
mod packet;
mod ping_request;
mod ping_response;
mod property;
mod publish;
mod publish_ack;
mod publish_complete;
mod publish_received;
mod publish_release;
mod reason_code;
mod string_data;
mod string_pair_data;
mod subscribe;
mod subscribe_ack;
mod u16_data;
mod u32_data;
mod unsubscribe;
mod unsubscribe_ack;
pub mod utils;
mod var_int;

pub use auth::{AuthPacket, AUTH_REASONS};
pub use base::{DecodePacket, EncodePacket, PacketId, QoS, PROTOCOL_LEVEL, PROTOCOL_NAME};
pub use binary_data::BinaryData;
pub use bool_data::BoolData;
pub use byte_array::ByteArray;
pub use connect::{ConnectPacket, Will};
pub use connect_ack::{ConnectAckPacket, CONNECT_ACK_REASONS};
pub use disconnect::{DisconnectPacket, DISCONNECT_REASONS};
pub use error::{ConstructionError, DecodeError, EncodeError};
pub use header::{FixedHeader, PacketType};
pub use packet::{read, read_limited, Packet};
pub use ping_request::PingRequestPacket;
pub use ping_response::PingResponsePacket;
pub use property::{
    AckProperties, AuthProperties, ConnectAckProperties, ConnectProperties,
    DisconnectProperties, PropertyType, PublishProperties, SubscribeProperties,
    UnsubscribeProperties, WillProperties,
};
pub use publish::PublishPacket;
pub use publish_ack::{PublishAckPacket, PUBLISH_ACK_REASONS};
pub use publish_complete::{PublishCompletePacket, PUBLISH_COMPLETE_REASONS};
pub use publish_received::{PublishReceivedPacket, PUBLISH_RECEIVED_REASONS};
pub use publish_release::{PublishReleasePacket, PUBLISH_RELEASE_REASONS};
pub use reason_code::ReasonCode;
pub use string_data::StringData;
pub use string_pair_data::StringPairData;
pub use subscribe::{RetainHandling, SubscribePacket, SubscribeTopic};
pub use subscribe_ack::{SubscribeAckPacket, SUBSCRIBE_ACK_REASONS};
pub use u16_data::U16Data;
pub use u32_data::U32Data;
pub use unsubscribe::UnsubscribePacket;
pub use unsubscribe_ack::{UnsubscribeAckPacket, UNSUBSCRIBE_ACK_REASONS};
pub use var_int::{VarInt, VarIntError, MAX_PACKET_LEN};
