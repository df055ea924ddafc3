// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

//! Write/read (roundtrip) consistency over one representative of every
//! packet type.

mod common;

use mqtt5_codec::read;

#[test]
fn test_roundtrip() {
    for packet in common::sample_packets() {
        let buf = packet.write().unwrap();
        let (decoded, consumed) = read(&buf).unwrap();
        assert_eq!(consumed, buf.len(), "consumed length for {packet:?}");
        assert_eq!(decoded, packet);
    }
}

#[test]
fn test_write_is_deterministic() {
    for packet in common::sample_packets() {
        assert_eq!(packet.write().unwrap(), packet.write().unwrap());
    }
}

#[test]
fn test_write_into_matches_write() {
    for packet in common::sample_packets() {
        let allocated = packet.write().unwrap();

        // Appending to a non-empty caller buffer yields the same bytes.
        let mut buf = vec![0xaa, 0xbb];
        let written = packet.write_into(&mut buf).unwrap();
        assert_eq!(written, allocated.len());
        assert_eq!(&buf[2..], &allocated[..]);
    }
}

#[test]
fn test_bytes_reports_wire_size() {
    for packet in common::sample_packets() {
        let buf = packet.write().unwrap();
        assert_eq!(packet.bytes().unwrap(), buf.len(), "bytes() for {packet:?}");
    }
}

#[test]
fn test_equal_values_write_equal_bytes() {
    let packets = common::sample_packets();
    let copies = common::sample_packets();
    for (packet, copy) in packets.iter().zip(copies.iter()) {
        assert_eq!(packet, copy);
        assert_eq!(packet.write().unwrap(), copy.write().unwrap());
    }
}
