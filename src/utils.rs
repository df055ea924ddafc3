// Copyright (c) 2021 Xu Shaohua <shaohua@biofan.org>. All rights reserved.
// Use of this source is governed by Apache-2.0 License that can be found
// in the LICENSE file.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

use crate::error::EncodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringError {
    /// Byte length is larger than 65535.
    TooManyData,

    /// String contains the null character U+0000.
    InvalidChar,

    /// Bytes are not well-formed UTF-8.
    InvalidUtf8,
}

/// Check string length and characters.
///
/// The character data in a UTF-8 Encoded String MUST be well-formed UTF-8
/// as defined by the Unicode specification and restated in RFC 3629.
/// A UTF-8 Encoded String MUST NOT include an encoding of the null
/// character U+0000 [MQTT-1.5.4-2]. Encodings of code points between
/// U+D800 and U+DFFF cannot occur in a rust string in the first place.
///
/// # Errors
///
/// Returns error if `s` is longer than 65535 bytes or contains U+0000.
pub fn validate_utf8_string(s: &str) -> Result<(), StringError> {
    if s.len() > usize::from(u16::MAX) {
        return Err(StringError::TooManyData);
    }
    if s.chars().any(|c| c == '\u{0000}') {
        return Err(StringError::InvalidChar);
    }
    Ok(())
}

/// Convert byte slice into a checked UTF-8 string.
///
/// # Errors
///
/// Returns error if `bytes` is not a valid UTF-8 string.
pub fn to_utf8_string(bytes: &[u8]) -> Result<String, StringError> {
    let s = String::from_utf8(bytes.to_vec()).map_err(|_e| StringError::InvalidUtf8)?;
    validate_utf8_string(&s)?;
    Ok(s)
}

/// Check that a byte slice fits behind a two byte length prefix.
///
/// # Errors
///
/// Returns error if `data` is longer than 65535 bytes.
pub fn validate_two_bytes_data(data: &[u8]) -> Result<(), EncodeError> {
    if data.len() > usize::from(u16::MAX) {
        return Err(EncodeError::TooManyData);
    }
    Ok(())
}

/// Generate a random alphanumeric client id with `len` characters.
///
/// Useful for clients which connect with an empty client id and expect the
/// server to see a unique one.
#[must_use]
pub fn random_client_id(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_utf8_string() {
        assert!(validate_utf8_string("topic/level").is_ok());
        assert!(validate_utf8_string("").is_ok());
        assert_eq!(
            validate_utf8_string("a\u{0000}b"),
            Err(StringError::InvalidChar)
        );
    }

    #[test]
    fn test_random_client_id() {
        let id = random_client_id(12);
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(char::is_alphanumeric));
    }
}
