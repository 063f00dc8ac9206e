//! Credential codec for the `Taosd` authorization scheme.
//!
//! # Wire Format
//! ```text
//! plaintext (48 bytes):
//!     [ user zone: 24 bytes ][ password zone: 24 bytes ]
//!     each field written from the start of its zone, remainder zero-filled
//!
//! ciphertext (48 bytes):
//!     six 8-byte DES sub-blocks, each encrypted on its own (ECB)
//!     → standard base64 (padded)
//! ```
//!
//! # Design Decisions
//! - Sub-blocks are never chained: sub-block N decrypts to plaintext bytes
//!   `N*8..N*8+8` regardless of its neighbours. This is the wire format.
//! - The key is fixed at construction; there is no way to swap it later.
//! - Trailing zero bytes are stripped from each zone on decode, so a
//!   credential that really ends in NUL bytes loses them. Known limitation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use des::cipher::generic_array::GenericArray;
use des::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use des::Des;
use thiserror::Error;

/// Size of one credential zone (user or password) in bytes.
pub const CREDENTIAL_FIELD_LEN: usize = 24;

/// Size of a full encrypted credential block in bytes.
pub const ENCRYPTED_BLOCK_LEN: usize = 2 * CREDENTIAL_FIELD_LEN;

/// Size of one DES sub-block.
pub const SUB_BLOCK_LEN: usize = 8;

/// Built-in DES key shared with every `Taosd` client.
pub const DEFAULT_KEY: [u8; 8] = [64, 182, 122, 48, 86, 115, 253, 68];

/// Errors produced while encoding or decoding a credential block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A field or the decoded block has the wrong size.
    #[error("invalid {what} length: {len} bytes")]
    InvalidLength { what: &'static str, len: usize },

    /// The token is not valid base64, or the plaintext is not valid UTF-8.
    #[error("malformed credential encoding: {0}")]
    MalformedEncoding(String),
}

/// Encodes `(user, password)` pairs to and from `Taosd` tokens.
///
/// Holds only the keyed cipher, so one instance can be shared behind an
/// `Arc` by every request worker.
#[derive(Clone)]
pub struct CredentialCodec {
    cipher: Des,
}

impl CredentialCodec {
    /// Create a codec keyed with `key`.
    pub fn new(key: [u8; 8]) -> Self {
        Self {
            cipher: Des::new(GenericArray::from_slice(&key)),
        }
    }

    /// Encode a credential pair into a base64 `Taosd` token.
    pub fn encode(&self, user: &str, password: &str) -> Result<String, CodecError> {
        if user.len() > CREDENTIAL_FIELD_LEN {
            return Err(CodecError::InvalidLength {
                what: "user",
                len: user.len(),
            });
        }
        if password.len() > CREDENTIAL_FIELD_LEN {
            return Err(CodecError::InvalidLength {
                what: "password",
                len: password.len(),
            });
        }

        let mut block = [0u8; ENCRYPTED_BLOCK_LEN];
        block[..user.len()].copy_from_slice(user.as_bytes());
        block[CREDENTIAL_FIELD_LEN..CREDENTIAL_FIELD_LEN + password.len()]
            .copy_from_slice(password.as_bytes());

        Ok(STANDARD.encode(self.encrypt_block(block)))
    }

    /// Decode a base64 `Taosd` token back into `(user, password)`.
    pub fn decode(&self, token: &str) -> Result<(String, String), CodecError> {
        let raw = STANDARD
            .decode(token)
            .map_err(|e| CodecError::MalformedEncoding(e.to_string()))?;

        let block: [u8; ENCRYPTED_BLOCK_LEN] =
            raw.as_slice()
                .try_into()
                .map_err(|_| CodecError::InvalidLength {
                    what: "encrypted block",
                    len: raw.len(),
                })?;

        let plain = self.decrypt_block(block);
        let (user_zone, password_zone) = plain.split_at(CREDENTIAL_FIELD_LEN);

        Ok((unpad(user_zone)?, unpad(password_zone)?))
    }

    /// Encrypt a 48-byte plaintext, one sub-block at a time.
    pub fn encrypt_block(&self, mut block: [u8; ENCRYPTED_BLOCK_LEN]) -> [u8; ENCRYPTED_BLOCK_LEN] {
        for chunk in block.chunks_exact_mut(SUB_BLOCK_LEN) {
            self.cipher.encrypt_block(GenericArray::from_mut_slice(chunk));
        }
        block
    }

    /// Decrypt a 48-byte ciphertext, one sub-block at a time.
    pub fn decrypt_block(&self, mut block: [u8; ENCRYPTED_BLOCK_LEN]) -> [u8; ENCRYPTED_BLOCK_LEN] {
        for chunk in block.chunks_exact_mut(SUB_BLOCK_LEN) {
            self.cipher.decrypt_block(GenericArray::from_mut_slice(chunk));
        }
        block
    }
}

impl Default for CredentialCodec {
    fn default() -> Self {
        Self::new(DEFAULT_KEY)
    }
}

impl std::fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCodec").finish_non_exhaustive()
    }
}

/// Strip trailing zero padding from a zone.
fn unpad(zone: &[u8]) -> Result<String, CodecError> {
    let end = zone.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8(zone[..end].to_vec())
        .map_err(|e| CodecError::MalformedEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub_block(block: &[u8; ENCRYPTED_BLOCK_LEN], n: usize) -> &[u8] {
        &block[n * SUB_BLOCK_LEN..(n + 1) * SUB_BLOCK_LEN]
    }

    #[test]
    fn round_trip() {
        let codec = CredentialCodec::default();
        let cases = [
            ("root", "taosdata"),
            ("alice", "secret"),
            ("", ""),
            ("a", "b"),
            ("exactly_twenty_four_byte", "pässwörd"),
        ];
        for (user, password) in cases {
            let token = codec.encode(user, password).unwrap();
            let (u, p) = codec.decode(&token).unwrap();
            assert_eq!((u.as_str(), p.as_str()), (user, password));
        }
    }

    #[test]
    fn token_is_48_bytes_of_base64() {
        let codec = CredentialCodec::default();
        let token = codec.encode("root", "taosdata").unwrap();
        assert_eq!(token.len(), 64);
        assert_eq!(STANDARD.decode(&token).unwrap().len(), ENCRYPTED_BLOCK_LEN);
    }

    #[test]
    fn encode_rejects_long_fields() {
        let codec = CredentialCodec::default();
        let long = "x".repeat(25);

        assert_eq!(
            codec.encode(&long, "pw"),
            Err(CodecError::InvalidLength { what: "user", len: 25 })
        );
        assert_eq!(
            codec.encode("user", &long),
            Err(CodecError::InvalidLength { what: "password", len: 25 })
        );
    }

    #[test]
    fn decode_rejects_wrong_length_before_decrypting() {
        let codec = CredentialCodec::default();
        for len in [0, 8, 40, 47, 49, 56] {
            let token = STANDARD.encode(vec![0u8; len]);
            assert_eq!(
                codec.decode(&token),
                Err(CodecError::InvalidLength { what: "encrypted block", len })
            );
        }
    }

    #[test]
    fn decode_rejects_bad_base64() {
        let codec = CredentialCodec::default();
        assert!(matches!(
            codec.decode("not base64!"),
            Err(CodecError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn sub_blocks_are_independent() {
        let codec = CredentialCodec::default();
        // 16 identical bytes fill sub-blocks 0 and 1; the empty password
        // leaves sub-blocks 3..6 all zero.
        let cipher = STANDARD
            .decode(codec.encode("aaaaaaaaaaaaaaaa", "").unwrap())
            .unwrap();
        let cipher: [u8; ENCRYPTED_BLOCK_LEN] = cipher.try_into().unwrap();

        assert_eq!(sub_block(&cipher, 0), sub_block(&cipher, 1));
        assert_eq!(sub_block(&cipher, 3), sub_block(&cipher, 4));
        assert_eq!(sub_block(&cipher, 4), sub_block(&cipher, 5));
        assert_ne!(sub_block(&cipher, 1), sub_block(&cipher, 2));
    }

    #[test]
    fn corrupting_one_sub_block_only_touches_its_plaintext() {
        let codec = CredentialCodec::default();
        let mut plain = [0u8; ENCRYPTED_BLOCK_LEN];
        plain[..5].copy_from_slice(b"alice");
        plain[24..30].copy_from_slice(b"secret");

        let mut cipher = codec.encrypt_block(plain);
        cipher[4 * SUB_BLOCK_LEN] ^= 0xff;
        let garbled = codec.decrypt_block(cipher);

        assert_eq!(&garbled[..32], &plain[..32]);
        assert_ne!(sub_block(&garbled, 4), sub_block(&plain, 4));
        assert_eq!(&garbled[40..], &plain[40..]);
    }

    #[test]
    fn trailing_nul_is_lost() {
        let codec = CredentialCodec::default();
        let token = codec.encode("bob\0", "pw\0\0").unwrap();
        let (user, password) = codec.decode(&token).unwrap();
        assert_eq!(user, "bob");
        assert_eq!(password, "pw");
    }

    #[test]
    fn different_keys_disagree() {
        let token = CredentialCodec::default().encode("alice", "secret").unwrap();
        let other = CredentialCodec::new([1, 2, 3, 4, 5, 6, 7, 8]);
        assert_ne!(other.decode(&token), Ok(("alice".into(), "secret".into())));
    }
}
