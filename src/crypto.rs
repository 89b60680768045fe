//! Payload encryption for hub commands and status responses
//!
//! The account service hands every hub account a 128-bit AES key; command
//! payloads and status blobs are AES-128-CBC encrypted with PKCS#7 padding.
//! The protocol carries no per-message IV, so encryption is deterministic for
//! a given plaintext and key.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::protocol::{Error, Result};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// AES key length in bytes
pub const KEY_LEN: usize = 16;

/// AES block length in bytes; ciphertext lengths are always a multiple of it
pub const BLOCK_LEN: usize = 16;

// The protocol pins the CBC IV to all zeroes.
const IV: [u8; BLOCK_LEN] = [0u8; BLOCK_LEN];

/// Per-account AES key as delivered by the hub account service
///
/// Passed by reference into every encrypt/decrypt call; the codec never
/// stores or persists it.
#[derive(Clone, PartialEq, Eq)]
pub struct AesKey([u8; KEY_LEN]);

impl AesKey {
    /// Construct from raw key bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Construct from the 32-hex-character string form the account service
    /// delivers
    pub fn from_hex(key: &str) -> Result<Self> {
        let raw = hex::decode(key).map_err(|_| Error::KeyFormat)?;
        let bytes: [u8; KEY_LEN] = raw.try_into().map_err(|_| Error::KeyFormat)?;
        Ok(Self(bytes))
    }

    /// Borrow the raw key bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

// Keep key material out of logs.
impl std::fmt::Debug for AesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AesKey(..)")
    }
}

/// Encrypt a JSON plaintext into payload ciphertext
#[must_use]
pub fn encrypt(plaintext: &str, key: &AesKey) -> Vec<u8> {
    Aes128CbcEnc::new(key.as_bytes().into(), (&IV).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes())
}

/// Decrypt payload ciphertext back into its JSON plaintext
///
/// Fails with [`Error::Decryption`] when the ciphertext does not match the
/// key or is corrupt, and with [`Error::Utf8`] when the decrypted bytes are
/// not UTF-8. Never returns garbage on a clean failure path; callers may
/// parse the returned string as JSON directly.
pub fn decrypt(ciphertext: &[u8], key: &AesKey) -> Result<String> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(Error::Decryption {
            reason: "ciphertext length is not a whole number of blocks",
        });
    }
    let plaintext = Aes128CbcDec::new(key.as_bytes().into(), (&IV).into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| Error::Decryption {
            reason: "bad padding (wrong key or corrupt ciphertext)",
        })?;
    Ok(String::from_utf8(plaintext)?)
}
