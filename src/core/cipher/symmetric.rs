//! Passphrase-based symmetric cipher.
//!
//! Each value is sealed into a fixed-layout envelope, hex-encoded on disk:
//!
//! ```text
//! [ IV (16) | salt (16) | HMAC-SHA256 (32) | ciphertext (16k) ]
//! ```
//!
//! The key is derived per value with Argon2id over (passphrase, salt); the
//! first 16 derived bytes key AES-128-CBC, the full 32 bytes key the HMAC.
//! Padding is a legacy scheme (zero filler plus a trailing length byte, see
//! [`pad`]) kept bit-for-bit for compatibility with existing ciphertexts.
//!
//! Decryption distinguishes exactly two failures: `Corrupt` for anything
//! structurally wrong and `Authentication` for a tag mismatch.

use argon2::{Algorithm, Argon2, Params, Version};
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::Cipher;
use crate::error::{CipherError, Result};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type HmacSha256 = Hmac<Sha256>;

const BLOCK_SIZE: usize = 16;
const IV_LEN: usize = 16;
const SALT_LEN: usize = 16;
const TAG_LEN: usize = 32;
const HEADER_LEN: usize = IV_LEN + SALT_LEN + TAG_LEN;

const KEY_LEN: usize = 32;
const AES_KEY_LEN: usize = 16;

const ARGON2_TIME: u32 = 3;
const ARGON2_MEMORY_KIB: u32 = 32 * 1024;
const ARGON2_LANES: u32 = 4;

/// Single-passphrase cipher producing self-contained envelopes.
pub struct SymmetricCipher {
    passphrase: Zeroizing<Vec<u8>>,
}

impl SymmetricCipher {
    pub fn new(passphrase: impl Into<Vec<u8>>) -> SymmetricCipher {
        SymmetricCipher {
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }
}

impl Cipher for SymmetricCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut padded = pad(plaintext.as_bytes(), BLOCK_SIZE);
        let mut buffer = vec![0u8; HEADER_LEN + padded.len()];
        let (header, body) = buffer.split_at_mut(HEADER_LEN);
        let (iv, rest) = header.split_at_mut(IV_LEN);
        let (salt, tag_slot) = rest.split_at_mut(SALT_LEN);

        OsRng
            .try_fill_bytes(salt)
            .map_err(|e| CipherError::Rng(e.to_string()))?;
        let key = derive_key(&self.passphrase, salt)?;
        OsRng
            .try_fill_bytes(iv)
            .map_err(|e| CipherError::Rng(e.to_string()))?;

        let block = Aes128CbcEnc::new_from_slices(&key[..AES_KEY_LEN], iv)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        let padded_len = padded.len();
        let ciphertext = block
            .encrypt_padded_mut::<NoPadding>(&mut padded, padded_len)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        body.copy_from_slice(ciphertext);

        let mut mac = HmacSha256::new_from_slice(&key[..])
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        mac.update(body);
        tag_slot.copy_from_slice(&mac.finalize().into_bytes());

        Ok(hex::encode(buffer))
    }

    fn decrypt(&self, encrypted: &str) -> Result<String> {
        let buffer = hex::decode(encrypted).map_err(|_| CipherError::Corrupt)?;
        let envelope = Envelope::split(&buffer)?;

        let key = derive_key(&self.passphrase, envelope.salt)?;

        let mut mac =
            HmacSha256::new_from_slice(&key[..]).map_err(|_| CipherError::Corrupt)?;
        mac.update(envelope.ciphertext);
        mac.verify_slice(envelope.tag)
            .map_err(|_| CipherError::Authentication)?;

        let mut text = envelope.ciphertext.to_vec();
        let block = Aes128CbcDec::new_from_slices(&key[..AES_KEY_LEN], envelope.iv)
            .map_err(|_| CipherError::Corrupt)?;
        let decrypted = block
            .decrypt_padded_mut::<NoPadding>(&mut text)
            .map_err(|_| CipherError::Corrupt)?;
        let unpadded = unpad(decrypted)?;

        String::from_utf8(unpadded.to_vec()).map_err(|_| CipherError::Corrupt.into())
    }
}

/// Borrowed view over the sections of a decoded envelope.
struct Envelope<'a> {
    iv: &'a [u8],
    salt: &'a [u8],
    tag: &'a [u8],
    ciphertext: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Slice a decoded buffer into envelope sections, validating that the
    /// ciphertext is present and block-aligned.
    fn split(buffer: &'a [u8]) -> std::result::Result<Envelope<'a>, CipherError> {
        if buffer.len() < HEADER_LEN + BLOCK_SIZE
            || (buffer.len() - HEADER_LEN) % BLOCK_SIZE != 0
        {
            return Err(CipherError::Corrupt);
        }
        Ok(Envelope {
            iv: &buffer[..IV_LEN],
            salt: &buffer[IV_LEN..IV_LEN + SALT_LEN],
            tag: &buffer[IV_LEN + SALT_LEN..HEADER_LEN],
            ciphertext: &buffer[HEADER_LEN..],
        })
    }
}

fn derive_key(
    passphrase: &[u8],
    salt: &[u8],
) -> std::result::Result<Zeroizing<[u8; KEY_LEN]>, CipherError> {
    let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_TIME, ARGON2_LANES, Some(KEY_LEN))
        .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase, salt, &mut key[..])
        .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Legacy padding: zero filler plus a trailing pad-size byte.
///
/// `pad_size = block_size - ((len + 1) % block_size)`; the output is
/// `len + pad_size + 1` bytes, the gap is zero-filled, and the last byte
/// records `pad_size`. Not canonical PKCS#7 and not interchangeable with
/// it; existing ciphertexts depend on this exact layout.
fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad_size = block_size - ((data.len() + 1) % block_size);
    let mut padded = vec![0u8; data.len() + pad_size + 1];
    padded[..data.len()].copy_from_slice(data);
    padded[data.len() + pad_size] = pad_size as u8;
    padded
}

/// Inverse of [`pad`]: strip the trailing `pad_size + 1` bytes.
fn unpad(padded: &[u8]) -> std::result::Result<&[u8], CipherError> {
    let last = *padded.last().ok_or(CipherError::Corrupt)?;
    let strip = last as usize + 1;
    if strip > padded.len() {
        return Err(CipherError::Corrupt);
    }
    Ok(&padded[..padded.len() - strip])
}
