// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Cipher modes for bitstream encryption.
//!
//! All modes use AES with a caller-supplied key. The mode decides whether an
//! IV is needed and which key lengths are accepted:
//!
//! | mode      | key bits      | IV bytes | notes                               |
//! |-----------|---------------|----------|-------------------------------------|
//! | `ECB`     | 128, 192, 256 | none     | PKCS#7 padded                       |
//! | `CBC`     | 128, 192, 256 | 16       | PKCS#7 padded                       |
//! | `OFB`     | 128, 192, 256 | 16       | stream mode, length-preserving      |
//! | `GCM-SIV` | 128, 256      | 12       | authenticated, +16 byte tag         |
//!
//! Only GCM-SIV detects a wrong key during decryption. The unauthenticated
//! modes produce garbage that is rejected later by the decompressor.
//!
//! There are no built-in keys or IVs. Keys come from the caller, either
//! directly or through [`derive_key`] (Argon2id over a passphrase and salt).

use core::fmt;
use core::str::FromStr;

use aes::{Aes128, Aes192, Aes256};
use aes_gcm_siv::aead::Aead;
use aes_gcm_siv::{Aes128GcmSiv, Aes256GcmSiv, KeyInit, Nonce};
use argon2::Argon2;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::stego::error::{MethodKind, StegoError};

/// AES block / OFB / CBC IV length in bytes.
pub const BLOCK_IV_LEN: usize = 16;
/// AES-GCM-SIV nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// Minimum Argon2 salt length in bytes.
pub const MIN_SALT_LEN: usize = 8;

/// Symmetric cipher mode tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    Ecb,
    Cbc,
    Ofb,
    GcmSiv,
}

impl CipherMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ecb => "ECB",
            Self::Cbc => "CBC",
            Self::Ofb => "OFB",
            Self::GcmSiv => "GCM-SIV",
        }
    }

    /// Supported key lengths in bits.
    pub fn key_lengths(&self) -> &'static [usize] {
        match self {
            Self::Ecb | Self::Cbc | Self::Ofb => &[128, 192, 256],
            Self::GcmSiv => &[128, 256],
        }
    }

    /// IV length in bytes, 0 for modes that take none.
    pub fn iv_len(&self) -> usize {
        match self {
            Self::Ecb => 0,
            Self::Cbc | Self::Ofb => BLOCK_IV_LEN,
            Self::GcmSiv => NONCE_LEN,
        }
    }

    pub fn requires_iv(&self) -> bool {
        self.iv_len() > 0
    }

    /// Check key and IV against this mode.
    ///
    /// `key_length` is the declared length in bits; it must equal the actual
    /// key size and be one of [`key_lengths`](Self::key_lengths).
    pub fn validate(&self, key: &[u8], key_length: usize, iv: Option<&[u8]>) -> Result<(), StegoError> {
        let actual = key.len() * 8;
        if actual != key_length {
            return Err(StegoError::KeyLengthMismatch { mode: self.name(), expected: key_length, actual });
        }
        let supported = self.key_lengths();
        if !supported.contains(&key_length) {
            let nearest = supported
                .iter()
                .copied()
                .min_by_key(|&len| len.abs_diff(key_length))
                .unwrap_or(128);
            return Err(StegoError::KeyLengthMismatch { mode: self.name(), expected: nearest, actual });
        }

        let expected = self.iv_len();
        match iv {
            None if expected == 0 => Ok(()),
            Some(iv) if iv.len() == expected && expected > 0 => Ok(()),
            other => Err(StegoError::IvMismatch {
                mode: self.name(),
                expected,
                actual: other.map(<[u8]>::len),
            }),
        }
    }

    /// Draw a fresh random IV for this mode, or `None` if it takes no IV.
    pub fn generate_iv<R: RngCore + ?Sized>(&self, rng: &mut R) -> Option<Vec<u8>> {
        if !self.requires_iv() {
            return None;
        }
        let mut iv = vec![0u8; self.iv_len()];
        rng.fill_bytes(&mut iv);
        Some(iv)
    }
}

impl FromStr for CipherMode {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_uppercase().replace(['-', '_'], "");
        match tag.as_str() {
            "ECB" => Ok(Self::Ecb),
            "CBC" => Ok(Self::Cbc),
            "OFB" => Ok(Self::Ofb),
            "GCMSIV" => Ok(Self::GcmSiv),
            _ => Err(StegoError::UnsupportedMethod { kind: MethodKind::Cipher, name: s.to_string() }),
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encrypt `plaintext` under `mode`.
///
/// Key and IV must already satisfy [`CipherMode::validate`]; a mismatch here
/// is reported as [`StegoError::KeyLengthMismatch`] / [`StegoError::IvMismatch`].
pub fn encrypt(mode: CipherMode, plaintext: &[u8], key: &[u8], iv: Option<&[u8]>) -> Result<Vec<u8>, StegoError> {
    mode.validate(key, key.len() * 8, iv)?;
    let iv = iv.unwrap_or_default();
    let out = match mode {
        CipherMode::Ecb => match key.len() {
            16 => ecb_encrypt::<ecb::Encryptor<Aes128>>(key, plaintext),
            24 => ecb_encrypt::<ecb::Encryptor<Aes192>>(key, plaintext),
            _ => ecb_encrypt::<ecb::Encryptor<Aes256>>(key, plaintext),
        },
        CipherMode::Cbc => match key.len() {
            16 => cbc_encrypt::<cbc::Encryptor<Aes128>>(key, iv, plaintext),
            24 => cbc_encrypt::<cbc::Encryptor<Aes192>>(key, iv, plaintext),
            _ => cbc_encrypt::<cbc::Encryptor<Aes256>>(key, iv, plaintext),
        },
        CipherMode::Ofb => {
            let mut buf = plaintext.to_vec();
            ofb_apply(key, iv, &mut buf).map(|()| buf)
        }
        CipherMode::GcmSiv => {
            let nonce = Nonce::from_slice(iv);
            match key.len() {
                16 => Aes128GcmSiv::new_from_slice(key).ok().and_then(|c| c.encrypt(nonce, plaintext).ok()),
                _ => Aes256GcmSiv::new_from_slice(key).ok().and_then(|c| c.encrypt(nonce, plaintext).ok()),
            }
        }
    };
    // Only reachable if the key/IV slipped past validation.
    out.ok_or(StegoError::KeyLengthMismatch { mode: mode.name(), expected: key.len() * 8, actual: key.len() * 8 })
}

/// Decrypt `ciphertext` under `mode`.
///
/// # Errors
/// [`StegoError::DecryptionFailure`] on bad padding (ECB/CBC), a misaligned
/// length, or an authentication failure (GCM-SIV).
pub fn decrypt(mode: CipherMode, ciphertext: &[u8], key: &[u8], iv: Option<&[u8]>) -> Result<Vec<u8>, StegoError> {
    mode.validate(key, key.len() * 8, iv)?;
    let iv = iv.unwrap_or_default();
    let out = match mode {
        CipherMode::Ecb => match key.len() {
            16 => ecb_decrypt::<ecb::Decryptor<Aes128>>(key, ciphertext),
            24 => ecb_decrypt::<ecb::Decryptor<Aes192>>(key, ciphertext),
            _ => ecb_decrypt::<ecb::Decryptor<Aes256>>(key, ciphertext),
        },
        CipherMode::Cbc => match key.len() {
            16 => cbc_decrypt::<cbc::Decryptor<Aes128>>(key, iv, ciphertext),
            24 => cbc_decrypt::<cbc::Decryptor<Aes192>>(key, iv, ciphertext),
            _ => cbc_decrypt::<cbc::Decryptor<Aes256>>(key, iv, ciphertext),
        },
        CipherMode::Ofb => {
            let mut buf = ciphertext.to_vec();
            ofb_apply(key, iv, &mut buf).map(|()| buf)
        }
        CipherMode::GcmSiv => {
            let nonce = Nonce::from_slice(iv);
            match key.len() {
                16 => Aes128GcmSiv::new_from_slice(key).ok().and_then(|c| c.decrypt(nonce, ciphertext).ok()),
                _ => Aes256GcmSiv::new_from_slice(key).ok().and_then(|c| c.decrypt(nonce, ciphertext).ok()),
            }
        }
    };
    out.ok_or(StegoError::DecryptionFailure { mode: mode.name(), bits: ciphertext.len() * 8 })
}

/// Derive a `key_length`-bit AES key from a passphrase with Argon2id.
///
/// The salt must be at least [`MIN_SALT_LEN`] bytes and should be random and
/// stored next to whatever the key protects.
pub fn derive_key(passphrase: &str, salt: &[u8], key_length: usize) -> Result<Zeroizing<Vec<u8>>, StegoError> {
    if !matches!(key_length, 128 | 192 | 256) {
        return Err(StegoError::KeyLengthMismatch { mode: "Argon2id", expected: 256, actual: key_length });
    }
    if salt.len() < MIN_SALT_LEN {
        return Err(StegoError::KeyDerivation(format!(
            "salt must be at least {MIN_SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }
    let mut key = Zeroizing::new(vec![0u8; key_length / 8]);
    Argon2::default()
        .hash_password_into(passphrase.as_bytes(), salt, key.as_mut_slice())
        .map_err(|e| StegoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

fn ofb_apply(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Option<()> {
    match key.len() {
        16 => apply_keystream::<ofb::Ofb<Aes128>>(key, iv, buf),
        24 => apply_keystream::<ofb::Ofb<Aes192>>(key, iv, buf),
        _ => apply_keystream::<ofb::Ofb<Aes256>>(key, iv, buf),
    }
}

fn apply_keystream<S: KeyIvInit + StreamCipher>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Option<()> {
    let mut cipher = S::new_from_slices(key, iv).ok()?;
    cipher.apply_keystream(buf);
    Some(())
}

fn ecb_encrypt<E: KeyInit + BlockEncryptMut>(key: &[u8], data: &[u8]) -> Option<Vec<u8>> {
    Some(E::new_from_slice(key).ok()?.encrypt_padded_vec_mut::<Pkcs7>(data))
}

fn ecb_decrypt<D: KeyInit + BlockDecryptMut>(key: &[u8], data: &[u8]) -> Option<Vec<u8>> {
    D::new_from_slice(key).ok()?.decrypt_padded_vec_mut::<Pkcs7>(data).ok()
}

fn cbc_encrypt<E: KeyIvInit + BlockEncryptMut>(key: &[u8], iv: &[u8], data: &[u8]) -> Option<Vec<u8>> {
    Some(E::new_from_slices(key, iv).ok()?.encrypt_padded_vec_mut::<Pkcs7>(data))
}

fn cbc_decrypt<D: KeyIvInit + BlockDecryptMut>(key: &[u8], iv: &[u8], data: &[u8]) -> Option<Vec<u8>> {
    D::new_from_slices(key, iv).ok()?.decrypt_padded_vec_mut::<Pkcs7>(data).ok()
}
