//! Key material.
//!
//! Builds the ordered key list a session is configured with: either one
//! key derived from a passphrase via Argon2id, or pre-derived keys given
//! directly as raw bytes or base64 text. Key zero encrypts; later keys
//! only decrypt cookies minted before a rotation.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{KeySecret, Result, SessionError, SessionOptions};
use crate::security::crypto::secretbox::{self, KEY_BYTES, NONCE_BYTES};

/// Salt length for passphrase derivation, in bytes.
pub const SALT_BYTES: usize = 16;

/// Minimum passphrase length, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

// Static salt used when none is configured. Not great for security, but
// better than nothing; deployments should supply their own random salt.
const DEFAULT_SALT: [u8; SALT_BYTES] = [
    0x9a, 0xaf, 0x61, 0x0f, 0x10, 0x55, 0x0d, 0xbb, 0x29, 0x0d, 0x1e, 0xa7, 0x2d, 0xf1, 0x53, 0xd6,
];

// Argon2id cost parameters: 64 MiB, 3 passes, 4 lanes. Slow enough that
// derivation must happen once at configuration time, never per-request.
const PWHASH_MEM_KIB: u32 = 64 * 1024;
const PWHASH_PASSES: u32 = 3;
const PWHASH_LANES: u32 = 4;

/// A 32-byte symmetric encryption key, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_BYTES]);

impl SecretKey {
    /// Builds a key from raw bytes, enforcing the exact required length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_BYTES] =
            bytes
                .try_into()
                .map_err(|_| SessionError::BadKeyLength {
                    expected: KEY_BYTES,
                    actual: bytes.len(),
                })?;
        Ok(Self(key))
    }

    /// Key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Derives one key from a passphrase secret and an optional salt.
///
/// The secret must be at least 32 bytes and the salt, when given, exactly
/// 16 bytes. Runs Argon2id at moderate cost; call once at startup.
pub fn derive_key_from_secret(secret: &[u8], salt: Option<&[u8]>) -> Result<SecretKey> {
    if secret.len() < MIN_SECRET_BYTES {
        return Err(SessionError::SecretTooShort {
            min: MIN_SECRET_BYTES,
            actual: secret.len(),
        });
    }

    let salt = match salt {
        Some(salt) if salt.len() != SALT_BYTES => {
            return Err(SessionError::BadSaltLength {
                expected: SALT_BYTES,
                actual: salt.len(),
            });
        }
        Some(salt) => salt,
        None => DEFAULT_SALT.as_slice(),
    };

    let params = Params::new(PWHASH_MEM_KIB, PWHASH_PASSES, PWHASH_LANES, Some(KEY_BYTES))
        .map_err(|e| SessionError::KeyDerivation(e.to_string()))?;
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_BYTES];
    argon
        .hash_password_into(secret, salt, &mut key)
        .map_err(|e| SessionError::KeyDerivation(e.to_string()))?;

    Ok(SecretKey(key))
}

/// Validates directly-supplied keys, decoding base64 entries.
pub fn sanitize_keys(inputs: &[KeySecret]) -> Result<Vec<SecretKey>> {
    inputs
        .iter()
        .map(|input| match input {
            KeySecret::Raw(bytes) => SecretKey::from_bytes(bytes),
            KeySecret::Base64(text) => SecretKey::from_bytes(&STANDARD.decode(text)?),
        })
        .collect()
}

/// An ordered, non-empty list of keys.
///
/// Key zero is the signing key; the rest are previous keys retained so
/// cookies minted before a rotation keep decoding.
#[derive(Debug, Clone)]
pub struct KeyRing {
    keys: Vec<SecretKey>,
}

impl KeyRing {
    /// Builds a key ring, rejecting an empty list.
    pub fn new(keys: Vec<SecretKey>) -> Result<Self> {
        if keys.is_empty() {
            return Err(SessionError::MissingKeyMaterial);
        }
        Ok(Self { keys })
    }

    /// Resolves a ring from session options.
    ///
    /// A configured secret takes precedence over direct keys.
    pub fn resolve(options: &SessionOptions) -> Result<Self> {
        if let Some(secret) = &options.secret {
            let key = derive_key_from_secret(secret, options.salt.as_deref())?;
            return Self::new(vec![key]);
        }
        match &options.keys {
            Some(inputs) => Self::new(sanitize_keys(inputs)?),
            None => Err(SessionError::MissingKeyMaterial),
        }
    }

    /// Encrypts under the signing key with a fresh random nonce.
    #[must_use]
    pub fn seal(&self, plaintext: &[u8]) -> ([u8; NONCE_BYTES], Vec<u8>) {
        secretbox::seal(plaintext, self.keys[0].as_bytes())
    }

    /// Tries every key in list order, stopping at the first success.
    ///
    /// The returned flag is true when a non-signing key decrypted the
    /// payload, telling the caller to re-encrypt under the signing key.
    #[must_use]
    pub fn open(&self, ciphertext: &[u8], nonce: &[u8; NONCE_BYTES]) -> Option<(Vec<u8>, bool)> {
        self.keys.iter().enumerate().find_map(|(index, key)| {
            secretbox::open(ciphertext, nonce, key.as_bytes())
                .map(|plaintext| (plaintext, index > 0))
        })
    }

    /// Number of keys in the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false: rings reject empty key lists at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
