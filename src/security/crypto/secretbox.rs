//! Secretbox primitives.
//!
//! Authenticated encryption for cookie payloads using XChaCha20-Poly1305:
//! a fresh random 24-byte nonce per call and a 16-byte Poly1305 tag
//! appended to the ciphertext.

use chacha20poly1305::aead::rand_core::RngCore;
use chacha20poly1305::aead::{Aead, KeyInit, OsRng};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};

/// Key length in bytes.
pub const KEY_BYTES: usize = 32;
/// Nonce length in bytes.
pub const NONCE_BYTES: usize = 24;
/// Poly1305 tag length in bytes, appended to every ciphertext.
pub const TAG_BYTES: usize = 16;

/// Draws a fresh random nonce from the OS.
#[must_use]
pub fn gen_nonce() -> [u8; NONCE_BYTES] {
    let mut nonce = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypts `plaintext` under `key` with a fresh random nonce.
///
/// Returns the nonce and the ciphertext with the tag appended.
///
/// # Panics
///
/// Panics if XChaCha20-Poly1305 encryption fails (internal library error).
#[must_use]
pub fn seal(plaintext: &[u8], key: &[u8; KEY_BYTES]) -> ([u8; NONCE_BYTES], Vec<u8>) {
    let nonce = gen_nonce();
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .expect("XChaCha20-Poly1305 encryption failed");
    (nonce, ciphertext)
}

/// Decrypts `ciphertext` (tag included) under `key`.
///
/// Failure is a value, not an error: tampered and foreign cookies are
/// routine input for the caller.
#[must_use]
pub fn open(ciphertext: &[u8], nonce: &[u8; NONCE_BYTES], key: &[u8; KEY_BYTES]) -> Option<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    cipher.decrypt(XNonce::from_slice(nonce), ciphertext).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_BYTES] = [7u8; KEY_BYTES];

    #[test]
    fn test_seal_open_roundtrip() {
        let (nonce, ciphertext) = seal(b"Hello, World!", &KEY);
        let plaintext = open(&ciphertext, &nonce, &KEY).expect("decryption failed");
        assert_eq!(plaintext, b"Hello, World!");
    }

    #[test]
    fn test_tag_overhead() {
        let (_, ciphertext) = seal(b"data", &KEY);
        assert_eq!(ciphertext.len(), 4 + TAG_BYTES);
    }

    #[test]
    fn test_unique_nonces_and_ciphertexts() {
        let (nonce1, cipher1) = seal(b"data", &KEY);
        let (nonce2, cipher2) = seal(b"data", &KEY);
        assert_ne!(nonce1, nonce2);
        assert_ne!(cipher1, cipher2);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let (nonce, mut ciphertext) = seal(b"original", &KEY);
        ciphertext[0] ^= 0xFF;
        assert!(open(&ciphertext, &nonce, &KEY).is_none());
    }

    #[test]
    fn test_wrong_key_fails() {
        let (nonce, ciphertext) = seal(b"secret", &KEY);
        let other = [8u8; KEY_BYTES];
        assert!(open(&ciphertext, &nonce, &other).is_none());
    }

    #[test]
    fn test_empty_plaintext() {
        let (nonce, ciphertext) = seal(b"", &KEY);
        assert_eq!(ciphertext.len(), TAG_BYTES);
        assert_eq!(open(&ciphertext, &nonce, &KEY).unwrap(), b"");
    }
}
