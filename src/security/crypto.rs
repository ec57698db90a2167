//! Cryptographic utilities.
//!
//! Secretbox encryption primitives and key material handling.

pub mod keys;
pub mod secretbox;

pub use keys::{KeyRing, SecretKey};
