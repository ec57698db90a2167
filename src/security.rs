//! Security modules.
//!
//! Provides the authenticated cookie encryption and key derivation layer.

pub mod crypto;
