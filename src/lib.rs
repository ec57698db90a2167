//! Library definitions.
//!
//! Exports the session registry, envelope, configuration surface, and
//! the hook entry points a host framework wires into its request
//! pipeline.

pub mod config;
pub mod core;
pub mod security;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use crate::config::{
    CookieOptions, DEFAULT_SESSION_EXPIRY_SECS, DEFAULT_SESSION_NAME, KeySecret, Result, SameSite,
    SessionError, SessionOptions,
};
pub use crate::core::hooks::{CookieStore, RequestSessions, format_set_cookie};
pub use crate::core::registry::SessionRegistry;
pub use crate::core::session::Session;
pub use crate::security::crypto::{KeyRing, SecretKey};
