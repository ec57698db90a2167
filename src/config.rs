//! Configuration management.
//!
//! Session options are explicit structs passed in by the caller at
//! registry construction; configuration errors are fatal and surface
//! before any request is served.

mod error;
mod settings;

pub use error::{Result, SessionError};
pub use settings::{
    CookieOptions, DEFAULT_SESSION_EXPIRY_SECS, DEFAULT_SESSION_NAME, KeySecret, SameSite,
    SessionOptions,
};
