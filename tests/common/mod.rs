#![allow(dead_code)]

use cookiebox::{KeySecret, SessionOptions, SessionRegistry};

/// A 32-byte raw key filled with one value.
pub fn raw_key(fill: u8) -> KeySecret {
    KeySecret::Raw(vec![fill; 32])
}

/// Options for a single-key session under the default name.
pub fn key_options(fill: u8) -> SessionOptions {
    SessionOptions::with_key(raw_key(fill))
}

/// Registry with one session under the default name.
pub fn single_registry(fill: u8) -> SessionRegistry {
    SessionRegistry::new(key_options(fill)).unwrap()
}

/// Seconds since the epoch.
pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
