//! Test utilities.
//!
//! An in-memory cookie store standing in for the host framework's cookie
//! machinery, shared by unit and integration tests.

use std::collections::HashMap;

use crate::config::CookieOptions;
use crate::core::hooks::CookieStore;

/// One recorded `set_cookie` call.
#[derive(Debug, Clone)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub options: CookieOptions,
}

/// Cookie store backed by plain maps: inbound cookies are seeded by the
/// test, outbound cookies are recorded for assertions.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    inbound: HashMap<String, String>,
    outbound: Vec<SetCookie>,
}

impl MemoryCookieStore {
    /// Store with a single inbound cookie.
    #[must_use]
    pub fn with_cookie(name: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.insert_cookie(name, value);
        store
    }

    /// Seeds an inbound cookie.
    pub fn insert_cookie(&mut self, name: &str, value: &str) {
        self.inbound.insert(name.to_string(), value.to_string());
    }

    /// Last outbound cookie recorded under `name`.
    #[must_use]
    pub fn outbound(&self, name: &str) -> Option<&SetCookie> {
        self.outbound.iter().rev().find(|c| c.name == name)
    }

    /// Every recorded outbound cookie, in emission order.
    #[must_use]
    pub fn outbound_all(&self) -> &[SetCookie] {
        &self.outbound
    }

    /// Builds the store for a follow-up request: every outbound cookie
    /// of this response becomes an inbound cookie of the next request.
    #[must_use]
    pub fn next_request(&self) -> Self {
        let mut store = Self::default();
        for cookie in &self.outbound {
            store.insert_cookie(&cookie.name, &cookie.value);
        }
        store
    }
}

impl CookieStore for MemoryCookieStore {
    fn get_cookie(&self, name: &str) -> Option<String> {
        self.inbound.get(name).cloned()
    }

    fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions) {
        self.outbound.push(SetCookie {
            name: name.to_string(),
            value: value.to_string(),
            options: options.clone(),
        });
    }
}
