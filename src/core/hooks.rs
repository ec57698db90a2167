//! Request-scoped hooks.
//!
//! The two entry points a host framework wires into its own hook chain:
//! `prepare` runs before routing and turns inbound cookies into session
//! envelopes, `commit` runs before the response leaves and turns changed
//! envelopes back into `Set-Cookie` calls. The host's cookie machinery
//! stays behind the `CookieStore` trait.

use std::time::UNIX_EPOCH;
use tracing::debug;

use crate::config::{CookieOptions, Result};
use crate::core::registry::SessionRegistry;
use crate::core::session::Session;

/// The host framework's cookie machinery, reduced to the two operations
/// the session layer needs. Header parsing, attribute serialization and
/// signing all stay on the host's side of this seam.
pub trait CookieStore {
    /// Value of the named inbound cookie, if the request carried one.
    fn get_cookie(&self, name: &str) -> Option<String>;

    /// Queues a cookie on the outbound response.
    fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions);
}

/// The session envelopes for one request, in registration order.
///
/// Produced by `prepare`, mutated by request handlers, consumed exactly
/// once by `commit`.
#[derive(Debug)]
pub struct RequestSessions {
    sessions: Vec<(String, Session)>,
}

impl RequestSessions {
    /// Looks up a session by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Session> {
        self.sessions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Looks up a session by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Session> {
        self.sessions
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Swaps in a replacement envelope, e.g. one minted with
    /// `SessionRegistry::create_session`. Returns false when the name
    /// was never registered.
    pub fn replace(&mut self, name: &str, session: Session) -> bool {
        match self.get_mut(name) {
            Some(slot) => {
                *slot = session;
                true
            }
            None => false,
        }
    }

    /// Iterates over `(name, session)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Session)> {
        self.sessions.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionRegistry {
    /// Pre-routing phase: reads every registered session's cookie and
    /// attaches an envelope for each.
    ///
    /// Absent, malformed, tampered, foreign and expired cookies all
    /// yield a fresh empty envelope; nothing a client sends can make
    /// this phase fail.
    #[must_use]
    pub fn prepare(&self, store: &dyn CookieStore) -> RequestSessions {
        let sessions = self
            .entries
            .iter()
            .map(|entry| {
                let session = match store.get_cookie(&entry.cookie_name) {
                    None => {
                        debug!(session = %entry.session_name, "there is no cookie, creating an empty session");
                        entry.fresh_session()
                    }
                    Some(value) => entry
                        .decode_value(&value)
                        .unwrap_or_else(|| entry.fresh_session()),
                };
                (entry.session_name.clone(), session)
            })
            .collect();
        RequestSessions { sessions }
    }

    /// Pre-send phase: emits one cookie per changed session.
    ///
    /// Unchanged sessions emit nothing, deleted sessions emit a clearing
    /// cookie, everything else is re-encrypted under the signing key.
    /// Emission follows registration order.
    pub fn commit(&self, sessions: RequestSessions, store: &mut dyn CookieStore) -> Result<()> {
        for (name, session) in sessions.sessions {
            let entry = self.entry(&name)?;

            if !session.changed() {
                debug!(session = %name, "the session didn't change, leaving it as is");
                continue;
            }

            let options = match session.cookie_options() {
                Some(over) => entry.cookie_options.merged(over),
                None => entry.cookie_options.clone(),
            };

            if session.is_deleted() {
                debug!(session = %name, "deleting session");
                let cleared = options.merged(&CookieOptions {
                    expires: Some(UNIX_EPOCH),
                    max_age: Some(0),
                    ..CookieOptions::default()
                });
                store.set_cookie(&entry.cookie_name, "", &cleared);
                continue;
            }

            debug!(session = %name, "setting session");
            let value = entry.encode_value(&session)?;
            store.set_cookie(&entry.cookie_name, &value, &options);
        }
        Ok(())
    }
}

/// Assembles a `Set-Cookie` header value for hosts without a cookie jar
/// of their own.
///
/// `Expires` is emitted only for the epoch, which is the deletion case
/// the session layer itself produces; hosts that set arbitrary expiry
/// dates are expected to format them in their own store. The `signed`
/// flag is a store behavior, not a header attribute, and is ignored.
#[must_use]
pub fn format_set_cookie(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut header = format!("{name}={value}");
    if let Some(path) = &options.path {
        header.push_str(&format!("; Path={path}"));
    }
    if let Some(domain) = &options.domain {
        header.push_str(&format!("; Domain={domain}"));
    }
    if let Some(max_age) = options.max_age {
        header.push_str(&format!("; Max-Age={max_age}"));
    }
    if options.expires == Some(UNIX_EPOCH) {
        header.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
    }
    if options.http_only == Some(true) {
        header.push_str("; HttpOnly");
    }
    if options.secure == Some(true) {
        header.push_str("; Secure");
    }
    if let Some(same_site) = options.same_site {
        header.push_str(&format!("; SameSite={}", same_site.as_str()));
    }
    header
}
