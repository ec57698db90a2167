//! Session registry.
//!
//! Holds the resolved configuration for every named session in a request
//! pipeline and owns the cookie codec: JSON payload, secretbox seal, and
//! the `base64(ciphertext);base64(nonce)` wire format. Decode failures
//! are routine input and collapse to "no session"; configuration and
//! lookup mistakes are hard errors.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::config::{CookieOptions, Result, SessionError, SessionOptions};
use crate::core::session::{Session, TS_KEY};
use crate::security::crypto::KeyRing;
use crate::security::crypto::secretbox::{NONCE_BYTES, TAG_BYTES};

/// One resolved session configuration.
#[derive(Debug, Clone)]
pub(crate) struct RegistryEntry {
    pub(crate) session_name: String,
    pub(crate) cookie_name: String,
    pub(crate) keys: KeyRing,
    pub(crate) cookie_options: CookieOptions,
    pub(crate) expiry_secs: Option<u64>,
}

impl RegistryEntry {
    fn resolve(options: &SessionOptions) -> Result<Self> {
        let keys = KeyRing::resolve(options)?;

        // Sessions are HttpOnly unless the configuration says otherwise.
        let mut cookie_options = options.cookie.clone();
        if cookie_options.http_only.is_none() {
            cookie_options.http_only = Some(true);
        }

        Ok(Self {
            session_name: options.resolved_session_name().to_string(),
            cookie_name: options.resolved_cookie_name().to_string(),
            keys,
            cookie_options,
            expiry_secs: options.expiry_secs,
        })
    }

    pub(crate) fn fresh_session(&self) -> Session {
        Session::fresh(self.expiry_secs.is_some())
    }

    /// Serializes and encrypts a session into its cookie value.
    pub(crate) fn encode_value(&self, session: &Session) -> Result<String> {
        let payload = serde_json::to_vec(session.raw_data())?;
        let (nonce, ciphertext) = self.keys.seal(&payload);
        Ok(format!(
            "{};{}",
            STANDARD.encode(&ciphertext),
            STANDARD.encode(nonce)
        ))
    }

    /// Decodes a cookie value back into a session.
    ///
    /// Malformed values, bad lengths, failed decryption and elapsed
    /// expiry all return `None`; the cookie came from a client and any
    /// of these is routine. Each outcome is logged at debug level.
    pub(crate) fn decode_value(&self, cookie: &str) -> Option<Session> {
        let Some((ciphertext_b64, nonce_b64)) = cookie.split_once(';') else {
            debug!(session = %self.session_name, "cookie is malformed, creating an empty session");
            return None;
        };

        let (Ok(ciphertext), Ok(nonce)) = (STANDARD.decode(ciphertext_b64), STANDARD.decode(nonce_b64))
        else {
            debug!(session = %self.session_name, "cookie is not valid base64, creating an empty session");
            return None;
        };

        if ciphertext.len() < TAG_BYTES {
            debug!(session = %self.session_name, "cipher is not long enough, creating an empty session");
            return None;
        }

        let Ok(nonce) = <[u8; NONCE_BYTES]>::try_from(nonce.as_slice()) else {
            debug!(session = %self.session_name, "nonce does not have the required length, creating an empty session");
            return None;
        };

        let Some((plaintext, rotated)) = self.keys.open(&ciphertext, &nonce) else {
            debug!(session = %self.session_name, "unable to decrypt, creating an empty session");
            return None;
        };

        let Ok(data) = serde_json::from_slice::<Map<String, Value>>(&plaintext) else {
            debug!(session = %self.session_name, "payload is not a JSON object, creating an empty session");
            return None;
        };

        if let Some(expiry) = self.expiry_secs {
            let ts = data.get(TS_KEY).and_then(Value::as_u64).unwrap_or(0);
            if ts.saturating_add(expiry) <= now_secs() {
                debug!(session = %self.session_name, "session expired, creating an empty session");
                return None;
            }
        }

        let mut session = Session::with_data(data, self.expiry_secs.is_some());
        if rotated {
            // Decrypted under a previous key: force a re-issue so the
            // client migrates to the signing key.
            debug!(session = %self.session_name, "cookie decrypted under a rotated key, re-issuing");
            session.force_changed();
        }
        Some(session)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Configuration for one or more independent named sessions.
///
/// Immutable once constructed; key derivation happens here, once, so the
/// per-request path never pays the password-hash cost. Separate
/// registries are fully independent, which keeps tests and multi-tenant
/// setups free of shared state.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    pub(crate) entries: Vec<RegistryEntry>,
}

impl SessionRegistry {
    /// Builds a registry for a single session configuration.
    pub fn new(options: SessionOptions) -> Result<Self> {
        Self::with_sessions(vec![options])
    }

    /// Builds a registry for several independent named sessions.
    ///
    /// Fails on bad key material, duplicate session names, or an empty
    /// configuration list; nothing is served with a half-built registry.
    pub fn with_sessions(options: Vec<SessionOptions>) -> Result<Self> {
        let mut entries: Vec<RegistryEntry> = Vec::with_capacity(options.len());
        for opts in &options {
            let entry = RegistryEntry::resolve(opts)?;
            if entries.iter().any(|e| e.session_name == entry.session_name) {
                return Err(SessionError::DuplicateSession(entry.session_name));
            }
            entries.push(entry);
        }
        if entries.is_empty() {
            return Err(SessionError::MissingKeyMaterial);
        }
        Ok(Self { entries })
    }

    /// Registered session names, in registration order.
    pub fn session_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.session_name.as_str())
    }

    pub(crate) fn entry(&self, name: &str) -> Result<&RegistryEntry> {
        self.entries
            .iter()
            .find(|e| e.session_name == name)
            .ok_or_else(|| SessionError::UnknownSession(name.to_string()))
    }

    /// Mints a session outside the normal request cycle.
    pub fn create_session(&self, name: &str, data: Map<String, Value>) -> Result<Session> {
        let entry = self.entry(name)?;
        Ok(Session::with_data(data, entry.expiry_secs.is_some()))
    }

    /// Decodes a cookie value for the named session.
    ///
    /// `Ok(None)` means the cookie was absent-equivalent (malformed,
    /// tampered, foreign, or expired) and the caller should substitute a
    /// fresh session; an unknown name is a programming error.
    pub fn decode_session(&self, name: &str, cookie: &str) -> Result<Option<Session>> {
        let entry = self.entry(name)?;
        Ok(entry.decode_value(cookie))
    }

    /// Encodes a session into the named session's cookie value.
    pub fn encode_session(&self, name: &str, session: &Session) -> Result<String> {
        let entry = self.entry(name)?;
        entry.encode_value(session)
    }
}
