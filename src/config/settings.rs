//! Configuration settings.
//!
//! Defines the per-session `SessionOptions` surface and the cookie
//! attribute set handed to the host's cookie store. Options are plain
//! structs built by the caller and passed to `SessionRegistry::new`;
//! there is no ambient or process-wide configuration state.

use std::time::SystemTime;

/// Default session name, also used as the default cookie name.
pub const DEFAULT_SESSION_NAME: &str = "session";

/// Default expiry applied when expiry tracking is enabled without an
/// explicit duration: 24 hours plus a one second margin.
pub const DEFAULT_SESSION_EXPIRY_SECS: u64 = 86_401;

/// Key material supplied directly, bypassing passphrase derivation.
///
/// Each entry must resolve to exactly 32 bytes; anything else is rejected
/// at registration time.
#[derive(Clone)]
pub enum KeySecret {
    /// A raw key.
    Raw(Vec<u8>),
    /// A base64-encoded key.
    Base64(String),
}

impl std::fmt::Debug for KeySecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw(_) => f.write_str("KeySecret::Raw(..)"),
            Self::Base64(_) => f.write_str("KeySecret::Base64(..)"),
        }
    }
}

/// `SameSite` cookie attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    /// Attribute value as it appears in a `Set-Cookie` header.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

/// Cookie attributes passed to the host's cookie store.
///
/// Every field is optional; unset fields are left to the store's own
/// defaults. `merged` layers one attribute set over another, which is how
/// per-session overrides win over registry-wide defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    /// Cookie `Path` attribute.
    pub path: Option<String>,
    /// Cookie `Domain` attribute.
    pub domain: Option<String>,
    /// Cookie `Max-Age` attribute, in seconds.
    pub max_age: Option<i64>,
    /// Cookie `Expires` attribute.
    pub expires: Option<SystemTime>,
    /// Cookie `HttpOnly` attribute. The registry defaults this to true
    /// unless explicitly overridden.
    pub http_only: Option<bool>,
    /// Cookie `Secure` attribute.
    pub secure: Option<bool>,
    /// Cookie `SameSite` attribute.
    pub same_site: Option<SameSite>,
    /// Whether the host's cookie store should additionally sign the value.
    pub signed: Option<bool>,
}

impl CookieOptions {
    /// Layers `over` on top of `self`: fields set in `over` win, unset
    /// fields fall back to `self`.
    #[must_use]
    pub fn merged(&self, over: &CookieOptions) -> CookieOptions {
        CookieOptions {
            path: over.path.clone().or_else(|| self.path.clone()),
            domain: over.domain.clone().or_else(|| self.domain.clone()),
            max_age: over.max_age.or(self.max_age),
            expires: over.expires.or(self.expires),
            http_only: over.http_only.or(self.http_only),
            secure: over.secure.or(self.secure),
            same_site: over.same_site.or(self.same_site),
            signed: over.signed.or(self.signed),
        }
    }
}

/// Configuration for one named session within a request pipeline.
///
/// Either `keys` or `secret` must be set. When both are set the secret
/// wins and `keys` is ignored. Several `SessionOptions` with distinct
/// session names may be registered together to run independent sessions
/// over the same requests.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Name the session is looked up under. Defaults to `"session"`.
    pub session_name: Option<String>,
    /// Cookie name. Defaults to the session name.
    pub cookie_name: Option<String>,
    /// Pre-derived keys, newest first. Only the first entry encrypts;
    /// the rest are kept for decrypting cookies minted before a rotation.
    pub keys: Option<Vec<KeySecret>>,
    /// Passphrase to derive a single key from. Must be at least 32 bytes.
    pub secret: Option<Vec<u8>>,
    /// Salt for passphrase derivation, exactly 16 bytes. A fixed default
    /// is used when unset; supplying a per-deployment random salt is the
    /// recommended configuration.
    pub salt: Option<Vec<u8>>,
    /// Default cookie attributes for this session.
    pub cookie: CookieOptions,
    /// Expiry in seconds. Unset disables expiry tracking entirely: no
    /// timestamp is embedded and cookies never age out.
    pub expiry_secs: Option<u64>,
}

impl SessionOptions {
    /// Options with a single pre-derived key.
    #[must_use]
    pub fn with_key(key: KeySecret) -> Self {
        Self {
            keys: Some(vec![key]),
            ..Self::default()
        }
    }

    /// Options with an ordered key list, newest first.
    #[must_use]
    pub fn with_keys(keys: Vec<KeySecret>) -> Self {
        Self {
            keys: Some(keys),
            ..Self::default()
        }
    }

    /// Options with a passphrase secret and the default salt.
    #[must_use]
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Self::default()
        }
    }

    /// Enables expiry tracking at the default duration.
    #[must_use]
    pub fn with_expiry(mut self) -> Self {
        self.expiry_secs = Some(DEFAULT_SESSION_EXPIRY_SECS);
        self
    }

    /// Resolved session name.
    #[must_use]
    pub fn resolved_session_name(&self) -> &str {
        self.session_name.as_deref().unwrap_or(DEFAULT_SESSION_NAME)
    }

    /// Resolved cookie name, defaulting to the session name.
    #[must_use]
    pub fn resolved_cookie_name(&self) -> &str {
        self.cookie_name
            .as_deref()
            .unwrap_or_else(|| self.resolved_session_name())
    }
}
