//! Session envelope.
//!
//! The in-memory representation of one request's session state: a JSON
//! map plus dirty/deleted flags and an embedded timestamp used for
//! expiry. Envelopes live for a single request/response cycle; the only
//! thing that survives is the encrypted cookie they serialize into.

use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::CookieOptions;

/// Bookkeeping field holding the creation/refresh time, seconds since epoch.
pub(crate) const TS_KEY: &str = "__ts";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Per-request session state.
///
/// The `changed` flag is sticky: once set it stays set for the rest of
/// the request, which is what guarantees the response phase re-issues
/// the cookie. `deleted` wins over data: the response phase emits a
/// clearing cookie and never serializes the map.
#[derive(Debug, Clone)]
pub struct Session {
    data: Map<String, Value>,
    changed: bool,
    deleted: bool,
    cookie_options: Option<CookieOptions>,
    track_ts: bool,
}

impl Session {
    /// Creates an empty session.
    ///
    /// When `track_ts` is set a fresh timestamp is embedded, making the
    /// session subject to expiry once serialized.
    #[must_use]
    pub fn fresh(track_ts: bool) -> Self {
        Self::with_data(Map::new(), track_ts)
    }

    /// Creates a session over existing data, stamping a timestamp if
    /// tracking is enabled and the data does not carry one yet.
    #[must_use]
    pub fn with_data(data: Map<String, Value>, track_ts: bool) -> Self {
        let mut session = Self {
            data,
            changed: false,
            deleted: false,
            cookie_options: None,
            track_ts,
        };
        if track_ts && !session.data.contains_key(TS_KEY) {
            session.stamp();
        }
        session
    }

    /// Looks up a value. No side effect.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Stores a value, marking the session changed and refreshing the
    /// embedded timestamp when expiry tracking is enabled.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.changed = true;
        self.data.insert(key.into(), value.into());
        if self.track_ts {
            self.stamp();
        }
    }

    /// Marks the session for deletion.
    ///
    /// The backing map is left intact; the response phase reacts to the
    /// flag by emitting a cookie-clearing header instead of data.
    pub fn delete(&mut self) {
        self.changed = true;
        self.deleted = true;
    }

    /// Refreshes the embedded timestamp without touching data, extending
    /// a sliding expiry on activity.
    pub fn touch(&mut self) {
        self.changed = true;
        if self.track_ts {
            self.stamp();
        }
    }

    /// Drops every data key except the timestamp and the names in `keep`.
    pub fn regenerate(&mut self, keep: &[&str]) {
        self.changed = true;
        self.data
            .retain(|key, _| key == TS_KEY || keep.contains(&key.as_str()));
    }

    /// Snapshot of the session data with bookkeeping fields stripped.
    #[must_use]
    pub fn data(&self) -> Map<String, Value> {
        let mut snapshot = self.data.clone();
        snapshot.remove(TS_KEY);
        snapshot
    }

    /// Overrides cookie attributes for this session's next serialization.
    /// Overridden fields win over the registry-wide defaults.
    pub fn options(&mut self, options: CookieOptions) {
        self.cookie_options = Some(options);
    }

    /// Whether the session must be re-issued at response time.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Whether the session is marked for deletion.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub(crate) fn cookie_options(&self) -> Option<&CookieOptions> {
        self.cookie_options.as_ref()
    }

    pub(crate) fn raw_data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Forces the changed flag, used when a rotated key decrypted the
    /// cookie and the response must re-issue it under the signing key.
    pub(crate) fn force_changed(&mut self) {
        self.changed = true;
    }

    fn stamp(&mut self) {
        self.data.insert(TS_KEY.to_string(), Value::from(now_secs()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_marks_changed() {
        let mut session = Session::fresh(false);
        assert!(!session.changed());

        session.set("user", "alice");
        assert!(session.changed());
        assert_eq!(session.get("user"), Some(&json!("alice")));
    }

    #[test]
    fn test_get_has_no_side_effect() {
        let session = Session::fresh(false);
        assert!(session.get("missing").is_none());
        assert!(!session.changed());
    }

    #[test]
    fn test_delete_keeps_data() {
        let mut session = Session::fresh(false);
        session.set("user", "alice");
        session.delete();

        assert!(session.is_deleted());
        assert!(session.changed());
        assert_eq!(session.get("user"), Some(&json!("alice")));
    }

    #[test]
    fn test_fresh_tracked_session_is_stamped() {
        let session = Session::fresh(true);
        assert!(session.get(TS_KEY).is_some());
        assert!(!session.changed());

        let untracked = Session::fresh(false);
        assert!(untracked.get(TS_KEY).is_none());
    }

    #[test]
    fn test_with_data_keeps_existing_timestamp() {
        let mut data = Map::new();
        data.insert(TS_KEY.to_string(), json!(5));
        let session = Session::with_data(data, true);
        assert_eq!(session.get(TS_KEY), Some(&json!(5)));
    }

    #[test]
    fn test_touch_refreshes_timestamp_only() {
        let mut data = Map::new();
        data.insert(TS_KEY.to_string(), json!(5));
        data.insert("user".to_string(), json!("alice"));

        let mut session = Session::with_data(data, true);
        session.touch();

        assert!(session.changed());
        assert_ne!(session.get(TS_KEY), Some(&json!(5)));
        assert_eq!(session.get("user"), Some(&json!("alice")));
    }

    #[test]
    fn test_set_refreshes_timestamp() {
        let mut data = Map::new();
        data.insert(TS_KEY.to_string(), json!(5));
        let mut session = Session::with_data(data, true);

        session.set("user", "alice");
        assert_ne!(session.get(TS_KEY), Some(&json!(5)));
    }

    #[test]
    fn test_regenerate_keeps_named_keys_and_timestamp() {
        let mut session = Session::fresh(true);
        session.set("user", "alice");
        session.set("email", "alice@example.com");
        session.set("theme", "dark");

        session.regenerate(&["user"]);

        assert_eq!(session.get("user"), Some(&json!("alice")));
        assert!(session.get("email").is_none());
        assert!(session.get("theme").is_none());
        assert!(session.get(TS_KEY).is_some());
    }

    #[test]
    fn test_regenerate_without_keeps_clears_all() {
        let mut session = Session::fresh(false);
        session.set("user", "alice");
        session.regenerate(&[]);
        assert!(session.data().is_empty());
        assert!(session.changed());
    }

    #[test]
    fn test_data_strips_bookkeeping() {
        let mut session = Session::fresh(true);
        session.set("user", "alice");

        let data = session.data();
        assert_eq!(data.len(), 1);
        assert_eq!(data.get("user"), Some(&json!("alice")));
        assert!(!data.contains_key(TS_KEY));
    }

    #[test]
    fn test_options_override_is_stored() {
        let mut session = Session::fresh(false);
        assert!(session.cookie_options().is_none());

        session.options(CookieOptions {
            max_age: Some(60),
            ..CookieOptions::default()
        });
        assert_eq!(session.cookie_options().unwrap().max_age, Some(60));
    }
}
