//! Cookie records and cookie-slot identity
//!
//! A [`CookieRecord`] is what the host cookie store hands out. Its identity,
//! the [`CookieKey`], is every attribute except the value: two records with
//! equal keys occupy the same slot in the store even when their values differ.

use crate::error::{CkeditError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Store id used by the host for the default (non-incognito) cookie store
pub const DEFAULT_STORE_ID: &str = "0";

/// Represents a cookie as reported by the host cookie store
///
/// Field names follow the browser extension API so exported JSON files
/// round-trip without translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CookieRecordRepr")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub host_only: bool,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub session: bool,
    pub store_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

/// Wire shape of a cookie; exports omit fields freely
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CookieRecordRepr {
    name: String,
    #[serde(default)]
    value: String,
    domain: String,
    #[serde(default)]
    host_only: Option<bool>,
    #[serde(default = "default_path")]
    path: String,
    #[serde(default)]
    secure: bool,
    #[serde(default)]
    http_only: bool,
    #[serde(default)]
    session: Option<bool>,
    #[serde(default = "default_store_id")]
    store_id: String,
    #[serde(default)]
    expiration_date: Option<f64>,
    #[serde(default)]
    same_site: Option<String>,
}

impl From<CookieRecordRepr> for CookieRecord {
    fn from(repr: CookieRecordRepr) -> Self {
        Self {
            session: repr.session.unwrap_or(repr.expiration_date.is_none()),
            // Only domain cookies carry the leading dot.
            host_only: repr
                .host_only
                .unwrap_or_else(|| !repr.domain.starts_with('.')),
            name: repr.name,
            value: repr.value,
            domain: repr.domain,
            path: repr.path,
            secure: repr.secure,
            http_only: repr.http_only,
            store_id: repr.store_id,
            expiration_date: repr.expiration_date,
            same_site: repr.same_site,
        }
    }
}

fn default_path() -> String {
    "/".to_string()
}

fn default_store_id() -> String {
    DEFAULT_STORE_ID.to_string()
}

/// The identity of a cookie slot: every field except the value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CookieKey<'a> {
    pub name: &'a str,
    pub domain: &'a str,
    pub host_only: bool,
    pub path: &'a str,
    pub secure: bool,
    pub http_only: bool,
    pub session: bool,
    pub store_id: &'a str,
}

impl CookieRecord {
    /// Create a host-only session cookie with path `/`
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            host_only: true,
            path: default_path(),
            secure: false,
            http_only: false,
            session: true,
            store_id: default_store_id(),
            expiration_date: None,
            same_site: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_host_only(mut self, host_only: bool) -> Self {
        self.host_only = host_only;
        self
    }

    pub fn with_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = store_id.into();
        self
    }

    /// Set an expiry, which also makes the cookie persistent
    pub fn with_expiration(mut self, expiration_date: Option<f64>) -> Self {
        self.expiration_date = expiration_date;
        self.session = expiration_date.is_none();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn key(&self) -> CookieKey<'_> {
        CookieKey {
            name: &self.name,
            domain: &self.domain,
            host_only: self.host_only,
            path: &self.path,
            secure: self.secure,
            http_only: self.http_only,
            session: self.session,
            store_id: &self.store_id,
        }
    }

    /// Slot equality: all identity fields equal, value ignored
    pub fn same_slot(&self, other: &CookieRecord) -> bool {
        self.key() == other.key()
    }

    /// Whether a request for `url` addresses this cookie
    ///
    /// A host-only cookie needs its domain to equal the host; a domain
    /// cookie is compared without its leading dot. The path must be equal,
    /// and a secure cookie is only reached over https.
    pub fn matches_url(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        if self.secure && url.scheme() != "https" {
            return false;
        }
        let domain = if self.host_only {
            self.domain.as_str()
        } else {
            self.domain.trim_start_matches('.')
        };
        domain.eq_ignore_ascii_case(host) && self.path == url.path()
    }
}

/// Build the URL the host expects for set/remove requests on `cookie`
///
/// `https` iff the cookie is secure, then domain and path concatenated. The
/// leading dot of a domain cookie is dropped so the URL parses.
pub fn cookie_url(cookie: &CookieRecord) -> Result<String> {
    let scheme = if cookie.secure { "https" } else { "http" };
    let raw = format!(
        "{}://{}{}",
        scheme,
        cookie.domain.trim_start_matches('.'),
        cookie.path
    );
    Url::parse(&raw)
        .map(|url| url.to_string())
        .map_err(|e| CkeditError::InvalidUrl(format!("Invalid cookie URL '{}': {}", raw, e)))
}
