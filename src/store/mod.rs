//! Host cookie store contract
//!
//! The cookie store is the authority on which cookies exist. The cache never
//! mutates it directly: set and remove requests are fire-and-forget, and their
//! effect comes back later as [`CookieChange`] notifications on a
//! [`Subscription`].

use crate::cookie::{cookie_url, CookieRecord};
use crate::error::Result;
use std::fmt;
use tokio::sync::mpsc::UnboundedReceiver;

pub mod file;
pub mod memory;

pub use memory::MemoryCookieStore;

/// Why the store changed a cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// Inserted or removed by an explicit request
    Explicit,
    /// Removed because a set request replaced it
    Overwrite,
    /// Removed because it expired
    Expired,
}

impl fmt::Display for ChangeCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = match self {
            ChangeCause::Explicit => "explicit",
            ChangeCause::Overwrite => "overwrite",
            ChangeCause::Expired => "expired",
        };
        write!(f, "{}", cause)
    }
}

/// One insert, update, or delete reported by the store
#[derive(Debug, Clone, PartialEq)]
pub struct CookieChange {
    pub cookie: CookieRecord,
    pub removed: bool,
    pub cause: ChangeCause,
}

impl CookieChange {
    pub fn new(cookie: CookieRecord, removed: bool, cause: ChangeCause) -> Self {
        Self {
            cookie,
            removed,
            cause,
        }
    }
}

/// Handle identifying a registered change listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// A registered change listener and its event queue
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub events: UnboundedReceiver<CookieChange>,
}

/// Operations the cache needs from the host cookie store
pub trait CookieStore: Send + Sync {
    /// Every cookie currently in the store
    fn enumerate_all(&self) -> Result<Vec<CookieRecord>>;

    /// Request that `name` be set to `value` for `url`
    fn set_cookie(&self, url: &str, name: &str, value: &str) -> Result<()>;

    /// Request removal of `name` for `url`
    fn remove_cookie(&self, url: &str, name: &str) -> Result<()>;

    /// Request that the slot of `cookie` hold `cookie.value`
    ///
    /// The default goes through [`CookieStore::set_cookie`], which creates a
    /// host-only cookie for the URL host. Stores that can address a slot
    /// directly should override it.
    fn set_record(&self, cookie: CookieRecord) -> Result<()> {
        self.set_cookie(&cookie_url(&cookie)?, &cookie.name, &cookie.value)
    }

    /// Request removal of exactly the slot of `cookie`
    ///
    /// The default goes through [`CookieStore::remove_cookie`], which also
    /// hits other slots the same URL addresses.
    fn remove_record(&self, cookie: &CookieRecord) -> Result<()> {
        self.remove_cookie(&cookie_url(cookie)?, &cookie.name)
    }

    /// Register a listener; changes are queued in the order they happen
    fn subscribe(&self) -> Subscription;

    /// Stop delivering changes to `id`
    fn unsubscribe(&self, id: SubscriptionId);
}
