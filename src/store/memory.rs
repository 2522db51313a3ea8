//! In-process cookie store with a change feed
//!
//! Behaves like the browser cookie API the popup talks to: a set request on
//! an existing cookie is reported as the old cookie removed (overwrite)
//! followed by the new one added, and every mutation is pushed to all live
//! subscribers in the order it happened.

use crate::cookie::{cookie_url, CookieRecord, DEFAULT_STORE_ID};
use crate::error::{CkeditError, Result};
use crate::store::{ChangeCause, CookieChange, CookieStore, Subscription, SubscriptionId};
use log::debug;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc::{self, UnboundedSender};
use url::Url;

#[derive(Default)]
struct Inner {
    cookies: Vec<CookieRecord>,
    subscribers: Vec<(SubscriptionId, UnboundedSender<CookieChange>)>,
    next_id: u64,
}

impl Inner {
    fn emit(&mut self, change: CookieChange) {
        self.subscribers
            .retain(|(_, tx)| tx.send(change.clone()).is_ok());
    }

    fn insert(&mut self, cookie: CookieRecord) {
        if let Some(index) = self.cookies.iter().position(|c| c.same_slot(&cookie)) {
            let old = std::mem::replace(&mut self.cookies[index], cookie.clone());
            self.emit(CookieChange::new(old, true, ChangeCause::Overwrite));
        } else {
            self.cookies.push(cookie.clone());
        }
        self.emit(CookieChange::new(cookie, false, ChangeCause::Explicit));
    }

    /// Drop every cookie matching `pred`, reporting each with `cause`
    fn remove_where<F>(&mut self, cause: ChangeCause, pred: F) -> usize
    where
        F: Fn(&CookieRecord) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.cookies).into_iter().partition(pred);
        self.cookies = kept;
        let count = removed.len();
        for cookie in removed {
            self.emit(CookieChange::new(cookie, true, cause));
        }
        count
    }
}

/// Cookie store kept in memory, shareable across threads
#[derive(Default)]
pub struct MemoryCookieStore {
    inner: Mutex<Inner>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `cookies`, without emitting changes
    pub fn with_cookies<I>(cookies: I) -> Self
    where
        I: IntoIterator<Item = CookieRecord>,
    {
        let store = Self::new();
        store.lock().cookies.extend(cookies);
        store
    }

    /// Host-side write of a complete record
    pub fn insert(&self, cookie: CookieRecord) {
        self.lock().insert(cookie);
    }

    /// Remove every cookie, reporting each removal
    pub fn clear(&self) {
        let mut inner = self.lock();
        let cookies = std::mem::take(&mut inner.cookies);
        for cookie in cookies {
            inner.emit(CookieChange::new(cookie, true, ChangeCause::Explicit));
        }
    }

    /// Drop cookies whose expiration date is before `now` (seconds since
    /// the Unix epoch), reporting them as expired
    pub fn expire(&self, now: f64) -> usize {
        self.lock().remove_where(ChangeCause::Expired, |c| {
            c.expiration_date.is_some_and(|at| at < now)
        })
    }

    pub fn len(&self) -> usize {
        self.lock().cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().cookies.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the cookie list intact.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn parse_request_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| CkeditError::InvalidUrl(format!("Invalid URL '{}': {}", url, e)))?;
    if parsed.host_str().is_none() {
        return Err(CkeditError::InvalidUrl(format!("URL has no host: {}", url)));
    }
    Ok(parsed)
}

impl CookieStore for MemoryCookieStore {
    fn enumerate_all(&self) -> Result<Vec<CookieRecord>> {
        Ok(self.lock().cookies.clone())
    }

    fn set_cookie(&self, url: &str, name: &str, value: &str) -> Result<()> {
        let parsed = parse_request_url(url)?;
        let mut inner = self.lock();
        let existing = inner
            .cookies
            .iter()
            .find(|c| c.name == name && c.matches_url(&parsed))
            .cloned();
        let cookie = match existing {
            Some(old) => old.with_value(value),
            None => CookieRecord::new(name, value, parsed.host_str().unwrap_or_default())
                .with_path(parsed.path())
                .with_secure(parsed.scheme() == "https")
                .with_store_id(DEFAULT_STORE_ID),
        };
        debug!("set {}={} for {}", name, value, url);
        inner.insert(cookie);
        Ok(())
    }

    fn remove_cookie(&self, url: &str, name: &str) -> Result<()> {
        let parsed = parse_request_url(url)?;
        let removed = self
            .lock()
            .remove_where(ChangeCause::Explicit, |c| c.name == name && c.matches_url(&parsed));
        debug!("removed {} cookie(s) named {} for {}", removed, name, url);
        Ok(())
    }

    fn set_record(&self, cookie: CookieRecord) -> Result<()> {
        // Reject what a URL request would reject.
        cookie_url(&cookie)?;
        debug!("set {}={} in {}", cookie.name, cookie.value, cookie.domain);
        self.lock().insert(cookie);
        Ok(())
    }

    fn remove_record(&self, cookie: &CookieRecord) -> Result<()> {
        let removed = self
            .lock()
            .remove_where(ChangeCause::Explicit, |c| c.same_slot(cookie));
        debug!("removed {} cookie(s) named {} from {}", removed, cookie.name, cookie.domain);
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner.subscribers.push((id, tx));
        Subscription { id, events: rx }
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscribers.retain(|(sub, _)| *sub != id);
    }
}
