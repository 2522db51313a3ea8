//! Domain-indexed cookie cache
//!
//! [`CookieCache`] mirrors the host cookie store. It is filled once from a
//! full enumeration and then kept current by applying change notifications
//! in delivery order. Every notification is handled the same way: evict the
//! slot, then reinstall it unless the change was a removal. That single path
//! covers inserts, deletes and value updates, and reapplying the same event
//! leaves the cache unchanged.
//!
//! Invariants:
//! - a domain key is present iff its cookie list is non-empty;
//! - within a domain no two cookies share a [`CookieKey`](crate::cookie::CookieKey).

use crate::cookie::CookieRecord;
use crate::store::CookieChange;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Result of [`CookieCache::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The slot was new to the domain and the cookie was appended
    Inserted,
    /// A cookie in the same slot was overwritten in place
    Replaced,
}

/// Counts reported by [`CookieCache::bulk_load`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub duplicates: usize,
}

/// Cookies currently known to exist, grouped by domain
#[derive(Debug, Clone, Default)]
pub struct CookieCache {
    cookies: BTreeMap<String, Vec<CookieRecord>>,
}

impl CookieCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every cookie
    pub fn reset(&mut self) {
        self.cookies.clear();
    }

    /// Insert `cookie` into its domain's list
    ///
    /// Callers are expected to evict a stale version first (see
    /// [`apply`](Self::apply)). If they did not, the stale cookie is
    /// overwritten in place instead of being duplicated.
    pub fn add(&mut self, cookie: CookieRecord) -> AddOutcome {
        let list = self.cookies.entry(cookie.domain.clone()).or_default();
        match list.iter_mut().find(|existing| existing.same_slot(&cookie)) {
            Some(existing) => {
                *existing = cookie;
                AddOutcome::Replaced
            }
            None => {
                list.push(cookie);
                AddOutcome::Inserted
            }
        }
    }

    /// Drop every cookie in `cookie`'s slot, whatever its value
    ///
    /// Returns how many were removed. Absent domains are a no-op.
    pub fn remove(&mut self, cookie: &CookieRecord) -> usize {
        let Some(list) = self.cookies.get_mut(&cookie.domain) else {
            return 0;
        };
        let before = list.len();
        list.retain(|existing| !existing.same_slot(cookie));
        let removed = before - list.len();
        if list.is_empty() {
            self.cookies.remove(&cookie.domain);
        }
        removed
    }

    /// Sorted domains, limited to those containing `filter` when it is
    /// non-empty
    pub fn domains(&self, filter: Option<&str>) -> Vec<String> {
        let filter = filter.filter(|f| !f.is_empty());
        self.cookies
            .keys()
            .filter(|domain| filter.map_or(true, |f| domain.contains(f)))
            .cloned()
            .collect()
    }

    /// Cookies stored for `domain`, in insertion order
    pub fn cookies(&self, domain: &str) -> Option<&[CookieRecord]> {
        self.cookies.get(domain).map(Vec::as_slice)
    }

    /// Apply one change notification
    pub fn apply(&mut self, change: &CookieChange) {
        let evicted = self.remove(&change.cookie);
        if !change.removed {
            self.add(change.cookie.clone());
        }
        debug!(
            "applied {:?} change for {}@{}{} (removed={}, evicted={})",
            change.cause,
            change.cookie.name,
            change.cookie.domain,
            change.cookie.path,
            change.removed,
            evicted
        );
    }

    /// Fill the cache from a full store enumeration
    ///
    /// Duplicate slots in the enumeration collapse to the last one seen.
    pub fn bulk_load<I>(&mut self, cookies: I) -> LoadSummary
    where
        I: IntoIterator<Item = CookieRecord>,
    {
        let mut summary = LoadSummary::default();
        for cookie in cookies {
            summary.loaded += 1;
            if self.add(cookie) == AddOutcome::Replaced {
                summary.duplicates += 1;
            }
        }
        if summary.duplicates > 0 {
            warn!(
                "cookie enumeration contained {} duplicate slot(s); kept the last of each",
                summary.duplicates
            );
        }
        summary
    }

    pub fn domain_count(&self) -> usize {
        self.cookies.len()
    }

    pub fn cookie_count(&self) -> usize {
        self.cookies.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}
