//! Cookie editing session
//!
//! [`CookieSession`] ties a [`CookieCache`] to a [`CookieStore`] for the
//! lifetime of one editing session:
//!
//! ```text
//! new() -> start() [subscribe, enumerate, bulk-load] -> apply/pump ... -> stop()
//! ```
//!
//! Edits go to the store as requests. The cache learns about their effect
//! only through the change feed, the same way it learns about changes made
//! by anybody else.

use crate::cache::{CookieCache, LoadSummary};
use crate::cookie::{cookie_url, CookieRecord};
use crate::error::{CkeditError, Result};
use crate::output::parse_domain_text;
use crate::redraw::RedrawScheduler;
use crate::store::{CookieChange, CookieStore, Subscription};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of a batch of store requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSummary {
    pub issued: usize,
    pub failed: usize,
}

impl RequestSummary {
    fn record(&mut self, result: Result<()>, what: &str) {
        self.issued += 1;
        if let Err(err) = result {
            self.failed += 1;
            warn!("cookie store rejected {}: {}", what, err);
        }
    }

    fn merge(&mut self, other: RequestSummary) {
        self.issued += other.issued;
        self.failed += other.failed;
    }
}

pub struct CookieSession {
    store: Arc<dyn CookieStore>,
    cache: CookieCache,
    subscription: Option<Subscription>,
    redraw: RedrawScheduler,
}

impl CookieSession {
    pub fn new(store: Arc<dyn CookieStore>, redraw_window: Duration) -> Self {
        Self {
            store,
            cache: CookieCache::new(),
            subscription: None,
            redraw: RedrawScheduler::new(redraw_window),
        }
    }

    /// Subscribe to the change feed and load the current cookies
    ///
    /// The subscription is taken before enumerating so nothing changed in
    /// between is lost; changes already included in the enumeration apply
    /// again without effect.
    pub fn start(&mut self) -> Result<LoadSummary> {
        if self.subscription.is_some() {
            return Err(CkeditError::AlreadyListening);
        }
        let subscription = self.store.subscribe();
        let cookies = match self.store.enumerate_all() {
            Ok(cookies) => cookies,
            Err(err) => {
                self.store.unsubscribe(subscription.id);
                return Err(err);
            }
        };
        self.cache.reset();
        let summary = self.cache.bulk_load(cookies);
        info!(
            "loaded {} cookie(s) across {} domain(s)",
            self.cache.cookie_count(),
            self.cache.domain_count()
        );
        self.subscription = Some(subscription);
        Ok(summary)
    }

    /// Unsubscribe from the change feed; a no-op when not listening
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.store.unsubscribe(subscription.id);
            self.redraw.cancel();
            info!("stopped listening for cookie changes");
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Apply one notification and ask for a redraw
    pub fn apply(&mut self, change: &CookieChange) {
        self.cache.apply(change);
        self.redraw.schedule(Instant::now());
    }

    /// Apply every notification already queued, in delivery order
    pub fn pump(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some(subscription) = self.subscription.as_mut() {
            while let Ok(change) = subscription.events.try_recv() {
                pending.push(change);
            }
        }
        for change in &pending {
            self.apply(change);
        }
        pending.len()
    }

    /// Wait for the next notification; `None` when not listening or the
    /// store has gone away
    pub async fn next_change(&mut self) -> Option<CookieChange> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.events.recv().await,
            None => None,
        }
    }

    pub fn cache(&self) -> &CookieCache {
        &self.cache
    }

    pub fn redraw(&self) -> &RedrawScheduler {
        &self.redraw
    }

    pub fn redraw_mut(&mut self) -> &mut RedrawScheduler {
        &mut self.redraw
    }

    /// Ask the store to delete the slot of `cookie`
    pub fn remove_cookie(&self, cookie: &CookieRecord) -> Result<()> {
        self.store.remove_record(cookie)
    }

    /// Ask the store to delete every cached cookie of `domain`
    pub fn remove_cookies_for_domain(&self, domain: &str) -> RequestSummary {
        let mut summary = RequestSummary::default();
        for cookie in self.cache.cookies(domain).unwrap_or_default() {
            summary.record(self.remove_cookie(cookie), &format!("removal of {}", cookie.name));
        }
        summary
    }

    /// Ask the store to delete every cookie of every domain matching `filter`
    pub fn remove_all_for_filter(&self, filter: Option<&str>) -> RequestSummary {
        let mut summary = RequestSummary::default();
        for domain in self.cache.domains(filter) {
            summary.merge(self.remove_cookies_for_domain(&domain));
        }
        summary
    }

    /// Replace the cookies of `domain` with the `name=value` lines in `text`
    ///
    /// New cookies take domain, host-only flag, path, secure flag and store
    /// of the domain's first cached cookie, and are session cookies. All
    /// current cookies of the domain are removed before the new values are
    /// read and set.
    pub fn set_cookies(&self, domain: &str, text: &str) -> Result<RequestSummary> {
        let first = self
            .cache
            .cookies(domain)
            .and_then(|cookies| cookies.first())
            .ok_or_else(|| CkeditError::UnknownDomain(domain.to_string()))?;
        // Fail before deleting anything if the domain cannot be addressed.
        cookie_url(first)?;
        let template = CookieRecord::new("", "", first.domain.clone())
            .with_host_only(first.host_only)
            .with_path(first.path.clone())
            .with_secure(first.secure)
            .with_store_id(first.store_id.clone());

        let mut summary = self.remove_cookies_for_domain(domain);
        for (name, value) in parse_domain_text(text) {
            let cookie = CookieRecord {
                name: name.clone(),
                value,
                ..template.clone()
            };
            summary.record(self.store.set_record(cookie), &format!("set of {}", name));
        }
        Ok(summary)
    }
}

impl Drop for CookieSession {
    fn drop(&mut self) {
        self.stop();
    }
}
