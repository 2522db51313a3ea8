//! Coalescing redraw timer
//!
//! Cookie changes arrive in bursts (clearing a site fires one notification
//! per cookie). Each change asks for a redraw, but only the first request in
//! a window arms the timer; the rest are absorbed. The redraw happens once,
//! `window` after that first request.

use std::future;
use std::time::Duration;
use tokio::time::{self, Instant};

/// Default coalescing window
pub const DEFAULT_REDRAW_WINDOW: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    window: Duration,
    deadline: Option<Instant>,
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REDRAW_WINDOW)
    }
}

impl RedrawScheduler {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Request a redraw. Returns true if this armed the timer.
    pub fn schedule(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.window);
        true
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm if the deadline has passed. Returns true when the caller
    /// should redraw now.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Forget a pending redraw; a full redraw is happening anyway
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Sleep until the armed deadline. Never completes while disarmed, so it
    /// can sit in a `select!` arm unconditionally.
    pub async fn wait(&self) {
        match self.deadline {
            Some(deadline) => time::sleep_until(deadline).await,
            None => future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_into_one_redraw() {
        let start = Instant::now();
        let mut redraw = RedrawScheduler::default();

        assert!(redraw.schedule(start));
        for offset in [10, 50, 249] {
            assert!(!redraw.schedule(start + Duration::from_millis(offset)));
        }
        assert_eq!(redraw.deadline(), Some(start + DEFAULT_REDRAW_WINDOW));

        assert!(!redraw.fire(start + Duration::from_millis(249)));
        assert!(redraw.fire(start + Duration::from_millis(250)));
        assert!(!redraw.is_pending());
        assert!(!redraw.fire(start + Duration::from_millis(600)));
    }

    #[test]
    fn trigger_after_firing_opens_a_new_window() {
        let start = Instant::now();
        let mut redraw = RedrawScheduler::new(Duration::from_millis(100));
        redraw.schedule(start);
        assert!(redraw.fire(start + Duration::from_millis(100)));

        let later = start + Duration::from_millis(130);
        assert!(redraw.schedule(later));
        assert_eq!(redraw.deadline(), Some(later + Duration::from_millis(100)));
    }

    #[test]
    fn cancel_disarms() {
        let start = Instant::now();
        let mut redraw = RedrawScheduler::default();
        redraw.schedule(start);
        redraw.cancel();
        assert!(!redraw.is_pending());
        assert!(!redraw.fire(start + Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_returns_at_deadline() {
        let mut redraw = RedrawScheduler::default();
        let start = Instant::now();
        redraw.schedule(start);
        redraw.wait().await;
        assert!(Instant::now() >= start + DEFAULT_REDRAW_WINDOW);
        assert!(redraw.fire(Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_pends_while_disarmed() {
        let redraw = RedrawScheduler::default();
        let timed_out = time::timeout(Duration::from_secs(5), redraw.wait()).await;
        assert!(timed_out.is_err());
    }
}
