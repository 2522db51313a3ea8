//! ckedit - edit browser cookies grouped by domain
//!
//! This crate keeps a domain-indexed mirror of a host cookie store and
//! keeps it current from the store's change feed. Edits are sent to the
//! store as requests; the mirror only changes when the store reports them.

pub mod cache;
pub mod cli;
pub mod config;
pub mod cookie;
pub mod error;
pub mod exit_code;
pub mod i18n;
pub mod logging;
pub mod output;
pub mod redraw;
pub mod session;
pub mod store;
pub mod utils;

pub use cache::CookieCache;
pub use cookie::CookieRecord;
pub use error::{CkeditError, Result};
pub use session::CookieSession;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
