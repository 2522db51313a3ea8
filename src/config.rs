//! Configuration management for ckedit

use std::path::PathBuf;
use std::time::Duration;

use crate::redraw::DEFAULT_REDRAW_WINDOW;
use crate::store::file::CookieFileFormat;

/// Output configuration
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub file: Option<PathBuf>,
    pub verbose: bool,
    pub silent: bool,
    pub format_json: bool,
}

/// What the invocation should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print the cookie table
    List,
    /// Delete every cookie of every matching domain
    Delete,
    /// Replace one domain's cookies with `name=value` lines
    Set {
        domain: String,
        text: Option<String>,
    },
    /// Write the store to a cookie file
    Export { path: PathBuf },
    /// Interactive session driven by the change feed
    Shell,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
    pub cookie_file: Option<PathBuf>,
    pub format: Option<CookieFileFormat>,
    /// Normalized domain filter; `None` shows every domain
    pub filter: Option<String>,
    pub redraw_window: Duration,
    pub output: OutputConfig,
}

impl Config {
    /// Format used when writing cookie files
    pub fn write_format(&self) -> CookieFileFormat {
        self.format.unwrap_or_default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            action: Action::List,
            cookie_file: None,
            format: None,
            filter: None,
            redraw_window: DEFAULT_REDRAW_WINDOW,
            output: OutputConfig::default(),
        }
    }
}
