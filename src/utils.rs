//! Utility functions and helpers

use crate::error::{CkeditError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate and normalize URL
    pub fn validate_url(input: &str) -> Result<Url> {
        // Add http:// if no scheme is provided
        let url_str = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        Url::parse(&url_str)
            .map_err(|e| CkeditError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))
    }

    /// Host of a tab URL, used as the initial domain filter
    pub fn filter_from_url(input: &str) -> Result<String> {
        let url = Self::validate_url(input)?;
        url.host_str()
            .map(|h| h.to_string())
            .ok_or_else(|| CkeditError::InvalidUrl(format!("URL has no host: {}", input)))
    }
}

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Expand tilde (~) in file paths
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        if let Some(rest) = path.strip_prefix('~') {
            if let Some(home_dir) = dirs::home_dir() {
                Ok(home_dir.join(rest.trim_start_matches('/')))
            } else {
                Err(CkeditError::Config(
                    "Cannot determine home directory".to_string(),
                ))
            }
        } else {
            Ok(PathBuf::from(path))
        }
    }

    /// Check if file exists and is readable
    pub fn check_file_readable(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(CkeditError::FileNotFound(format!(
                "File not found: {:?}",
                path
            )));
        }

        if !path.is_file() {
            return Err(CkeditError::Config(format!("Path is not a file: {:?}", path)));
        }

        std::fs::File::open(path).map_err(|e| {
            CkeditError::PermissionDenied(format!("Cannot read file {:?}: {}", path, e))
        })?;

        Ok(())
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Normalize filter box input: trim and drop the first `www.`
    ///
    /// Returns `None` when nothing is left to filter on.
    pub fn normalize_filter(input: &str) -> Option<String> {
        let filter = input.trim().replacen("www.", "", 1);
        if filter.is_empty() {
            None
        } else {
            Some(filter)
        }
    }

    /// Parse a duration in milliseconds (supports suffixes 'ms' and 's')
    pub fn parse_millis(input: &str) -> Result<Duration> {
        let input = input.trim();
        if let Ok(millis) = input.parse::<u64>() {
            return Ok(Duration::from_millis(millis));
        }

        let (number_part, factor) = if let Some(stripped) = input.strip_suffix("ms") {
            (stripped, 1)
        } else if let Some(stripped) = input.strip_suffix('s') {
            (stripped, 1000)
        } else {
            return Err(CkeditError::Config(format!(
                "Invalid duration format: '{}'. Use milliseconds with optional suffix (ms/s)",
                input
            )));
        };

        let number: u64 = number_part
            .parse()
            .map_err(|_| CkeditError::Config(format!("Invalid duration number: '{}'", number_part)))?;

        Ok(Duration::from_millis(number * factor))
    }
}

#[cfg(test)]
mod tests;
