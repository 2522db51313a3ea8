//! Cookie file import/export
//!
//! Two formats are understood:
//!
//! | Format | Shape |
//! |--------|-------|
//! | JSON | array of cookie objects as the browser extension API reports them |
//! | Netscape | curl/wget `cookies.txt`, seven tab-separated columns |
//!
//! Netscape lines prefixed with `#HttpOnly_` carry the httpOnly flag; other
//! `#` lines are comments. An expiry of `0` means a session cookie.

use crate::cookie::CookieRecord;
use crate::error::{CkeditError, Result};
use crate::utils::FileUtils;
use log::debug;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// Supported cookie file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookieFileFormat {
    #[default]
    Json,
    Netscape,
}

impl FromStr for CookieFileFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(CookieFileFormat::Json),
            "netscape" | "txt" | "cookies.txt" => Ok(CookieFileFormat::Netscape),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CookieFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieFileFormat::Json => write!(f, "json"),
            CookieFileFormat::Netscape => write!(f, "netscape"),
        }
    }
}

impl CookieFileFormat {
    /// Guess the format from file content
    pub fn detect(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('[') | Some('{') => CookieFileFormat::Json,
            _ => CookieFileFormat::Netscape,
        }
    }
}

/// Parse cookie file content
pub fn parse_cookies(content: &str, format: CookieFileFormat) -> Result<Vec<CookieRecord>> {
    match format {
        CookieFileFormat::Json => parse_json(content),
        CookieFileFormat::Netscape => Ok(parse_netscape(content)),
    }
}

/// Render cookies in the given format
pub fn format_cookies(cookies: &[CookieRecord], format: CookieFileFormat) -> Result<String> {
    match format {
        CookieFileFormat::Json => Ok(serde_json::to_string_pretty(cookies)?),
        CookieFileFormat::Netscape => Ok(format_netscape(cookies)),
    }
}

fn parse_json(content: &str) -> Result<Vec<CookieRecord>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    // Some exporters wrap the list: {"cookies": [...]}
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Export {
        List(Vec<CookieRecord>),
        Wrapped { cookies: Vec<CookieRecord> },
    }
    match serde_json::from_str::<Export>(content) {
        Ok(Export::List(cookies)) | Ok(Export::Wrapped { cookies }) => Ok(cookies),
        // Re-parse as a plain list for a precise error position.
        Err(_) => Ok(serde_json::from_str::<Vec<CookieRecord>>(content)?),
    }
}

fn parse_netscape(content: &str) -> Vec<CookieRecord> {
    let mut cookies = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let (line, http_only) = match line.strip_prefix(HTTP_ONLY_PREFIX) {
            Some(rest) => (rest, true),
            None if line.starts_with('#') => continue,
            None => (line, false),
        };

        let parts: Vec<&str> = line.splitn(7, '\t').collect();
        if parts.len() < 7 {
            debug!("skipping malformed cookies.txt line {}", index + 1);
            continue;
        }

        let Ok(expiry) = parts[4].trim().parse::<i64>() else {
            debug!("skipping cookies.txt line {} with bad expiry", index + 1);
            continue;
        };
        let expiration = (expiry > 0).then_some(expiry as f64);

        cookies.push(
            CookieRecord::new(parts[5], parts[6], parts[0])
                .with_host_only(parts[1].eq_ignore_ascii_case("FALSE"))
                .with_path(parts[2])
                .with_secure(parts[3].eq_ignore_ascii_case("TRUE"))
                .with_http_only(http_only)
                .with_expiration(expiration),
        );
    }

    cookies
}

fn format_netscape(cookies: &[CookieRecord]) -> String {
    let mut lines = vec![
        "# Netscape HTTP Cookie File".to_string(),
        "# This file was generated by ckedit".to_string(),
        String::new(),
    ];

    for cookie in cookies {
        let include_subdomains = if cookie.host_only { "FALSE" } else { "TRUE" };
        let secure = if cookie.secure { "TRUE" } else { "FALSE" };
        let expiry = cookie.expiration_date.map(|t| t as i64).unwrap_or(0);

        let domain = if !cookie.host_only && !cookie.domain.starts_with('.') {
            format!(".{}", cookie.domain)
        } else {
            cookie.domain.clone()
        };
        let prefix = if cookie.http_only { HTTP_ONLY_PREFIX } else { "" };

        lines.push(format!(
            "{}{}\t{}\t{}\t{}\t{}\t{}\t{}",
            prefix, domain, include_subdomains, cookie.path, secure, expiry, cookie.name, cookie.value
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Read a cookie file, detecting the format when none is given
///
/// Returns the cookies together with the format they were read in.
pub fn load_cookie_file(
    path: &Path,
    format: Option<CookieFileFormat>,
) -> Result<(Vec<CookieRecord>, CookieFileFormat)> {
    FileUtils::check_file_readable(path)?;
    let content = std::fs::read_to_string(path)?;
    let format = format.unwrap_or_else(|| CookieFileFormat::detect(&content));
    let cookies = parse_cookies(&content, format)?;
    debug!("read {} cookie(s) from {:?} as {}", cookies.len(), path, format);
    Ok((cookies, format))
}

/// Write cookies to `path`, replacing it atomically
pub fn save_cookie_file(path: &Path, format: CookieFileFormat, cookies: &[CookieRecord]) -> Result<()> {
    let content = format_cookies(cookies, format)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.persist(path).map_err(|e| {
        CkeditError::PermissionDenied(format!("Cannot write cookie file {:?}: {}", path, e.error))
    })?;
    Ok(())
}
