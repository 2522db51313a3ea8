//! Output formatting and display utilities

use crate::cache::CookieCache;
use crate::config::OutputConfig;
use crate::cookie::CookieRecord;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Shown in place of the table when no domain matches the filter
pub const NOT_FOUND_MESSAGE: &str = "Cookie Not Found!";

/// Output writer that handles file vs stdout
pub struct OutputWriter {
    config: OutputConfig,
}

impl OutputWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Write content to configured output
    pub fn write(&self, content: &str) -> Result<()> {
        if let Some(file_path) = &self.config.file {
            self.write_to_file(content, file_path)
        } else {
            self.write_to_stdout(content)
        }
    }

    /// Write verbose information (if enabled)
    pub fn write_verbose(&self, message: &str) -> Result<()> {
        if self.config.verbose && !self.config.silent {
            eprintln!("* {}", message);
        }
        Ok(())
    }

    /// Write error message
    pub fn write_error(&self, message: &str) -> Result<()> {
        if !self.config.silent {
            eprintln!("ckedit: error: {}", message);
        }
        Ok(())
    }

    /// Render the cache the way the configuration asks for
    pub fn render(&self, cache: &CookieCache, filter: Option<&str>) -> Result<String> {
        if self.config.format_json {
            render_json(cache, filter)
        } else {
            Ok(render_table(cache, filter))
        }
    }

    fn write_to_file(&self, content: &str, file_path: &Path) -> Result<()> {
        let mut file = File::create(file_path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_to_stdout(&self, content: &str) -> Result<()> {
        io::stdout().write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Editable text for one domain: a `name=value` line per cookie
pub fn domain_text(cookies: &[CookieRecord]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}\n", c.name, c.value))
        .collect()
}

/// Parse edited domain text back into `(name, value)` pairs
///
/// Blank lines are skipped. Each line splits on its first `=`; a line
/// without one names a cookie with an empty value.
pub fn parse_domain_text(text: &str) -> Vec<(String, String)> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once('=') {
            Some((name, value)) => (name.to_string(), value.to_string()),
            None => (line.to_string(), String::new()),
        })
        .collect()
}

/// Plain-text table of domains matching `filter` and their cookies
pub fn render_table(cache: &CookieCache, filter: Option<&str>) -> String {
    let domains = cache.domains(filter);
    let total = cache.domain_count();
    let mut out = String::new();

    let _ = writeln!(out, "Domains: {} / {}", domains.len(), total);
    if domains.is_empty() {
        let _ = writeln!(out, "{}", NOT_FOUND_MESSAGE);
        return out;
    }

    for domain in &domains {
        let _ = writeln!(out, "{}", domain);
        let cookies = cache.cookies(domain).unwrap_or_default();
        for line in domain_text(cookies).lines() {
            let _ = writeln!(out, "    {}", line);
        }
    }
    out
}

#[derive(Serialize)]
struct JsonView<'a> {
    total: usize,
    matched: usize,
    domains: BTreeMap<&'a str, &'a [CookieRecord]>,
}

/// JSON document of domains matching `filter` and their cookies
pub fn render_json(cache: &CookieCache, filter: Option<&str>) -> Result<String> {
    let names = cache.domains(filter);
    let domains = names
        .iter()
        .filter_map(|d| cache.cookies(d).map(|cookies| (d.as_str(), cookies)))
        .collect::<BTreeMap<_, _>>();
    let view = JsonView {
        total: cache.domain_count(),
        matched: domains.len(),
        domains,
    };
    let mut json = serde_json::to_string_pretty(&view)?;
    json.push('\n');
    Ok(json)
}
