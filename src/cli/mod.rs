//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and application entry point.

use crate::config::{Action, Config};
use crate::error::{CkeditError, Result};
use crate::exit_code::exit_code_for_error;
use crate::i18n::localize_error;
use crate::output::OutputWriter;
use crate::session::CookieSession;
use crate::store::file::{load_cookie_file, save_cookie_file, CookieFileFormat};
use crate::store::{CookieStore, MemoryCookieStore};
use crate::utils::{FileUtils, StringUtils, UrlUtils};
use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use log::info;
use std::io::Read;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod shell;

/// Main entry point for the CLI application
pub fn run() {
    let app = create_app();
    let matches = app.get_matches();
    crate::logging::init(matches.get_flag("verbose"));

    if let Err(err) = run_with_args(&matches) {
        let code = match err.downcast_ref::<CkeditError>() {
            Some(cause) => {
                if err.chain().count() > 1 {
                    eprintln!("ckedit: error: {}: {}", err, localize_error(cause));
                } else {
                    eprintln!("ckedit: error: {}", localize_error(cause));
                }
                exit_code_for_error(cause)
            }
            None => {
                eprintln!("ckedit: error: {:#}", err);
                1
            }
        };
        std::process::exit(code);
    }
}

/// Run ckedit with parsed command line arguments
fn run_with_args(matches: &ArgMatches) -> anyhow::Result<()> {
    let config = build_config_from_args(matches)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CkeditError::Config(format!("Failed to create async runtime: {}", e)))?;

    rt.block_on(execute(config))
}

/// Create the CLI application structure
pub fn create_app() -> Command {
    Command::new("ckedit")
        .version(crate::VERSION)
        .about("Edit browser cookies grouped by domain")
        .subcommand(Command::new("list").about("Show cookies of the domains matching the filter"))
        .subcommand(Command::new("delete").about("Delete all cookies of the domains matching the filter"))
        .subcommand(
            Command::new("set")
                .about("Replace a domain's cookies with name=value lines")
                .arg(Arg::new("domain")
                    .help("Domain whose cookies are replaced")
                    .required(true)
                    .index(1))
                .arg(Arg::new("text")
                    .help("name=value lines; read from stdin when omitted")
                    .index(2)),
        )
        .subcommand(
            Command::new("export")
                .about("Write all cookies to a file")
                .arg(Arg::new("path")
                    .help("Destination file")
                    .required(true)
                    .index(1)),
        )
        .subcommand(Command::new("shell").about("Interactive editor that follows cookie changes"))
        .arg(Arg::new("file")
            .short('f')
            .long("file")
            .value_name("PATH")
            .env("CKEDIT_COOKIE_FILE")
            .help("Cookie file (JSON or Netscape cookies.txt) backing the cookie store")
            .global(true))
        .arg(Arg::new("format")
            .long("format")
            .value_name("json|netscape")
            .help("Cookie file format; detected from content when reading")
            .global(true))
        .arg(Arg::new("filter")
            .long("filter")
            .value_name("TEXT")
            .help("Only show domains containing TEXT")
            .global(true))
        .arg(Arg::new("url")
            .long("url")
            .value_name("URL")
            .help("Filter on the host of URL (as for the active tab)")
            .conflicts_with("filter")
            .global(true))
        .arg(Arg::new("json")
            .long("json")
            .help("Print cookies as JSON")
            .action(clap::ArgAction::SetTrue)
            .global(true))
        .arg(Arg::new("redraw-ms")
            .long("redraw-ms")
            .value_name("MILLISECONDS")
            .help("Coalescing window for redraws in the shell")
            .default_value("250")
            .global(true))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Verbose output")
            .action(clap::ArgAction::SetTrue)
            .global(true))
        .arg(Arg::new("silent")
            .short('s')
            .long("silent")
            .help("Silent mode")
            .action(clap::ArgAction::SetTrue)
            .global(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .help("Write output to file")
            .global(true))
}

/// Build configuration from command line arguments
pub fn build_config_from_args(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config::default();

    config.action = match matches.subcommand() {
        Some(("delete", _)) => Action::Delete,
        Some(("set", sub)) => Action::Set {
            domain: sub.get_one::<String>("domain").cloned().unwrap_or_default(),
            text: sub.get_one::<String>("text").cloned(),
        },
        Some(("export", sub)) => {
            let path = sub.get_one::<String>("path").map(String::as_str).unwrap_or_default();
            Action::Export {
                path: FileUtils::expand_path(path)?,
            }
        }
        Some(("shell", _)) => Action::Shell,
        _ => Action::List,
    };

    // Cookie file
    if let Some(file) = matches.get_one::<String>("file") {
        config.cookie_file = Some(FileUtils::expand_path(file)?);
    }

    if let Some(format_str) = matches.get_one::<String>("format") {
        let format = format_str.parse::<CookieFileFormat>().map_err(|_| {
            CkeditError::Config(format!("Unknown cookie file format: {}", format_str))
        })?;
        config.format = Some(format);
    }

    // Domain filter, from text or from a tab URL
    if let Some(filter) = matches.get_one::<String>("filter") {
        config.filter = StringUtils::normalize_filter(filter);
    } else if let Some(url) = matches.get_one::<String>("url") {
        config.filter = StringUtils::normalize_filter(&UrlUtils::filter_from_url(url)?);
    }

    if let Some(window) = matches.get_one::<String>("redraw-ms") {
        config.redraw_window = StringUtils::parse_millis(window)?;
    }

    // Configure output
    config.output.verbose = matches.get_flag("verbose");
    config.output.silent = matches.get_flag("silent");
    config.output.format_json = matches.get_flag("json");

    if let Some(output_file) = matches.get_one::<String>("output") {
        config.output.file = Some(FileUtils::expand_path(output_file)?);
    }

    Ok(config)
}

/// Load the store, run the requested action, and save the store back
async fn execute(config: Config) -> anyhow::Result<()> {
    // `--format` names the export target's format, not the source's.
    let exporting = matches!(config.action, Action::Export { .. });
    let mut file_format = config.write_format();

    let store = Arc::new(MemoryCookieStore::new());
    if let Some(path) = &config.cookie_file {
        if path.exists() || config.action != Action::Shell {
            let requested = if exporting { None } else { config.format };
            let (cookies, format) = load_cookie_file(path, requested)
                .with_context(|| format!("cannot load cookies from {}", path.display()))?;
            file_format = format;
            for cookie in cookies {
                store.insert(cookie);
            }
        }
    }

    let writer = OutputWriter::new(config.output.clone());
    let mut session = CookieSession::new(store.clone(), config.redraw_window);
    let loaded = session.start()?;
    let expired = store.expire(unix_now());
    if expired > 0 {
        session.pump();
        info!("dropped {} expired cookie(s)", expired);
    }
    writer.write_verbose(&format!(
        "{} cookie(s) in {} domain(s)",
        loaded.loaded - loaded.duplicates,
        session.cache().domain_count()
    ))?;

    let filter = config.filter.as_deref();
    match &config.action {
        Action::List => {
            writer.write(&writer.render(session.cache(), filter)?)?;
        }
        Action::Delete => {
            let summary = session.remove_all_for_filter(filter);
            let applied = session.pump();
            info!(
                "issued {} removal(s), {} failed, {} change(s) confirmed",
                summary.issued, summary.failed, applied
            );
            save_store(&config, file_format, store.as_ref())?;
            writer.write(&writer.render(session.cache(), filter)?)?;
        }
        Action::Set { domain, text } => {
            let text = match text {
                Some(text) => text.clone(),
                None => read_stdin()?,
            };
            let summary = session.set_cookies(domain, &text)?;
            session.pump();
            info!("issued {} request(s), {} failed", summary.issued, summary.failed);
            save_store(&config, file_format, store.as_ref())?;
            writer.write(&writer.render(session.cache(), Some(domain))?)?;
        }
        Action::Export { path } => {
            save_cookie_file(path, config.write_format(), &store.enumerate_all()?)
                .with_context(|| format!("cannot export cookies to {}", path.display()))?;
            writer.write_verbose(&format!("exported to {}", path.display()))?;
        }
        Action::Shell => {
            shell::run(&mut session, config.filter.clone(), &writer).await?;
            save_store(&config, file_format, store.as_ref())?;
        }
    }

    session.stop();
    Ok(())
}

fn save_store(config: &Config, format: CookieFileFormat, store: &dyn CookieStore) -> Result<()> {
    if let Some(path) = &config.cookie_file {
        save_cookie_file(path, format, &store.enumerate_all()?)?;
        info!("saved cookie store to {}", path.display());
    }
    Ok(())
}

/// Seconds since the Unix epoch, the unit of cookie expiration dates
fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}
