//! Interactive cookie shell
//!
//! Reads commands from stdin while following the store's change feed. Every
//! applied change asks the redraw scheduler for a redraw; the table is
//! printed once per coalescing window, not once per change.
//!
//! ```text
//! filter <text>    show only domains containing <text>
//! reset            clear the filter
//! show             redraw now
//! delete-all       delete every cookie of every shown domain
//! delete <domain>  delete the cookies of one domain
//! edit <domain>    replace a domain's cookies; name=value lines, end with "."
//! help             list commands
//! quit             leave the shell
//! ```

use crate::error::{CkeditError, Result};
use crate::output::{domain_text, OutputWriter};
use crate::session::{CookieSession, RequestSummary};
use crate::utils::StringUtils;
use log::warn;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

const HELP: &str = "commands: filter <text> | reset | show | delete-all | delete <domain> | edit <domain> | help | quit\n";

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Filter(Option<String>),
    Reset,
    Show,
    DeleteAll,
    Delete(String),
    Edit(String),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match (word, rest) {
            ("", _) => ShellCommand::Empty,
            ("filter", text) => ShellCommand::Filter(StringUtils::normalize_filter(text)),
            ("reset", _) => ShellCommand::Reset,
            ("show", _) => ShellCommand::Show,
            ("delete-all", _) => ShellCommand::DeleteAll,
            ("delete", domain) if !domain.is_empty() => ShellCommand::Delete(domain.to_string()),
            ("edit", domain) if !domain.is_empty() => ShellCommand::Edit(domain.to_string()),
            ("help", _) | ("?", _) => ShellCommand::Help,
            ("quit", _) | ("exit", _) => ShellCommand::Quit,
            _ => ShellCommand::Unknown(line.to_string()),
        }
    }
}

/// Text collected by an `edit` command until its terminating "."
struct PendingEdit {
    domain: String,
    text: String,
}

struct Shell<'a> {
    session: &'a mut CookieSession,
    writer: &'a OutputWriter,
    filter: Option<String>,
    editing: Option<PendingEdit>,
}

impl Shell<'_> {
    fn redraw(&mut self) -> Result<()> {
        self.session.redraw_mut().cancel();
        let table = self.writer.render(self.session.cache(), self.filter.as_deref())?;
        self.writer.write(&table)
    }

    fn report(&self, summary: RequestSummary) -> Result<()> {
        if summary.failed > 0 {
            self.writer.write_error(&format!(
                "{} of {} request(s) were rejected by the cookie store",
                summary.failed, summary.issued
            ))?;
        }
        Ok(())
    }

    /// Handle one input line. Returns false when the shell should exit.
    fn handle_line(&mut self, line: &str) -> Result<bool> {
        if let Some(edit) = self.editing.as_mut() {
            if line.trim_end() != "." {
                edit.text.push_str(line);
                edit.text.push('\n');
                return Ok(true);
            }
            let Some(edit) = self.editing.take() else {
                return Ok(true);
            };
            match self.session.set_cookies(&edit.domain, &edit.text) {
                Ok(summary) => self.report(summary)?,
                Err(err) => self.writer.write_error(&err.to_string())?,
            }
            return Ok(true);
        }

        match ShellCommand::parse(line) {
            ShellCommand::Empty => {}
            ShellCommand::Filter(filter) => {
                self.filter = filter;
                self.redraw()?;
            }
            ShellCommand::Reset => {
                if self.filter.take().is_some() {
                    self.redraw()?;
                }
            }
            ShellCommand::Show => self.redraw()?,
            ShellCommand::DeleteAll => {
                let summary = self.session.remove_all_for_filter(self.filter.as_deref());
                self.report(summary)?;
            }
            ShellCommand::Delete(domain) => {
                let summary = self.session.remove_cookies_for_domain(&domain);
                self.report(summary)?;
            }
            ShellCommand::Edit(domain) => match self.session.cache().cookies(&domain) {
                Some(cookies) => {
                    let current = domain_text(cookies);
                    self.writer.write(&current)?;
                    self.editing = Some(PendingEdit {
                        domain,
                        text: String::new(),
                    });
                }
                None => self
                    .writer
                    .write_error(&CkeditError::UnknownDomain(domain).to_string())?,
            },
            ShellCommand::Help => self.writer.write(HELP)?,
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Unknown(line) => {
                self.writer.write_error(&format!("unknown command: {}", line))?;
            }
        }
        Ok(true)
    }
}

/// Run the shell until `quit` or end of input
pub async fn run(
    session: &mut CookieSession,
    filter: Option<String>,
    writer: &OutputWriter,
) -> Result<()> {
    if !session.is_listening() {
        return Err(CkeditError::Store(
            "shell needs a session listening for cookie changes".to_string(),
        ));
    }
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shell = Shell {
        session,
        writer,
        filter,
        editing: None,
    };
    shell.redraw()?;

    loop {
        let timer = shell.session.redraw().clone();
        tokio::select! {
            line = lines.next_line() => {
                let keep_going = match line? {
                    Some(line) => shell.handle_line(&line)?,
                    None => false,
                };
                if !keep_going {
                    break;
                }
            }
            change = shell.session.next_change() => match change {
                Some(change) => shell.session.apply(&change),
                None => {
                    return Err(CkeditError::Store("cookie change feed closed".to_string()));
                }
            },
            _ = timer.wait() => {
                if shell.session.redraw_mut().fire(Instant::now()) {
                    shell.redraw()?;
                }
            }
        }
    }

    if shell.editing.is_some() {
        warn!("discarding unfinished edit");
    }
    // Show the outcome of requests issued right before leaving.
    shell.session.pump();
    if shell.session.redraw().is_pending() {
        shell.redraw()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use crate::cookie::CookieRecord;
    use crate::store::MemoryCookieStore;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn parse_recognizes_commands() {
        assert_eq!(
            ShellCommand::parse("filter www.example.com"),
            ShellCommand::Filter(Some("example.com".to_string()))
        );
        assert_eq!(ShellCommand::parse("filter"), ShellCommand::Filter(None));
        assert_eq!(ShellCommand::parse("  "), ShellCommand::Empty);
        assert_eq!(
            ShellCommand::parse("delete  x.com "),
            ShellCommand::Delete("x.com".to_string())
        );
        assert_eq!(
            ShellCommand::parse("delete"),
            ShellCommand::Unknown("delete".to_string())
        );
        assert_eq!(ShellCommand::parse("exit"), ShellCommand::Quit);
    }

    #[tokio::test]
    async fn run_refuses_a_stopped_session() {
        let store = Arc::new(MemoryCookieStore::new());
        let mut session = CookieSession::new(store, Duration::from_millis(250));
        let writer = OutputWriter::new(OutputConfig {
            silent: true,
            ..OutputConfig::default()
        });
        let err = run(&mut session, None, &writer).await.expect_err("not started");
        assert!(matches!(err, CkeditError::Store(_)));
    }

    #[tokio::test]
    async fn edit_collects_lines_until_dot() {
        let store = Arc::new(MemoryCookieStore::with_cookies(vec![CookieRecord::new(
            "a", "1", "x.com",
        )]));
        let mut session = CookieSession::new(store.clone(), Duration::from_millis(250));
        session.start().expect("start");
        let temp = tempfile::tempdir().expect("tempdir");
        let writer = OutputWriter::new(OutputConfig {
            silent: true,
            file: Some(temp.path().join("table.txt")),
            ..OutputConfig::default()
        });
        let mut shell = Shell {
            session: &mut session,
            writer: &writer,
            filter: None,
            editing: None,
        };

        assert!(shell.handle_line("edit x.com").expect("edit"));
        assert!(shell.handle_line("a=2").expect("line"));
        assert!(shell.handle_line("b=3").expect("line"));
        assert_eq!(store.len(), 1);
        assert!(shell.handle_line(".").expect("commit"));
        assert!(!shell.handle_line("quit").expect("quit"));

        session.pump();
        let cookies = session.cache().cookies("x.com").expect("x.com");
        let values: Vec<_> = cookies.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["2", "3"]);
    }
}
