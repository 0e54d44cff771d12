// UI layer: prints one block per response and shows a spinner while a
// request is in flight. Output goes to any `Write` so the run can be
// captured in tests.

use crate::api::ApiResponse;
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Line printed between result blocks.
pub const SEPARATOR: &str = "----------------------------------------";

/// Last line of a completed run.
pub const DONE_LINE: &str = "All major endpoints tested!";

pub struct Reporter<W: Write> {
    out: W,
    color: bool,
    progress: bool,
}

impl<W: Write> Reporter<W> {
    /// Plain reporter: no colour, no spinner.
    pub fn new(out: W) -> Self {
        Reporter { out, color: false, progress: false }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Show a spinner on stderr while waiting. indicatif hides it on its
    /// own when stderr is not a terminal.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Start the spinner for a step. The caller clears it before reporting.
    pub fn begin(&self, name: &str) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("{}...", name));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Print `"<name>: <code> <reason>"`, the body and the separator.
    pub fn report(&mut self, name: &str, resp: &ApiResponse) -> Result<()> {
        let status_line = format!("{}: {} {}", name, resp.status.as_u16(), resp.reason());
        let written = if self.color {
            let styled = if resp.status.is_success() {
                status_line.green()
            } else if resp.status.is_redirection() {
                status_line.yellow()
            } else {
                status_line.red()
            };
            writeln!(self.out, "{}", styled)
        } else {
            writeln!(self.out, "{}", status_line)
        };
        written.context("Failed to write status line")?;

        writeln!(self.out, "{}", render_body(resp)).context("Failed to write body")?;
        writeln!(self.out, "{}", SEPARATOR).context("Failed to write separator")?;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        writeln!(self.out, "{}", DONE_LINE).context("Failed to write final line")?;
        self.out.flush().context("Failed to flush output")?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Pretty JSON when the body parses, the raw text otherwise.
fn render_body(resp: &ApiResponse) -> String {
    match resp.json() {
        Some(v) => serde_json::to_string_pretty(&v).unwrap_or_else(|_| resp.text.clone()),
        None => resp.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn response(status: u16, text: &str) -> ApiResponse {
        ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            text: text.to_string(),
        }
    }

    #[test]
    fn separator_is_forty_dashes() {
        assert_eq!(SEPARATOR.len(), 40);
        assert!(SEPARATOR.chars().all(|c| c == '-'));
    }

    #[test]
    fn json_block_layout() {
        let mut r = Reporter::new(Vec::new());
        r.report("Login Admin", &response(200, r#"{"token":"t1"}"#)).unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        let expected = format!("Login Admin: 200 OK\n{{\n  \"token\": \"t1\"\n}}\n{}\n", SEPARATOR);
        assert_eq!(out, expected);
    }

    #[test]
    fn raw_text_when_not_json() {
        let mut r = Reporter::new(Vec::new());
        r.report("List Questions", &response(404, "Not Found")).unwrap();
        r.finish().unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec!["List Questions: 404 Not Found", "Not Found", SEPARATOR, DONE_LINE]
        );
    }

    #[test]
    fn colored_status_line_keeps_text() {
        let mut r = Reporter::new(Vec::new()).with_color(true);
        r.report("Register User", &response(409, r#"{"message":"x"}"#)).unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert!(out.contains("Register User: 409 Conflict"));
        assert!(out.ends_with(&format!("{}\n", SEPARATOR)));
    }
}
