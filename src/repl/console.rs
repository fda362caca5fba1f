//! Styled console output.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};

pub struct Console {
    out: Box<dyn Write + Send>,
    styled: bool,
    /// Spinner shown by [`Console::status`] until the next line is printed.
    spinner: Option<ProgressBar>,
}

impl Console {
    /// Console on stdout with colors.
    pub fn stdout() -> Self {
        Self {
            out: Box::new(io::stdout()),
            styled: true,
            spinner: None,
        }
    }

    /// Plain-text console writing to `out`.
    pub fn plain(out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            styled: false,
            spinner: None,
        }
    }

    /// Console that discards everything.
    pub fn sink() -> Self {
        Self::plain(Box::new(io::sink()))
    }

    fn emit(&mut self, text: String) {
        self.stop_spinner();
        // Output failures (closed stdout) are not worth aborting a session for.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    pub fn print(&mut self, text: &str) {
        self.emit(text.to_string());
    }

    /// Headline in bold green.
    pub fn success(&mut self, text: &str) {
        let line = if self.styled {
            text.green().bold().to_string()
        } else {
            text.to_string()
        };
        self.emit(line);
    }

    /// Agent answer in yellow.
    pub fn highlight(&mut self, text: &str) {
        let line = if self.styled {
            text.yellow().to_string()
        } else {
            text.to_string()
        };
        self.emit(line);
    }

    pub fn error(&mut self, text: &str) {
        let line = if self.styled {
            text.red().bold().to_string()
        } else {
            text.to_string()
        };
        self.emit(line);
    }

    /// Progress note shown before a blocking agent call.
    ///
    /// A styled console animates a spinner until the next line is printed;
    /// a plain one writes a single `[..]` line.
    pub fn status(&mut self, text: &str) {
        if !self.styled {
            self.emit(format!("[..] {text}"));
            return;
        }
        self.stop_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(text.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// One entry of a numbered menu.
    pub fn option(&mut self, index: usize, label: &str, description: &str) {
        let line = if self.styled {
            format!("{index}. {} {}", label.cyan(), description.dark_green())
        } else {
            format!("{index}. {label} {description}")
        };
        self.emit(line);
    }

    /// Separator printed after every handled command.
    pub fn rule(&mut self) {
        let rule = "-".repeat(41);
        let line = if self.styled {
            rule.white().bold().to_string()
        } else {
            rule
        };
        self.emit(line);
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}
