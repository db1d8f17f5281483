//! Output formatter for human-readable and JSON output
//!
//! Every `render_*` method returns the text a command would print, or `None`
//! when the current flags suppress it; the printing methods are thin wrappers.

use serde::Serialize;

use super::OutputConfig;

/// Formatter for CLI output
///
/// When JSON mode is enabled, all output is strict JSON without colors.
/// Quiet mode suppresses everything on stdout, JSON included.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    fn render_success(&self, message: &str) -> Option<String> {
        if self.config.quiet || self.config.json {
            return None;
        }
        Some(if self.colors_enabled() {
            format!("\x1b[32m✓\x1b[0m {message}")
        } else {
            format!("✓ {message}")
        })
    }

    fn render_error(&self, message: &str) -> String {
        if self.config.json {
            let error = serde_json::json!({ "error": message });
            serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
        } else if self.colors_enabled() {
            format!("\x1b[31m✗\x1b[0m {message}")
        } else {
            format!("✗ {message}")
        }
    }

    fn render_line(&self, message: &str) -> Option<String> {
        (!self.config.quiet).then(|| message.to_string())
    }

    fn render_json<T: Serialize>(&self, value: &T) -> serde_json::Result<Option<String>> {
        if self.config.quiet {
            return Ok(None);
        }
        serde_json::to_string_pretty(value).map(Some)
    }

    /// Output a success message (human mode only)
    pub fn success(&self, message: &str) {
        if let Some(line) = self.render_success(message) {
            println!("{line}");
        }
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.render_error(message));
    }

    /// Output a value as pretty JSON, whatever the mode
    pub fn json<T: Serialize>(&self, value: &T) {
        match self.render_json(value) {
            Ok(Some(json)) => println!("{json}"),
            Ok(None) => {}
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Print a line of text
    pub fn println(&self, message: &str) {
        if let Some(line) = self.render_line(message) {
            println!("{line}");
        }
    }

    /// Report a completed change: `value` in JSON mode, `message` otherwise
    pub fn report_success<T: Serialize>(&self, value: &T, message: &str) {
        if self.config.json {
            self.json(value);
        } else {
            self.success(message);
        }
    }

    /// Report a result: `value` in JSON mode, `line` as plain text otherwise
    pub fn report<T: Serialize>(&self, value: &T, line: &str) {
        if self.config.json {
            self.json(value);
        } else {
            self.println(line);
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
