//! Converter configuration

use crate::preview::DEFAULT_PREVIEW_ROWS;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Footer appended to every summary message
pub const DEFAULT_FOOTER: &str = "Community: https://discord.gg/openfreeai 🚀";

/// Options shared by every conversion a [`Converter`](crate::Converter) runs
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tabconvert::ConverterOptions;
///
/// let options = ConverterOptions::new()
///     .output_dir("/tmp/conversions")
///     .preview_rows(5)
///     .fetch_timeout(Duration::from_secs(30));
/// assert_eq!(options.preview_rows_value(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    output_dir: PathBuf,
    preview_rows: usize,
    fetch_timeout: Option<Duration>,
    user_agent: String,
    footer: String,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterOptions {
    /// Defaults: outputs under `<tmp>/tabconvert`, 10 preview rows, no
    /// fetch timeout beyond the HTTP client's own
    pub fn new() -> Self {
        ConverterOptions {
            output_dir: std::env::temp_dir().join("tabconvert"),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            fetch_timeout: None,
            user_agent: concat!("tabconvert/", env!("CARGO_PKG_VERSION")).to_string(),
            footer: DEFAULT_FOOTER.to_string(),
        }
    }

    /// Defaults overridden by `TABCONVERT_OUTPUT_DIR`,
    /// `TABCONVERT_PREVIEW_ROWS` and `TABCONVERT_FETCH_TIMEOUT_SECS`.
    ///
    /// Unparseable numbers are ignored with a warning.
    pub fn from_env() -> Self {
        Self::new().merge_env(|key| std::env::var(key).ok())
    }

    fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("TABCONVERT_OUTPUT_DIR").filter(|d| !d.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("TABCONVERT_PREVIEW_ROWS") {
            match raw.trim().parse() {
                Ok(rows) => self.preview_rows = rows,
                Err(_) => warn!("Ignoring TABCONVERT_PREVIEW_ROWS={:?}", raw),
            }
        }
        if let Some(raw) = lookup("TABCONVERT_FETCH_TIMEOUT_SECS") {
            match raw.trim().parse() {
                Ok(secs) => self.fetch_timeout = Some(Duration::from_secs(secs)),
                Err(_) => warn!("Ignoring TABCONVERT_FETCH_TIMEOUT_SECS={:?}", raw),
            }
        }
        self
    }

    /// Root directory under which each request gets its own subdirectory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Number of rows rendered in the preview
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Upper bound on a remote fetch
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// User-Agent header sent with remote fetches
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Summary footer; an empty footer is left out of the summary
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    pub fn output_dir_path(&self) -> &Path {
        &self.output_dir
    }

    pub fn preview_rows_value(&self) -> usize {
        self.preview_rows
    }

    pub fn fetch_timeout_value(&self) -> Option<Duration> {
        self.fetch_timeout
    }

    pub fn user_agent_value(&self) -> &str {
        &self.user_agent
    }

    pub fn footer_value(&self) -> &str {
        &self.footer
    }
}
