//! Diagnostic Log Module
//!
//! Append-only text log of what the explanation layer sent and received.
//! Each write opens the file, appends one timestamped block and closes it
//! again, so concurrent writers never share a handle. Write failures are
//! reported through `tracing` and otherwise ignored: diagnostics must never
//! abort an assessment.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let log = DiagnosticLog::new("server_debug.log");
//! log.write("PROMPT SENT: ...");
//! ```

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Timestamped append-only sink for prompts, raw responses and failures.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    path: Option<PathBuf>,
}

impl DiagnosticLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A log that drops every entry.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends `message` as `\n[timestamp] message\n`.
    pub fn write(&self, message: &str) {
        let Some(path) = &self.path else {
            return;
        };

        let entry = format!(
            "\n[{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            message
        );

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(entry.as_bytes()));

        if let Err(e) = result {
            warn!("Failed to write diagnostic log {:?}: {}", path, e);
        }
    }
}
