use crate::error::Result;
use crate::paths;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Mutex;

/// Side-effecting log of committed changes.
///
/// The returned string becomes the batch success message for transitions that
/// have no fixed message. Downstream consumers index the message array by
/// position, so implementations return an empty string rather than skipping.
pub trait AuditLog {
    fn log(&self, package: &str, description: &str) -> Result<String>;
}

/// Emits a `tracing` event per change and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAudit;

impl AuditLog for TracingAudit {
    fn log(&self, package: &str, description: &str) -> Result<String> {
        tracing::info!(package, "{description}");
        Ok(String::new())
    }
}

/// Appends `<timestamp> <package> <description>` lines to `.pkgdb/audit.log`.
#[derive(Debug, Clone)]
pub struct FileAudit {
    path: PathBuf,
}

impl FileAudit {
    pub fn new(root: &std::path::Path) -> Self {
        Self {
            path: paths::audit_log_path(root),
        }
    }
}

impl AuditLog for FileAudit {
    fn log(&self, package: &str, description: &str) -> Result<String> {
        let line = format!("{} {package} {description}\n", Utc::now().to_rfc3339());
        crate::io::append_text(&self.path, &line)?;
        tracing::info!(package, "{description}");
        Ok(String::new())
    }
}

/// Keeps every description in memory; handy in tests.
#[derive(Debug, Default)]
pub struct RecordingAudit {
    entries: Mutex<Vec<(String, String)>>,
}

impl RecordingAudit {
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl AuditLog for RecordingAudit {
    fn log(&self, package: &str, description: &str) -> Result<String> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((package.to_string(), description.to_string()));
        }
        Ok(String::new())
    }
}
