use crate::error::{PkgdbError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PKGDB_DIR: &str = ".pkgdb";

pub const CONFIG_FILE: &str = ".pkgdb/config.yaml";
pub const DB_FILE: &str = ".pkgdb/db.yaml";
pub const DB_LOCK_FILE: &str = ".pkgdb/db.lock";
pub const AUDIT_LOG_FILE: &str = ".pkgdb/audit.log";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn pkgdb_dir(root: &Path) -> PathBuf {
    root.join(PKGDB_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn db_path(root: &Path) -> PathBuf {
    root.join(DB_FILE)
}

pub fn db_lock_path(root: &Path) -> PathBuf {
    root.join(DB_LOCK_FILE)
}

pub fn audit_log_path(root: &Path) -> PathBuf {
    root.join(AUDIT_LOG_FILE)
}

// ---------------------------------------------------------------------------
// Name validation
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+\-]*$").unwrap())
}

/// Package and branch names: alphanumerics plus `.`, `_`, `+`, `-`.
pub fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 200 || !name_re().is_match(name) {
        return Err(PkgdbError::InvalidRequest(vec![format!(
            "{field}: '{name}' is not a valid name"
        )]));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
