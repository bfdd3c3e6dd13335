use std::path::PathBuf;

/// Shared application state passed to all route handlers.
///
/// Handlers reload `.pkgdb/config.yaml` and `.pkgdb/db.yaml` per request, so
/// edits made through the CLI are visible without a restart.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}
