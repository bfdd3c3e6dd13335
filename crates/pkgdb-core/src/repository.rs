use crate::collection::Collection;
use crate::error::{PkgdbError, Result};
use crate::listing::PackageListing;
use crate::package::Package;
use crate::paths;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

/// Every entity the lifecycle core reads, as one consistent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub listings: Vec<PackageListing>,
}

impl Database {
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    pub fn collection(&self, branch: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.branchname == branch)
    }

    pub fn listing(&self, package: &str, branch: &str) -> Option<&PackageListing> {
        self.listings
            .iter()
            .find(|l| l.package == package && l.collection == branch)
    }

    /// Listings of `package`, in collection declaration order.
    pub fn listings_for(&self, package: &str) -> Vec<&PackageListing> {
        let mut found: Vec<&PackageListing> = self
            .listings
            .iter()
            .filter(|l| l.package == package)
            .collect();
        found.sort_by_key(|l| {
            self.collections
                .iter()
                .position(|c| c.branchname == l.collection)
                .unwrap_or(usize::MAX)
        });
        found
    }

    /// Insert or replace the row for the listing's (package, collection).
    pub fn upsert_listing(&mut self, listing: PackageListing) {
        match self
            .listings
            .iter_mut()
            .find(|l| l.package == listing.package && l.collection == listing.collection)
        {
            Some(existing) => *existing = listing,
            None => self.listings.push(listing),
        }
    }

    /// Enforce at most one listing per (package, collection).
    pub fn check(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for l in &self.listings {
            if !seen.insert((l.package.as_str(), l.collection.as_str())) {
                return Err(PkgdbError::DuplicateListing {
                    package: l.package.clone(),
                    branch: l.collection.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::db_path(root);
        if !path.exists() {
            return Err(PkgdbError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let db: Database = serde_yaml::from_str(&data)?;
        db.check()?;
        Ok(db)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        self.check()?;
        let path = paths::db_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Persistence seam used by the batch orchestrator.
pub trait Repository {
    /// One consistent read view for the whole batch.
    fn snapshot(&self) -> Result<Database>;

    /// Write every listing in one atomic step, or none of them.
    fn commit(&self, listings: &[PackageListing]) -> Result<()>;
}

/// Repository over `.pkgdb/db.yaml`. Commits rewrite the file atomically.
#[derive(Debug, Clone)]
pub struct YamlRepository {
    root: PathBuf,
}

impl YamlRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Repository for YamlRepository {
    fn snapshot(&self) -> Result<Database> {
        Database::load(&self.root)
    }

    fn commit(&self, listings: &[PackageListing]) -> Result<()> {
        // Reload under the lock: rows another batch committed since our
        // snapshot survive, and the last committer wins per listing.
        let _lock = CommitLock::acquire(&self.root)?;
        let mut db = Database::load(&self.root)?;
        for listing in listings {
            db.upsert_listing(listing.clone());
        }
        db.save(&self.root)?;
        tracing::debug!(rows = listings.len(), "committed listings to db.yaml");
        Ok(())
    }
}

/// Exclusive OS-level lock on `.pkgdb/db.lock`, released on drop.
///
/// Serializes commits across threads and processes sharing one root.
struct CommitLock {
    file: File,
}

impl CommitLock {
    fn acquire(root: &Path) -> Result<Self> {
        if !paths::pkgdb_dir(root).is_dir() {
            return Err(PkgdbError::NotInitialized);
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(paths::db_lock_path(root))?;
        FileExt::lock_exclusive(&file)?;
        Ok(Self { file })
    }
}

impl Drop for CommitLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("failed to release db.lock: {e}");
        }
    }
}

/// In-process repository, used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    db: Mutex<Database>,
    commits: Mutex<usize>,
}

impl MemoryRepository {
    pub fn new(db: Database) -> Self {
        Self {
            db: Mutex::new(db),
            commits: Mutex::new(0),
        }
    }

    pub fn database(&self) -> Database {
        self.db.lock().map(|db| db.clone()).unwrap_or_default()
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> usize {
        self.commits.lock().map(|c| *c).unwrap_or_default()
    }
}

impl Repository for MemoryRepository {
    fn snapshot(&self) -> Result<Database> {
        let db = self
            .db
            .lock()
            .map_err(|_| std::io::Error::other("memory repository lock poisoned"))?;
        Ok(db.clone())
    }

    fn commit(&self, listings: &[PackageListing]) -> Result<()> {
        let mut db = self
            .db
            .lock()
            .map_err(|_| std::io::Error::other("memory repository lock poisoned"))?;
        let mut next = db.clone();
        for listing in listings {
            next.upsert_listing(listing.clone());
        }
        next.check()?;
        *db = next;
        if let Ok(mut commits) = self.commits.lock() {
            *commits += 1;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
