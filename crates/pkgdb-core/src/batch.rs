//! Batch orchestration: one request, many (package, branch) pairs.
//!
//! A batch is not all-or-nothing. Every pair is decided independently against
//! a single snapshot; successful pairs are committed together, failed pairs are
//! reported next to them. Only the entry check (is the caller a packager, or an
//! admin for unretire) rejects the whole batch.

use crate::audit::{AuditLog, FileAudit, TracingAudit};
use crate::config::Config;
use crate::error::{PkgdbError, Result};
use crate::identity::{ConfigDirectory, Directory, Identity};
use crate::lifecycle::{self, Candidate, Change, FieldEdits, Outcome, Subject, Transition};
use crate::listing::PackageListing;
use crate::paths;
use crate::repository::{Database, Repository, YamlRepository};
use crate::types::TransitionKind;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// BatchRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub transition: TransitionKind,
    pub packages: Vec<String>,
    pub branches: Vec<String>,
    /// New point of contact; required for unorphan, ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poc: Option<String>,
    /// Critpath flag to set alongside a retire/unretire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critpath: Option<bool>,
}

impl BatchRequest {
    pub fn new<P, B>(transition: TransitionKind, packages: P, branches: B) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            transition,
            packages: packages.into_iter().map(Into::into).collect(),
            branches: branches.into_iter().map(Into::into).collect(),
            poc: None,
            critpath: None,
        }
    }

    pub fn with_poc(mut self, poc: impl Into<String>) -> Self {
        self.poc = Some(poc.into());
        self
    }

    pub fn with_critpath(mut self, critpath: bool) -> Self {
        self.critpath = Some(critpath);
        self
    }

    /// Field-level checks, reported together like a form error list.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if self.packages.is_empty() {
            problems.push("pkgnames: This field is required.".to_string());
        }
        if self.branches.is_empty() {
            problems.push("branches: This field is required.".to_string());
        }
        if self.transition == TransitionKind::Unorphan
            && self.poc.as_deref().map_or(true, |p| p.trim().is_empty())
        {
            problems.push("poc: This field is required.".to_string());
        }
        for name in &self.packages {
            if let Err(PkgdbError::InvalidRequest(mut found)) = paths::validate_name("pkgnames", name) {
                problems.append(&mut found);
            }
        }
        for name in &self.branches {
            if let Err(PkgdbError::InvalidRequest(mut found)) = paths::validate_name("branches", name) {
                problems.append(&mut found);
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(PkgdbError::InvalidRequest(problems))
        }
    }
}

// ---------------------------------------------------------------------------
// BatchResult
// ---------------------------------------------------------------------------

/// Two channels, both possibly populated: one message per committed pair (in
/// request order, empty strings included) and the distinct per-pair errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub messages: Vec<String>,
    pub errors: Vec<String>,
    pub committed: bool,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.committed
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct Orchestrator<'a> {
    repository: &'a dyn Repository,
    directory: &'a dyn Directory,
    audit: &'a dyn AuditLog,
}

struct Staged {
    row: PackageListing,
    change: Change,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        repository: &'a dyn Repository,
        directory: &'a dyn Directory,
        audit: &'a dyn AuditLog,
    ) -> Self {
        Self {
            repository,
            directory,
            audit,
        }
    }

    pub fn apply(&self, identity: &Identity, request: &BatchRequest) -> Result<BatchResult> {
        authorize_entry(identity, request.transition)?;
        request.validate()?;

        let transition = self.transition_for(request);
        let db = self.repository.snapshot()?;
        let now = Utc::now();

        let mut staged = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        for package in &request.packages {
            for branch in &request.branches {
                let subject = resolve(&db, package, branch);
                let outcome = lifecycle::decide(identity, subject, &transition);
                tracing::debug!(
                    package = %package,
                    branch = %branch,
                    transition = %request.transition,
                    success = outcome.is_success(),
                    "pair decided"
                );

                match (outcome, subject) {
                    (Outcome::Success(change), Subject::Found { listing, .. }) => {
                        let mut row = listing.clone();
                        change.apply_to(&mut row, now);
                        staged.push(Staged { row, change });
                    }
                    (outcome, _) => {
                        if let Some(msg) = outcome.error_message() {
                            if !errors.iter().any(|e| e == msg) {
                                errors.push(msg.to_string());
                            }
                        }
                    }
                }
            }
        }

        if staged.is_empty() {
            tracing::info!(
                user = %identity.username,
                transition = %request.transition,
                errors = errors.len(),
                "batch rejected: no pair succeeded"
            );
            return Ok(BatchResult {
                messages: Vec::new(),
                errors,
                committed: false,
            });
        }

        let rows: Vec<PackageListing> = staged.iter().map(|s| s.row.clone()).collect();
        self.repository.commit(&rows)?;
        tracing::info!(
            user = %identity.username,
            transition = %request.transition,
            committed = rows.len(),
            errors = errors.len(),
            "batch committed"
        );

        let messages = staged
            .iter()
            .map(|s| {
                let logged = self
                    .audit
                    .log(&s.change.package, &s.change.description)
                    .unwrap_or_else(|e| {
                        tracing::warn!(package = %s.change.package, "audit log failed: {e}");
                        String::new()
                    });
                s.change.message.clone().unwrap_or(logged)
            })
            .collect();

        Ok(BatchResult {
            messages,
            errors,
            committed: true,
        })
    }

    fn transition_for(&self, request: &BatchRequest) -> Transition {
        let edits = FieldEdits {
            critpath: request.critpath,
        };
        match request.transition {
            TransitionKind::Orphan => Transition::Orphan,
            TransitionKind::Unorphan => {
                let name = request.poc.clone().unwrap_or_default();
                let is_packager = self.directory.is_packager(&name);
                Transition::Unorphan(Candidate { name, is_packager })
            }
            TransitionKind::Retire => Transition::Retire(edits),
            TransitionKind::Unretire => Transition::Unretire(edits),
        }
    }
}

/// Apply `request` as `username` against the `.pkgdb/` tree under `root`.
///
/// Wires the config-backed directory, the YAML repository and the audit sink
/// selected by `audit.enabled`.
pub fn apply_at(root: &Path, username: &str, request: &BatchRequest) -> Result<BatchResult> {
    let config = Config::load(root)?;
    let audit: Box<dyn AuditLog> = if config.audit.enabled {
        Box::new(FileAudit::new(root))
    } else {
        Box::new(TracingAudit)
    };
    let directory = ConfigDirectory::new(config);
    let identity = directory.resolve(username)?;
    let repository = YamlRepository::new(root);

    Orchestrator::new(&repository, &directory, audit.as_ref()).apply(&identity, request)
}

/// Baseline role check, run once before any pair is looked at.
pub fn authorize_entry(identity: &Identity, transition: TransitionKind) -> Result<()> {
    let allowed = if transition.requires_admin() {
        identity.is_admin
    } else {
        identity.is_packager
    };
    if allowed {
        return Ok(());
    }
    tracing::warn!(
        user = %identity.username,
        transition = %transition,
        "caller lacks the role required to {transition}"
    );
    Err(PkgdbError::Unauthorized {
        user: identity.username.clone(),
        operation: format!("{transition} packages"),
    })
}

fn resolve<'a>(db: &'a Database, package: &'a str, branch: &'a str) -> Subject<'a> {
    let Some(pkg) = db.package(package) else {
        return Subject::UnknownPackage { package };
    };
    let Some(collection) = db.collection(branch) else {
        return Subject::UnknownCollection { package, branch };
    };
    match db.listing(package, branch) {
        Some(listing) => Subject::Found {
            package: pkg,
            collection,
            listing,
        },
        None => Subject::NoListing { package, branch },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::RecordingAudit;
    use crate::collection::Collection;
    use crate::config::{Config, UserEntry};
    use crate::identity::ConfigDirectory;
    use crate::package::Package;
    use crate::repository::MemoryRepository;
    use crate::types::{BranchCategory, CollectionStatus, ListingStatus, ORPHAN};

    fn collection(branch: &str, category: BranchCategory, status: CollectionStatus) -> Collection {
        Collection::new(branch, "Fedora", branch, category, status)
    }

    fn fixture() -> Database {
        Database {
            packages: vec![
                Package::new("guake", "Top down terminal for GNOME"),
                Package::new("geany", "A fast and lightweight IDE"),
            ],
            collections: vec![
                collection("f18", BranchCategory::Primary, CollectionStatus::Active),
                collection("master", BranchCategory::Primary, CollectionStatus::UnderDevelopment),
                collection("el4", BranchCategory::ExtendedLifecycle, CollectionStatus::Active),
                collection("el6", BranchCategory::ExtendedLifecycle, CollectionStatus::Active),
                collection("epel7", BranchCategory::ExtendedLifecycle, CollectionStatus::Active),
            ],
            listings: vec![
                PackageListing::new("guake", "f18", "pingou"),
                PackageListing::new("guake", "master", "pingou"),
                PackageListing::new("geany", "master", "group::gtk-sig"),
            ],
        }
    }

    fn directory() -> ConfigDirectory {
        let mut cfg = Config::new("test");
        for (user, group) in [
            ("pingou", "packager"),
            ("toshio", "packager"),
            ("test", "packager"),
            ("kevin", "sysadmin-main"),
            ("mclasen", "cla_done"),
        ] {
            cfg.users.insert(
                user.to_string(),
                UserEntry {
                    groups: vec![group.to_string()],
                },
            );
        }
        ConfigDirectory::new(cfg)
    }

    struct Harness {
        repo: MemoryRepository,
        directory: ConfigDirectory,
        audit: RecordingAudit,
    }

    impl Harness {
        fn new(db: Database) -> Self {
            Self {
                repo: MemoryRepository::new(db),
                directory: directory(),
                audit: RecordingAudit::default(),
            }
        }

        fn apply(&self, user: &str, request: BatchRequest) -> Result<BatchResult> {
            let identity = self.directory.resolve(user)?;
            Orchestrator::new(&self.repo, &self.directory, &self.audit).apply(&identity, &request)
        }

        fn listing(&self, package: &str, branch: &str) -> PackageListing {
            self.repo
                .database()
                .listing(package, branch)
                .cloned()
                .expect("listing exists")
        }
    }

    #[test]
    fn non_packager_is_rejected_before_any_pair() {
        let h = Harness::new(fixture());
        let err = h
            .apply(
                "mclasen",
                BatchRequest::new(TransitionKind::Orphan, ["guake"], ["f18"]),
            )
            .unwrap_err();
        assert!(matches!(err, PkgdbError::Unauthorized { .. }));
        assert_eq!(h.repo.commit_count(), 0);
    }

    #[test]
    fn unretire_needs_admin_at_entry() {
        let h = Harness::new(fixture());
        let err = h
            .apply(
                "pingou",
                BatchRequest::new(TransitionKind::Unretire, ["guake"], ["f18"]),
            )
            .unwrap_err();
        assert!(matches!(err, PkgdbError::Unauthorized { .. }));
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let h = Harness::new(fixture());
        let err = h
            .apply(
                "pingou",
                BatchRequest::new(TransitionKind::Unorphan, Vec::<String>::new(), Vec::<String>::new()),
            )
            .unwrap_err();
        let PkgdbError::InvalidRequest(problems) = err else {
            panic!("expected invalid request, got {err:?}");
        };
        assert_eq!(
            problems,
            vec![
                "pkgnames: This field is required.",
                "branches: This field is required.",
                "poc: This field is required.",
            ]
        );
    }

    #[test]
    fn unknown_package_fails_whole_batch() {
        let h = Harness::new(fixture());
        let result = h
            .apply(
                "pingou",
                BatchRequest::new(TransitionKind::Orphan, ["gnome-terminal"], ["f18", "master"]),
            )
            .unwrap();
        assert!(!result.committed);
        assert_eq!(result.errors, vec!["No package found by this name".to_string()]);
        assert_eq!(h.repo.commit_count(), 0);
    }

    #[test]
    fn orphan_partial_success_with_missing_branch() {
        let h = Harness::new(fixture());
        let result = h
            .apply(
                "pingou",
                BatchRequest::new(TransitionKind::Orphan, ["guake"], ["el4", "f18"]),
            )
            .unwrap();

        assert!(result.committed);
        assert_eq!(result.messages, vec![String::new()]);
        assert_eq!(
            result.errors,
            vec!["The package guake could not be found in the collection el4.".to_string()]
        );

        let f18 = h.listing("guake", "f18");
        assert_eq!(f18.point_of_contact, ORPHAN);
        assert_eq!(f18.status, ListingStatus::Orphaned);
        assert_eq!(h.listing("guake", "master").point_of_contact, "pingou");
        assert_eq!(h.audit.entries().len(), 1);
    }

    #[test]
    fn retire_el4_missing_f18_owned_by_admin_caller() {
        let mut db = fixture();
        db.listings[0].point_of_contact = "kevin".to_string();
        let h = Harness::new(db);

        let result = h
            .apply(
                "kevin",
                BatchRequest::new(TransitionKind::Retire, ["guake"], ["el4", "f18"]),
            )
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.messages.len(), 1);
        assert_eq!(
            result.errors,
            vec!["No package guake found in collection el4".to_string()]
        );
        assert_eq!(h.listing("guake", "f18").status, ListingStatus::Retired);
        assert_eq!(h.repo.commit_count(), 1);
    }

    #[test]
    fn retire_el4_missing_f18_owned_by_packager_caller() {
        // A plain owner may not retire on an active primary branch, so
        // neither pair succeeds.
        let h = Harness::new(fixture());
        assert_eq!(h.listing("guake", "f18").point_of_contact, "pingou");

        let result = h
            .apply(
                "pingou",
                BatchRequest::new(TransitionKind::Retire, ["guake"], ["el4", "f18"]),
            )
            .unwrap();

        assert!(!result.committed);
        assert!(result.messages.is_empty());
        assert_eq!(
            result.errors,
            vec![
                "No package guake found in collection el4".to_string(),
                "You are not allowed to retire the package: guake on branch f18.".to_string(),
            ]
        );
        assert_eq!(h.listing("guake", "f18").status, ListingStatus::Approved);
        assert_eq!(h.repo.commit_count(), 0);
        assert!(h.audit.entries().is_empty());
    }

    #[test]
    fn unorphan_one_orphaned_one_approved() {
        let mut db = fixture();
        db.listings[0].status = ListingStatus::Orphaned;
        db.listings[0].point_of_contact = ORPHAN.to_string();
        let h = Harness::new(db);

        let result = h
            .apply(
                "pingou",
                BatchRequest::new(TransitionKind::Unorphan, ["guake"], ["f18", "master"])
                    .with_poc("pingou"),
            )
            .unwrap();

        assert!(result.committed);
        assert_eq!(
            result.messages,
            vec!["Package guake has been unorphaned on f18 by pingou".to_string()]
        );
        assert_eq!(
            result.errors,
            vec!["Package \"guake\" is not orphaned on master".to_string()]
        );
        let f18 = h.listing("guake", "f18");
        assert_eq!(f18.status, ListingStatus::Approved);
        assert_eq!(f18.point_of_contact, "pingou");
    }

    #[test]
    fn unorphan_not_orphaned_anywhere_lists_every_branch() {
        let h = Harness::new(fixture());
        let result = h
            .apply(
                "pingou",
                BatchRequest::new(TransitionKind::Unorphan, ["guake"], ["f18", "master"])
                    .with_poc("test"),
            )
            .unwrap();
        assert!(!result.committed);
        assert_eq!(
            result.errors,
            vec![
                "Package \"guake\" is not orphaned on f18".to_string(),
                "Package \"guake\" is not orphaned on master".to_string(),
            ]
        );
    }

    #[test]
    fn identical_errors_collapse() {
        let mut db = fixture();
        for l in db.listings.iter_mut().filter(|l| l.package == "guake") {
            l.status = ListingStatus::Orphaned;
            l.point_of_contact = ORPHAN.to_string();
        }
        let h = Harness::new(db);

        let result = h
            .apply(
                "pingou",
                BatchRequest::new(TransitionKind::Unorphan, ["guake"], ["f18", "master"])
                    .with_poc("test"),
            )
            .unwrap();
        assert!(!result.committed);
        assert_eq!(
            result.errors,
            vec!["You are not allowed to update ACLs of someone else.".to_string()]
        );
    }

    #[test]
    fn unorphan_to_non_packager_is_denied() {
        let mut db = fixture();
        db.listings[0].status = ListingStatus::Orphaned;
        db.listings[0].point_of_contact = ORPHAN.to_string();
        let h = Harness::new(db);

        let result = h
            .apply(
                "kevin",
                BatchRequest::new(TransitionKind::Unorphan, ["guake"], ["f18"]).with_poc("mclasen"),
            )
            .unwrap();
        assert_eq!(
            result.errors,
            vec!["User \"mclasen\" is not in the packager group".to_string()]
        );
    }

    #[test]
    fn retire_by_poc_on_mixed_branches() {
        let mut db = fixture();
        db.listings
            .push(PackageListing::new("guake", "epel7", "pingou"));
        let h = Harness::new(db);

        let result = h
            .apply(
                "pingou",
                BatchRequest::new(TransitionKind::Retire, ["guake"], ["f18", "master", "epel7"]),
            )
            .unwrap();

        assert!(result.committed);
        assert_eq!(result.messages, vec![String::new(), String::new()]);
        assert_eq!(
            result.errors,
            vec!["You are not allowed to retire the package: guake on branch f18.".to_string()]
        );
        assert_eq!(h.listing("guake", "f18").status, ListingStatus::Approved);
        assert_eq!(h.listing("guake", "master").status, ListingStatus::Retired);
        assert_eq!(h.listing("guake", "epel7").status, ListingStatus::Retired);
    }

    #[test]
    fn retire_orphaned_epel_listing_by_other_packager() {
        let mut db = fixture();
        db.listings.push(PackageListing::new("guake", "epel7", ORPHAN));
        let h = Harness::new(db);

        let result = h
            .apply(
                "toshio",
                BatchRequest::new(TransitionKind::Retire, ["guake"], ["epel7"]),
            )
            .unwrap();
        assert_eq!(result.messages, vec![String::new()]);
        assert!(result.errors.is_empty());
        assert_eq!(h.listing("guake", "epel7").status, ListingStatus::Retired);
    }

    #[test]
    fn retire_then_unretire_by_admin() {
        let h = Harness::new(fixture());
        let retire = h
            .apply(
                "kevin",
                BatchRequest::new(TransitionKind::Retire, ["guake"], ["f18", "master"]),
            )
            .unwrap();
        assert_eq!(retire.messages, vec![String::new(), String::new()]);

        let unretire = h
            .apply(
                "kevin",
                BatchRequest::new(TransitionKind::Unretire, ["guake"], ["f18", "master"]),
            )
            .unwrap();
        assert!(unretire.committed);
        assert_eq!(h.listing("guake", "f18").status, ListingStatus::Approved);
        assert_eq!(h.listing("guake", "f18").point_of_contact, "pingou");
        assert_eq!(h.repo.commit_count(), 2);
    }

    #[test]
    fn nothing_to_update_reported_once() {
        let mut db = fixture();
        for l in db.listings.iter_mut() {
            l.status = ListingStatus::Retired;
        }
        let h = Harness::new(db);

        let result = h
            .apply(
                "kevin",
                BatchRequest::new(TransitionKind::Retire, ["guake"], ["master", "f18"])
                    .with_critpath(false),
            )
            .unwrap();
        assert!(!result.committed);
        assert_eq!(result.errors, vec!["Nothing to update".to_string()]);
        assert_eq!(h.repo.commit_count(), 0);
    }

    #[test]
    fn critpath_toggle_rides_along_with_retire() {
        let h = Harness::new(fixture());
        let result = h
            .apply(
                "kevin",
                BatchRequest::new(TransitionKind::Retire, ["guake"], ["master"]).with_critpath(true),
            )
            .unwrap();
        assert!(result.committed);
        let master = h.listing("guake", "master");
        assert!(master.critpath);
        assert_eq!(master.status, ListingStatus::Retired);
    }

    #[test]
    fn pairs_run_package_major() {
        let mut db = fixture();
        db.listings.push(PackageListing::new("geany", "f18", ORPHAN));
        let h = Harness::new(db);

        let result = h
            .apply(
                "kevin",
                BatchRequest::new(TransitionKind::Unorphan, ["geany", "guake"], ["f18", "master"])
                    .with_poc("toshio"),
            )
            .unwrap();
        assert_eq!(
            result.messages,
            vec!["Package geany has been unorphaned on f18 by toshio".to_string()]
        );
        assert_eq!(
            result.errors,
            vec![
                "Package \"geany\" is not orphaned on master".to_string(),
                "Package \"guake\" is not orphaned on f18".to_string(),
                "Package \"guake\" is not orphaned on master".to_string(),
            ]
        );
    }

    #[test]
    fn apply_at_uses_files_under_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cfg = Config::new("test");
        cfg.users.insert(
            "pingou".to_string(),
            UserEntry {
                groups: vec!["packager".to_string()],
            },
        );
        cfg.save(dir.path()).unwrap();
        fixture().save(dir.path()).unwrap();

        let result = apply_at(
            dir.path(),
            "pingou",
            &BatchRequest::new(TransitionKind::Orphan, ["guake"], ["f18"]),
        )
        .unwrap();
        assert!(result.committed);

        let db = Database::load(dir.path()).unwrap();
        assert_eq!(db.listing("guake", "f18").unwrap().point_of_contact, ORPHAN);
        let log = std::fs::read_to_string(paths::audit_log_path(dir.path())).unwrap();
        assert!(log.contains("guake user: pingou changed point of contact"));
    }

    #[test]
    fn concurrent_batches_on_distinct_packages_all_land() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cfg = Config::new("test");
        cfg.users.insert(
            "kevin".to_string(),
            UserEntry {
                groups: vec!["sysadmin-main".to_string()],
            },
        );
        cfg.save(dir.path()).unwrap();

        let mut db = fixture();
        for i in 0..16 {
            let name = format!("pkg{i}");
            db.packages.push(Package::new(name.clone(), "filler"));
            db.listings.push(PackageListing::new(name, "f18", "pingou"));
        }
        db.save(dir.path()).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let root = dir.path().to_path_buf();
                std::thread::spawn(move || {
                    apply_at(
                        &root,
                        "kevin",
                        &BatchRequest::new(TransitionKind::Orphan, [format!("pkg{i}")], ["f18"]),
                    )
                    .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().committed);
        }

        let db = Database::load(dir.path()).unwrap();
        let orphaned = (0..16)
            .filter(|i| {
                db.listing(&format!("pkg{i}"), "f18").unwrap().point_of_contact == ORPHAN
            })
            .count();
        assert_eq!(orphaned, 16);
        assert_eq!(db.listing("guake", "f18").unwrap().point_of_contact, "pingou");

        let log = std::fs::read_to_string(paths::audit_log_path(dir.path())).unwrap();
        assert_eq!(log.lines().count(), 16);
    }

    #[test]
    fn apply_at_unknown_user() {
        let dir = tempfile::TempDir::new().unwrap();
        Config::new("test").save(dir.path()).unwrap();
        fixture().save(dir.path()).unwrap();

        let err = apply_at(
            dir.path(),
            "nobody",
            &BatchRequest::new(TransitionKind::Orphan, ["guake"], ["f18"]),
        )
        .unwrap_err();
        assert!(matches!(err, PkgdbError::UnknownUser(_)));
    }

    #[test]
    fn group_member_orphans_group_owned_listing() {
        let mut cfg = Config::new("test");
        cfg.users.insert(
            "ralph".to_string(),
            UserEntry {
                groups: vec!["packager".to_string(), "gtk-sig".to_string()],
            },
        );
        let directory = ConfigDirectory::new(cfg);
        let repo = MemoryRepository::new(fixture());
        let audit = RecordingAudit::default();

        let identity = directory.resolve("ralph").unwrap();
        let result = Orchestrator::new(&repo, &directory, &audit)
            .apply(
                &identity,
                &BatchRequest::new(TransitionKind::Orphan, ["geany"], ["master"]),
            )
            .unwrap();
        assert!(result.committed);
        assert_eq!(
            repo.database().listing("geany", "master").unwrap().point_of_contact,
            ORPHAN
        );
        assert!(audit.entries()[0].1.contains("from: group::gtk-sig to: orphan"));
    }
}
