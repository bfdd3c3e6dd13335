//! The per-listing lifecycle state machine.
//!
//! [`decide`] is a pure function: it reads an [`Identity`], the resolved
//! package/collection/listing and the requested [`Transition`], and returns an
//! [`Outcome`]. It performs no I/O and never mutates its inputs; the batch
//! orchestrator applies a [`Change`] only after a `Success`.
//!
//! ```text
//!             orphan                      retire
//!  Approved ----------> Orphaned ------------------+
//!     ^   <----------      |                       v
//!     |     unorphan       +-----------------> Retired
//!     |                        retire             |
//!     +-------------------------------------------+
//!                        unretire (admin)
//! ```

use crate::collection::Collection;
use crate::identity::Identity;
use crate::listing::PackageListing;
use crate::package::Package;
use crate::types::{BranchCategory, ListingStatus, TransitionKind, ORPHAN};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The owner proposed by an unorphan request, with the directory's verdict on
/// whether it may own packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub is_packager: bool,
}

/// Non-status fields a retire/unretire request may change alongside the status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldEdits {
    pub critpath: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Orphan,
    Unorphan(Candidate),
    Retire(FieldEdits),
    Unretire(FieldEdits),
}

impl Transition {
    pub fn kind(&self) -> TransitionKind {
        match self {
            Transition::Orphan => TransitionKind::Orphan,
            Transition::Unorphan(_) => TransitionKind::Unorphan,
            Transition::Retire(_) => TransitionKind::Retire,
            Transition::Unretire(_) => TransitionKind::Unretire,
        }
    }
}

/// What the repository found for one (package, branch) pair.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Found {
        package: &'a Package,
        collection: &'a Collection,
        listing: &'a PackageListing,
    },
    UnknownPackage {
        package: &'a str,
    },
    UnknownCollection {
        package: &'a str,
        branch: &'a str,
    },
    /// Package and collection both exist, but the package is not on that branch.
    NoListing {
        package: &'a str,
        branch: &'a str,
    },
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Missing {
    Package,
    Collection,
    Listing,
}

/// The new state of a listing after an allowed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub package: String,
    pub branch: String,
    pub status: ListingStatus,
    pub point_of_contact: String,
    pub critpath: bool,
    pub status_changed: bool,
    /// Line handed to the audit log once the change is committed.
    pub description: String,
    /// Fixed success message; `None` means "use whatever the audit log returns".
    pub message: Option<String>,
}

impl Change {
    pub fn apply_to(&self, listing: &mut PackageListing, at: DateTime<Utc>) {
        listing.status = self.status;
        listing.point_of_contact = self.point_of_contact.clone();
        listing.critpath = self.critpath;
        if self.status_changed {
            listing.status_change = at;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Success(Change),
    Denied { reason: String },
    NotFound { missing: Missing, reason: String },
    NoOp { reason: String },
    NothingToUpdate,
}

pub const NOTHING_TO_UPDATE: &str = "Nothing to update";

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The per-pair error text, or `None` for a success.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Denied { reason }
            | Outcome::NotFound { reason, .. }
            | Outcome::NoOp { reason } => Some(reason),
            Outcome::NothingToUpdate => Some(NOTHING_TO_UPDATE),
        }
    }

    fn denied(reason: impl Into<String>) -> Self {
        Outcome::Denied {
            reason: reason.into(),
        }
    }

    fn no_op(reason: impl Into<String>) -> Self {
        Outcome::NoOp {
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

pub fn decide(identity: &Identity, subject: Subject<'_>, transition: &Transition) -> Outcome {
    let (package, collection, listing) = match subject {
        Subject::Found {
            package,
            collection,
            listing,
        } => (package, collection, listing),
        Subject::UnknownPackage { .. } => {
            return Outcome::NotFound {
                missing: Missing::Package,
                reason: "No package found by this name".to_string(),
            }
        }
        Subject::UnknownCollection { branch, .. } => {
            return Outcome::NotFound {
                missing: Missing::Collection,
                reason: format!("No collection found by the name of {branch}"),
            }
        }
        Subject::NoListing { package, branch } => {
            return Outcome::NotFound {
                missing: Missing::Listing,
                reason: no_listing_reason(transition.kind(), package, branch),
            }
        }
    };

    let pair = Pair {
        package: &package.name,
        branch: &collection.branchname,
    };

    match transition {
        Transition::Orphan => orphan(identity, pair, listing),
        Transition::Unorphan(candidate) => unorphan(identity, pair, listing, candidate),
        Transition::Retire(edits) => retire(identity, pair, collection, listing, *edits),
        Transition::Unretire(edits) => unretire(identity, pair, listing, *edits),
    }
}

#[derive(Clone, Copy)]
struct Pair<'a> {
    package: &'a str,
    branch: &'a str,
}

fn no_listing_reason(kind: TransitionKind, package: &str, branch: &str) -> String {
    match kind {
        TransitionKind::Orphan => {
            format!("The package {package} could not be found in the collection {branch}.")
        }
        TransitionKind::Unorphan => format!("Package \"{package}\" is not in the collection {branch}"),
        TransitionKind::Retire | TransitionKind::Unretire => {
            format!("No package {package} found in collection {branch}")
        }
    }
}

fn orphan(identity: &Identity, pair: Pair<'_>, listing: &PackageListing) -> Outcome {
    if listing.status != ListingStatus::Approved {
        return Outcome::no_op(format!(
            "Package \"{}\" is not approved on {}",
            pair.package, pair.branch
        ));
    }
    if !identity.is_admin && !identity.acts_as(&listing.point_of_contact) {
        return Outcome::denied("You are not allowed to change the point of contact.");
    }

    Outcome::Success(Change {
        package: pair.package.to_string(),
        branch: pair.branch.to_string(),
        status: ListingStatus::Orphaned,
        point_of_contact: ORPHAN.to_string(),
        critpath: listing.critpath,
        status_changed: true,
        description: format!(
            "user: {} changed point of contact of package: {} from: {} to: {} on branch: {}",
            identity.username, pair.package, listing.point_of_contact, ORPHAN, pair.branch
        ),
        message: None,
    })
}

fn unorphan(
    identity: &Identity,
    pair: Pair<'_>,
    listing: &PackageListing,
    candidate: &Candidate,
) -> Outcome {
    if listing.status != ListingStatus::Orphaned {
        return Outcome::no_op(format!(
            "Package \"{}\" is not orphaned on {}",
            pair.package, pair.branch
        ));
    }
    if !candidate.is_packager {
        return Outcome::denied(format!(
            "User \"{}\" is not in the packager group",
            candidate.name
        ));
    }
    if !identity.is_admin && !identity.acts_as(&candidate.name) {
        return Outcome::denied("You are not allowed to update ACLs of someone else.");
    }

    Outcome::Success(Change {
        package: pair.package.to_string(),
        branch: pair.branch.to_string(),
        status: ListingStatus::Approved,
        point_of_contact: candidate.name.clone(),
        critpath: listing.critpath,
        status_changed: true,
        description: format!(
            "user: {} changed point of contact of package: {} from: {} to: {} on branch: {}",
            identity.username, pair.package, listing.point_of_contact, candidate.name, pair.branch
        ),
        message: Some(format!(
            "Package {} has been unorphaned on {} by {}",
            pair.package, pair.branch, candidate.name
        )),
    })
}

fn retire(
    identity: &Identity,
    pair: Pair<'_>,
    collection: &Collection,
    listing: &PackageListing,
    edits: FieldEdits,
) -> Outcome {
    // Orphaned listings have no owner to protect, so any caller past the
    // entry check may retire them on any branch.
    if !identity.is_admin && listing.status != ListingStatus::Orphaned {
        if !identity.acts_as(&listing.point_of_contact) {
            return Outcome::denied("You are not allowed to retire this package.");
        }
        let needs_admin = collection.category == BranchCategory::Primary
            && !collection.is_under_development();
        if needs_admin {
            return Outcome::denied(format!(
                "You are not allowed to retire the package: {} on branch {}.",
                pair.package, pair.branch
            ));
        }
    }

    status_update(identity, pair, listing, ListingStatus::Retired, edits)
}

fn unretire(
    identity: &Identity,
    pair: Pair<'_>,
    listing: &PackageListing,
    edits: FieldEdits,
) -> Outcome {
    if !identity.is_admin {
        return Outcome::denied(format!(
            "You are not allowed to update the status of the package: {} on branch {} to {}.",
            pair.package,
            pair.branch,
            ListingStatus::Approved
        ));
    }
    if listing.status != ListingStatus::Retired {
        return Outcome::no_op(format!(
            "Package \"{}\" is not retired on {}",
            pair.package, pair.branch
        ));
    }

    status_update(identity, pair, listing, ListingStatus::Approved, edits)
}

/// Shared tail of retire/unretire: diff the requested fields against the
/// listing and refuse empty changes.
fn status_update(
    identity: &Identity,
    pair: Pair<'_>,
    listing: &PackageListing,
    target: ListingStatus,
    edits: FieldEdits,
) -> Outcome {
    let critpath = edits.critpath.unwrap_or(listing.critpath);
    let status_changed = listing.status != target;
    let critpath_changed = critpath != listing.critpath;
    if !status_changed && !critpath_changed {
        return Outcome::NothingToUpdate;
    }

    let mut parts = Vec::new();
    if status_changed {
        parts.push(format!("status from: {} to {}", listing.status, target));
    }
    if critpath_changed {
        parts.push(format!("critpath to {critpath}"));
    }

    Outcome::Success(Change {
        package: pair.package.to_string(),
        branch: pair.branch.to_string(),
        status: target,
        point_of_contact: listing.point_of_contact.clone(),
        critpath,
        status_changed,
        description: format!(
            "user: {} updated package: {} {} on branch: {}",
            identity.username,
            pair.package,
            parts.join(", "),
            pair.branch
        ),
        message: None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
