use crate::error::PkgdbError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-of-contact sentinel meaning "nobody owns this listing".
pub const ORPHAN: &str = "orphan";

/// Prefix marking a point-of-contact or ACL holder as a group collective.
pub const GROUP_PREFIX: &str = "group::";

// ---------------------------------------------------------------------------
// ListingStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Approved,
    Orphaned,
    Retired,
}

impl ListingStatus {
    pub fn all() -> &'static [ListingStatus] {
        &[
            ListingStatus::Approved,
            ListingStatus::Orphaned,
            ListingStatus::Retired,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Approved => "Approved",
            ListingStatus::Orphaned => "Orphaned",
            ListingStatus::Retired => "Retired",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = PkgdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Approved" | "approved" => Ok(ListingStatus::Approved),
            "Orphaned" | "orphaned" => Ok(ListingStatus::Orphaned),
            "Retired" | "retired" => Ok(ListingStatus::Retired),
            _ => Err(PkgdbError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// BranchCategory
// ---------------------------------------------------------------------------

/// Lifecycle category of a collection. Retirement rules differ per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BranchCategory {
    Primary,
    ExtendedLifecycle,
}

impl BranchCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            BranchCategory::Primary => "PRIMARY",
            BranchCategory::ExtendedLifecycle => "EXTENDED_LIFECYCLE",
        }
    }
}

impl fmt::Display for BranchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BranchCategory {
    type Err = PkgdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRIMARY" | "primary" => Ok(BranchCategory::Primary),
            "EXTENDED_LIFECYCLE" | "extended_lifecycle" | "extended-lifecycle" => {
                Ok(BranchCategory::ExtendedLifecycle)
            }
            _ => Err(PkgdbError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// CollectionStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionStatus {
    Active,
    #[serde(rename = "Under Development")]
    UnderDevelopment,
    #[serde(rename = "EOL")]
    Eol,
}

impl CollectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionStatus::Active => "Active",
            CollectionStatus::UnderDevelopment => "Under Development",
            CollectionStatus::Eol => "EOL",
        }
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CollectionStatus {
    type Err = PkgdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(CollectionStatus::Active),
            "Under Development" => Ok(CollectionStatus::UnderDevelopment),
            "EOL" => Ok(CollectionStatus::Eol),
            _ => Err(PkgdbError::InvalidCollectionStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// AclKind / AclStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclKind {
    Commit,
    Watchbugzilla,
    Watchcommits,
    Approveacls,
}

impl AclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AclKind::Commit => "commit",
            AclKind::Watchbugzilla => "watchbugzilla",
            AclKind::Watchcommits => "watchcommits",
            AclKind::Approveacls => "approveacls",
        }
    }
}

impl fmt::Display for AclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AclKind {
    type Err = PkgdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commit" => Ok(AclKind::Commit),
            "watchbugzilla" => Ok(AclKind::Watchbugzilla),
            "watchcommits" => Ok(AclKind::Watchcommits),
            "approveacls" => Ok(AclKind::Approveacls),
            _ => Err(PkgdbError::InvalidAcl(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AclStatus {
    Approved,
    #[serde(rename = "Awaiting Review")]
    AwaitingReview,
    Denied,
}

impl fmt::Display for AclStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AclStatus::Approved => "Approved",
            AclStatus::AwaitingReview => "Awaiting Review",
            AclStatus::Denied => "Denied",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// TransitionKind
// ---------------------------------------------------------------------------

/// The lifecycle operation requested for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Orphan,
    Unorphan,
    Retire,
    Unretire,
}

impl TransitionKind {
    pub fn all() -> &'static [TransitionKind] {
        &[
            TransitionKind::Orphan,
            TransitionKind::Unorphan,
            TransitionKind::Retire,
            TransitionKind::Unretire,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransitionKind::Orphan => "orphan",
            TransitionKind::Unorphan => "unorphan",
            TransitionKind::Retire => "retire",
            TransitionKind::Unretire => "unretire",
        }
    }

    /// Unretire is the only transition gated on administrator role at entry.
    pub fn requires_admin(self) -> bool {
        matches!(self, TransitionKind::Unretire)
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransitionKind {
    type Err = PkgdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orphan" => Ok(TransitionKind::Orphan),
            "unorphan" => Ok(TransitionKind::Unorphan),
            "retire" => Ok(TransitionKind::Retire),
            "unretire" => Ok(TransitionKind::Unretire),
            _ => Err(PkgdbError::InvalidTransition(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
