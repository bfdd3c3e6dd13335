use crate::types::{AclKind, AclStatus, ListingStatus, ORPHAN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AclGrant
// ---------------------------------------------------------------------------

/// A single permission held by a user or a `group::` collective on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclGrant {
    pub fas_name: String,
    pub acl: AclKind,
    pub status: AclStatus,
}

impl AclGrant {
    pub fn new(fas_name: impl Into<String>, acl: AclKind, status: AclStatus) -> Self {
        Self {
            fas_name: fas_name.into(),
            acl,
            status,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == AclStatus::Approved
    }
}

// ---------------------------------------------------------------------------
// PackageListing
// ---------------------------------------------------------------------------

/// A package on one collection: the unit the lifecycle engine operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageListing {
    pub package: String,
    pub collection: String,
    pub point_of_contact: String,
    pub status: ListingStatus,
    pub status_change: DateTime<Utc>,
    #[serde(default)]
    pub critpath: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acls: Vec<AclGrant>,
}

impl PackageListing {
    /// A fresh listing; it starts `Orphaned` when no owner is given.
    pub fn new(
        package: impl Into<String>,
        collection: impl Into<String>,
        point_of_contact: impl Into<String>,
    ) -> Self {
        let point_of_contact = point_of_contact.into();
        let status = if point_of_contact == ORPHAN {
            ListingStatus::Orphaned
        } else {
            ListingStatus::Approved
        };
        Self {
            package: package.into(),
            collection: collection.into(),
            point_of_contact,
            status,
            status_change: Utc::now(),
            critpath: false,
            acls: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_acl(mut self, grant: AclGrant) -> Self {
        self.acls.push(grant);
        self
    }

    /// Names holding an approved `kind` grant, in grant order.
    pub fn holders(&self, kind: AclKind) -> Vec<&str> {
        self.acls
            .iter()
            .filter(|g| g.acl == kind && g.is_approved())
            .map(|g| g.fas_name.as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
