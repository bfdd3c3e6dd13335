use crate::error::{PkgdbError, Result};
use crate::listing::{AclGrant, PackageListing};
use crate::package::Package;
use crate::repository::Database;
use crate::types::{AclKind, BranchCategory, CollectionStatus, ListingStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Read-only view of a package and its listings, used by `pkgdb package info`
/// and `GET /api/package/{name}/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageInfo {
    pub package: Package,
    pub listings: Vec<ListingInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingInfo {
    pub branch: String,
    pub category: BranchCategory,
    pub collection_status: CollectionStatus,
    pub point_of_contact: String,
    pub status: ListingStatus,
    pub status_change: DateTime<Utc>,
    pub critpath: bool,
    pub committers: Vec<String>,
    pub acls: Vec<AclGrant>,
}

impl ListingInfo {
    fn from_listing(db: &Database, listing: &PackageListing) -> Self {
        let collection = db.collection(&listing.collection);
        Self {
            branch: listing.collection.clone(),
            category: collection
                .map(|c| c.category)
                .unwrap_or(BranchCategory::Primary),
            collection_status: collection
                .map(|c| c.status)
                .unwrap_or(CollectionStatus::Active),
            point_of_contact: listing.point_of_contact.clone(),
            status: listing.status,
            status_change: listing.status_change,
            critpath: listing.critpath,
            committers: listing
                .holders(AclKind::Commit)
                .into_iter()
                .map(str::to_string)
                .collect(),
            acls: listing.acls.clone(),
        }
    }
}

/// Look up `name`, optionally restricted to `branches`.
///
/// An empty branch filter returns every listing. A filter that matches none of
/// the package's listings is an error naming the requested branches.
pub fn package_info(db: &Database, name: &str, branches: &[String]) -> Result<PackageInfo> {
    let package = db
        .package(name)
        .ok_or_else(|| PkgdbError::PackageNotFound(name.to_string()))?;

    let listings: Vec<ListingInfo> = db
        .listings_for(name)
        .into_iter()
        .filter(|l| branches.is_empty() || branches.iter().any(|b| b == &l.collection))
        .map(|l| ListingInfo::from_listing(db, l))
        .collect();

    if listings.is_empty() && !branches.is_empty() {
        return Err(PkgdbError::NoListingOnBranches(branches.join(", ")));
    }

    Ok(PackageInfo {
        package: package.clone(),
        listings,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
