use crate::types::{BranchCategory, CollectionStatus};
use serde::{Deserialize, Serialize};

/// A distribution branch (`f18`, `master`, `epel7`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub branchname: String,
    /// Distribution name, e.g. `Fedora` or `Fedora EPEL`.
    pub name: String,
    pub version: String,
    pub category: BranchCategory,
    pub status: CollectionStatus,
}

impl Collection {
    pub fn new(
        branchname: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        category: BranchCategory,
        status: CollectionStatus,
    ) -> Self {
        Self {
            branchname: branchname.into(),
            name: name.into(),
            version: version.into(),
            category,
            status,
        }
    }

    pub fn is_under_development(&self) -> bool {
        self.status == CollectionStatus::UnderDevelopment
    }
}
