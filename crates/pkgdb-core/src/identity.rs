use crate::config::Config;
use crate::error::{PkgdbError, Result};
use crate::types::GROUP_PREFIX;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A resolved caller: who they are and which capabilities they hold.
///
/// Built once per request by a [`Directory`] and passed by reference into the
/// lifecycle engine, which never queries the identity provider itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub is_admin: bool,
    pub is_packager: bool,
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl Identity {
    /// An identity with no roles and no group memberships.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: false,
            is_packager: false,
            groups: BTreeSet::new(),
        }
    }

    pub fn packager(username: impl Into<String>) -> Self {
        Self {
            is_packager: true,
            ..Self::new(username)
        }
    }

    /// Administrators are packagers too.
    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            is_packager: true,
            ..Self::new(username)
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// True when `name` designates this identity, either directly or through a
    /// `group::<name>` collective the identity belongs to.
    pub fn acts_as(&self, name: &str) -> bool {
        match name.strip_prefix(GROUP_PREFIX) {
            Some(group) => self.in_group(group),
            None => self.username == name,
        }
    }
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Identity provider seam: turns a username into an [`Identity`] and answers
/// whether an arbitrary name may own packages.
pub trait Directory {
    fn resolve(&self, username: &str) -> Result<Identity>;

    /// Whether `name` (a user or a `group::` collective) is a valid packager.
    fn is_packager(&self, name: &str) -> bool;
}

/// Directory backed by the `users` section of `.pkgdb/config.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigDirectory {
    config: Config,
}

impl ConfigDirectory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn groups_of(&self, username: &str) -> Option<&[String]> {
        self.config
            .users
            .get(username)
            .map(|u| u.groups.as_slice())
    }
}

impl Directory for ConfigDirectory {
    fn resolve(&self, username: &str) -> Result<Identity> {
        let groups = self
            .groups_of(username)
            .ok_or_else(|| PkgdbError::UnknownUser(username.to_string()))?;

        let is_admin = groups
            .iter()
            .any(|g| self.config.admin_groups.contains(g));
        let is_packager = is_admin || groups.contains(&self.config.packager_group);

        Ok(Identity {
            username: username.to_string(),
            is_admin,
            is_packager,
            groups: groups.iter().cloned().collect(),
        })
    }

    fn is_packager(&self, name: &str) -> bool {
        if let Some(group) = name.strip_prefix(GROUP_PREFIX) {
            return self.config.collectives.iter().any(|c| c == group);
        }
        match self.groups_of(name) {
            Some(groups) => groups
                .iter()
                .any(|g| g == &self.config.packager_group || self.config.admin_groups.contains(g)),
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
