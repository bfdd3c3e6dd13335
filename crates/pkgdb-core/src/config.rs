use crate::error::{PkgdbError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// AuditConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Append one line per committed mutation to `.pkgdb/audit.log`.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
        }
    }
}

// ---------------------------------------------------------------------------
// UserEntry
// ---------------------------------------------------------------------------

/// Stand-in for the identity provider: the groups a user belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserEntry {
    #[serde(default)]
    pub groups: Vec<String>,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    /// Group whose members count as packagers.
    #[serde(default = "default_packager_group")]
    pub packager_group: String,
    /// Groups whose members count as administrators.
    #[serde(default = "default_admin_groups")]
    pub admin_groups: Vec<String>,
    /// Groups that may be named as a `group::<name>` point of contact.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collectives: Vec<String>,
    #[serde(default)]
    pub users: BTreeMap<String, UserEntry>,
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_version() -> u32 {
    1
}

fn default_packager_group() -> String {
    "packager".to_string()
}

fn default_admin_groups() -> Vec<String> {
    vec!["sysadmin-main".to_string()]
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            packager_group: default_packager_group(),
            admin_groups: default_admin_groups(),
            collectives: Vec::new(),
            users: BTreeMap::new(),
            audit: AuditConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(PkgdbError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.packager_group.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "packager_group is empty: nobody can act on packages".to_string(),
            });
        }

        if self.admin_groups.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no admin_groups configured: unretire is impossible".to_string(),
            });
        }

        // Admin groups nobody belongs to are usually a typo.
        for group in &self.admin_groups {
            let used = self.users.values().any(|u| u.groups.contains(group));
            if !used {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("admin group '{group}' has no members"),
                });
            }
        }

        for (name, user) in &self.users {
            if user.groups.is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("user '{name}' belongs to no group"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
