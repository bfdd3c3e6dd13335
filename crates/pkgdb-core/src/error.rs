use thiserror::Error;

#[derive(Debug, Error)]
pub enum PkgdbError {
    #[error("not initialized: run 'pkgdb init'")]
    NotInitialized,

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("user \"{user}\" is not allowed to {operation}")]
    Unauthorized { user: String, operation: String },

    /// One entry per offending field, e.g. `pkgnames: This field is required.`
    #[error("Invalid input submitted: {}", .0.join("; "))]
    InvalidRequest(Vec<String>),

    #[error("invalid listing status: {0}")]
    InvalidStatus(String),

    #[error("invalid branch category: {0}")]
    InvalidCategory(String),

    #[error("invalid collection status: {0}")]
    InvalidCollectionStatus(String),

    #[error("invalid acl: {0}")]
    InvalidAcl(String),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Package: {0} not found")]
    PackageNotFound(String),

    #[error("No package found on these branches: {0}")]
    NoListingOnBranches(String),

    #[error("duplicate listing for {package} on {branch}")]
    DuplicateListing { package: String, branch: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PkgdbError>;
