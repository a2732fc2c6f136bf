#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("{0}")]
    NotFound(String),

    #[error("Environment validation failed: {0}")]
    Validation(String),

    #[error("Infrastructure failure: {0}")]
    Infrastructure(String),
}

#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// Unknown account id. Propagated to callers unchanged.
    #[error("{0}")]
    NotFound(String),

    /// Environment resolution failed. Infrastructure, validation and
    /// unregistered-recipe-type failures are wrapped uniformly; the cause
    /// stays on the error chain for diagnostics.
    #[error("Failed to calculate environment RAM size: {source}")]
    Calculation {
        #[source]
        source: ResolveError,
    },

    /// Memory-limit attribute missing or non-numeric on a machine. The whole
    /// calculation fails; partial sums are never returned.
    #[error("Failed to calculate environment RAM size due to invalid attribute format on machine '{machine}'")]
    InvalidAttribute { machine: String },

    /// A collaborator broke an invariant the tracker relies on.
    #[error("Server error: {0}")]
    Server(String),
}

pub type UsageResult<T> = Result<T, UsageError>;
