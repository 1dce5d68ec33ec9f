//! Error types for swscheduler

/// Scheduler errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The session configuration is unusable (non-positive radius,
    /// unrecognized ordering policy). Raised at construction time, never
    /// silently defaulted.
    #[error("Invalid session configuration: {0}")]
    Validation(String),

    /// A repository or project-directory call failed. Covers missing assets,
    /// missing projects and unreachable storage; the pool is left in its
    /// last consistent state.
    #[error(transparent)]
    Asset(#[from] swassets::AssetError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, Error>;
