use thiserror::Error;

/// Errors surfaced to callers of the sandbox engine.
///
/// Nothing in the per-frame loop can fail; these come from spawn requests,
/// configuration and snapshot loading.
#[derive(Debug, Error)]
pub enum Error {
    /// Snapshot input that does not match the schema. The universe is left untouched.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("invalid spawn parameters: mass {mass}, radius {radius} (both must be positive and finite)")]
    InvalidSpawnParameters { mass: f32, radius: f32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSnapshot(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
