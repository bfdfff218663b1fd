#![forbid(unsafe_code)]

//! Surface errors.

use std::fmt;

use vcon_core::config::ConfigError;

/// Failures of surface construction and surrogate resolution.
///
/// The lookup variants mean the structural tree and the render tree have
/// diverged. They are fatal for the current render operation and are never
/// retried.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// No top-level node with this identifier.
    RootNotFound { id: String },
    /// The parent resolved, but has no child with this marker.
    ChildNotFound { parent_key: String, local_id: String },
    /// The parent already carries a ring container.
    AlreadyMounted { key: String },
    /// The environment refused to create a node.
    Environment(String),
    /// The surface was configured with unusable dimensions.
    Config(ConfigError),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { id } => write!(f, "render root #{id} not found"),
            Self::ChildNotFound {
                parent_key,
                local_id,
            } => write!(f, "no child {local_id:?} under {parent_key:?}"),
            Self::AlreadyMounted { key } => write!(f, "a surface is already mounted at {key:?}"),
            Self::Environment(msg) => write!(f, "render environment error: {msg}"),
            Self::Config(err) => write!(f, "invalid surface config: {err}"),
        }
    }
}

impl std::error::Error for SurfaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SurfaceError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
