//! Scene error types

use std::fmt;

use thiserror::Error;

/// Which pooled collection an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolCategory {
    /// Model pool
    Model,
    /// Camera pool
    Camera,
    /// Light pool
    Light,
}

impl fmt::Display for PoolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Model => "model",
            Self::Camera => "camera",
            Self::Light => "light",
        };
        f.write_str(name)
    }
}

/// Errors from scene operations
///
/// All of these are caller programming errors; normal misses and repeated
/// add/remove calls are not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Pool is full and configured not to grow
    #[error("The {category} pool is full at capacity {capacity}")]
    CapacityExceeded {
        /// Pool that refused the add
        category: PoolCategory,
        /// Capacity at the time of the add
        capacity: usize,
    },

    /// Indexed access past the live count
    #[error("Index {index} out of range for {count} {category}s")]
    IndexOutOfRange {
        /// Pool that was indexed
        category: PoolCategory,
        /// Requested index
        index: usize,
        /// Live element count
        count: usize,
    },

    /// Key does not refer to a live entity (never created or destroyed)
    #[error("Unknown {category} handle")]
    UnknownHandle {
        /// Pool the key was used with
        category: PoolCategory,
    },
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
