//! Error types produced by the overlay DSL and its collaborators.
//!
//! Every variant describes a programming or usage error. Errors are raised at
//! the point of misuse and propagated unchanged; nothing is logged and
//! swallowed.

mod types;

pub use types::{BmcDslError, DslError, MemoryError, MergeError, SettingsError};

/// Result alias for overlay DSL operations.
pub type DslResult<T> = Result<T, DslError>;

/// Result alias for merge planning and execution.
pub type MergeResult<T> = Result<T, MergeError>;

/// Result alias for resource memory operations.
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Result alias spanning every error in the crate.
pub type BmcResult<T> = Result<T, BmcDslError>;
