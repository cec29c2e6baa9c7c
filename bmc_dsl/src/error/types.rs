//! Error enums for the overlay DSL, the merge engine, resource memory and
//! settings loading.

use figment::Error as FigmentError;
use thiserror::Error;

/// Misuse of the overlay DSL.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DslError {
    /// The overlay root is an array or a primitive and cannot patch a map.
    #[error("overlay does not render to a map (root is {kind})")]
    NotAMap {
        /// Shape of the offending root node.
        kind: &'static str,
    },

    /// `<empty>` was bound directly to a key.
    #[error("can't map '{key}' to <empty>, <empty> can exist only in array")]
    EmptyOutsideArray {
        /// Key the marker was bound to.
        key: String,
    },

    /// `<empty>` shared an array literal with other items.
    #[error("can't process array of values, <empty> should be the sole element of array")]
    EmptyNotSole,

    /// An array literal appeared as an item of another array literal.
    #[error("can't process nested array literals")]
    NestedArray,

    /// The merge engine rejected the overlay.
    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Failures raised while planning or executing a merge.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MergeError {
    /// A plan was built without a base or an override.
    #[error("{what} for merger plan cannot be null")]
    PlanBuilding {
        /// Which part of the plan was missing.
        what: &'static str,
    },

    /// A map override was expected where another shape was supplied.
    #[error("expected object value, found {kind}")]
    ExpectedObject {
        /// Shape that was supplied instead.
        kind: &'static str,
    },

    /// A `@removed` key carried a value other than `true`.
    #[error("key indicating property removal ({key}) can have only 'true' value")]
    InvalidRemoval {
        /// The offending `@removed` key.
        key: String,
    },

    /// The override targeted a property that cannot be overridden.
    #[error("can't override property '{key}' of resource '{resource}': {kind} cannot be overridden")]
    NonMergeable {
        /// Property that was targeted.
        key: String,
        /// Identifier of the resource being merged.
        resource: String,
        /// Description of the property's kind.
        kind: &'static str,
    },

    /// A nested step lost its context before it could run.
    #[error("merge context for '{key}' is missing or not an object")]
    MissingContext {
        /// Key of the nested context.
        key: String,
    },

    /// No processor in the chain accepted an operation.
    #[error("don't know how to handle operation {operation}")]
    Unhandled {
        /// Debug rendering of the rejected operation.
        operation: String,
    },
}

/// Misuse of resource memory.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MemoryError {
    /// Memorization was started while already memorizing.
    #[error("resource memory is already open")]
    AlreadyOpen,

    /// A resource was remembered while memory was closed.
    #[error("can't add resource to memory as it is not open")]
    NotOpen,
}

/// Failures while loading settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// Figment could not gather or extract the settings.
    #[error("failed to gather settings: {0}")]
    Gathering(#[from] Box<FigmentError>),
}

impl From<FigmentError> for SettingsError {
    fn from(err: FigmentError) -> Self {
        Self::Gathering(Box::new(err))
    }
}

/// Any failure produced by this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BmcDslError {
    /// Overlay DSL failure.
    #[error(transparent)]
    Dsl(#[from] DslError),

    /// Merge engine failure.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// Resource memory failure.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// Settings failure.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
