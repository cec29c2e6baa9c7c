//! Document-tree DSL and resource ordering for a simulated BMC.
//!
//! Behaviour code describes partial updates of Redfish-style resources with
//! the closure-based builder in [`dsl`]. The builder produces a document tree
//! ([`node`]) that is merged on top of a resource's JSON map by the [`merge`]
//! engine. Resources touched while building a tree can be recorded in
//! [`memory::ResourceMemory`], which returns them parent-before-child.
//!
//! ```rust
//! use bmc_dsl::resource::Resource;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), bmc_dsl::DslError> {
//! let system = Resource::new("System1");
//! system.update(|root| {
//!     root.object("Status", |status| {
//!         status.set("Health", "OK").set("State", "Enabled");
//!         Ok(())
//!     })?;
//!     Ok(())
//! })?;
//! assert_eq!(system.traverse("Status/State"), Some(json!("Enabled")));
//! # Ok(())
//! # }
//! ```

pub mod dsl;
pub mod error;
pub mod memory;
pub mod merge;
pub mod node;
pub mod resource;
pub mod settings;

pub use dsl::{ArrayItem, Entry, MapScope, Overlay};
pub use error::{
    BmcDslError, BmcResult, DslError, DslResult, MemoryError, MemoryResult, MergeError,
    MergeResult, SettingsError,
};
pub use memory::{ResourceMemory, TreeElement};
pub use node::TreeNode;
pub use resource::Resource;
pub use settings::MergeSettings;
