//! Domain layer: folder forests and their invariants
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod org;
pub mod registry;

pub use arena::{FolderArena, FolderTreeNode, PreOrderIterator};
pub use builder::RegistryBuilder;
pub use entities::{Folder, OrgId, PATH_SEPARATOR};
pub use error::{DomainError, DomainResult};
pub use org::Org;
pub use registry::Registry;
