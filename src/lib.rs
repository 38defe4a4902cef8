//! Multi-tenant folder hierarchies.
//!
//! Each organization owns a forest of folders built from flat, path-encoded
//! records. Folder names are unique across the whole registry.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
