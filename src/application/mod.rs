//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic, concurrency and dataset loading.

pub mod dataset;
pub mod error;
pub mod error_ext;
pub mod fanout;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use services::FolderService;
