//! Application services

pub mod folders;

pub use folders::FolderService;
