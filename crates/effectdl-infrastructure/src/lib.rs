//! Persistent storage for effectdl.
//!
//! Provides the directory-backed image repository and platform path
//! resolution. The repository is constructed explicitly via
//! [`DirImageRepository::open`]; there is no lazy first-touch
//! initialization.

pub mod dir_image_repository;
pub mod paths;

pub use dir_image_repository::DirImageRepository;
pub use paths::DlPaths;
