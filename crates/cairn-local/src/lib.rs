//! Local filesystem side of Cairn backups.
//!
//! [`traverse`] walks a directory and stores it as a tree through any
//! [`cairn_tree::ObjectWriter`]: a zone for real backups, or a
//! [`cairn_tree::NullWriter`] for dry runs. [`update`] runs one backup
//! cycle: traverse the configured source, then commit a snapshot when the
//! tree changed.

pub mod config;
pub mod error;
pub mod traverse;
pub mod update;

pub use config::{LocalConfig, TraverseConfig};
pub use error::{LocalError, LocalResult};
pub use traverse::traverse;
pub use update::{update, UpdateReport};
