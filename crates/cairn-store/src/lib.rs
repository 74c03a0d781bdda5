//! Persistence accessors for Cairn.
//!
//! A zone never touches storage directly: it reads and writes opaque
//! encrypted bytes through the [`Accessor`] trait, addressed by a
//! `/`-separated namespace and a key.
//!
//! # Backends
//!
//! - [`InMemoryAccessor`] -- `HashMap`-based store for tests and embedding
//! - [`FilesystemAccessor`] -- one file per value under a root directory
//!
//! # Layout used by zones
//!
//! - `{zone}/objects/{b0}/{b1}` -- encrypted objects, sharded by ID prefix
//! - `{zone}/identities` -- the zone secret wrapped for each identity
//! - `{zone}` -- the `RootPointer` value

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FilesystemAccessor;
pub use memory::InMemoryAccessor;
pub use traits::Accessor;
