//! Foundation types for Cairn.
//!
//! Every other Cairn crate depends on `cairn-types`.
//!
//! # Key Types
//!
//! - [`ContentId`]: keyed hash of an object's plaintext; dedup key and
//!   storage address in one
//! - [`Shard`]: the two-level storage location derived from a `ContentId`

pub mod error;
pub mod id;
pub mod shard;

pub use error::TypeError;
pub use id::ContentId;
pub use shard::{shard_namespace, Shard};
