//! Encrypted object zones for Cairn.
//!
//! A [`Zone`] is a named namespace in a persistence [`Accessor`] holding
//! encrypted, deduplicated objects. Every object is addressed by a keyed
//! hash of its plaintext, so writing the same content twice stores it once.
//!
//! # Lifecycle
//!
//! 1. [`Zone::create`] draws a random zone secret; [`Zone::add_identity`]
//!    stores that secret wrapped for a public key.
//! 2. Trees are written bottom-up through [`Zone::write`] (or the
//!    [`cairn_tree::ObjectWriter`] impl) and published with
//!    [`Zone::commit`], which records a snapshot and updates the root
//!    pointer.
//! 3. [`Zone::open`] unwraps the secret with a private key and resolves the
//!    head snapshot. A missing, corrupt or dangling root pointer triggers a
//!    scan of the whole object store for the newest snapshot.
//!
//! [`Accessor`]: cairn_store::Accessor

pub mod error;
pub mod identity;
pub mod root_pointer;
pub mod zone;

pub use error::{ZoneError, ZoneResult};
pub use identity::{IdentityError, PrivateKey, PublicKey};
pub use root_pointer::{RootPointer, ROOT_DISTANCE, ROOT_POINTER_KEY};
pub use zone::{Head, Zone, ZoneStats};
