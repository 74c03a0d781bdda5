//! # cairn-crypto
//!
//! Zone key material and object encryption for Cairn.
//!
//! A zone is protected by a single random secret. [`ZoneKeys`] splits it
//! into three independent sub-keys:
//!
//! - an ID-hash key: content IDs are `HMAC-SHA256(id_key, plaintext)`, so
//!   identical plaintext deduplicates inside a zone but IDs reveal nothing
//!   across zones
//! - an AES-256 key for CBC encryption of object payloads
//! - an HMAC-SHA256 key authenticating `IV || ciphertext`
//!
//! [`ZoneKeys::seal`] and [`ZoneKeys::open`] implement the on-disk object
//! format, including optional zlib compression of the payload.

pub mod envelope;
pub mod error;
pub mod hasher;
pub mod keys;
pub mod suite;

pub use envelope::Sealed;
pub use error::{CryptoError, CryptoResult};
pub use hasher::IdHasher;
pub use keys::ZoneKeys;
pub use suite::Suite;
