//! The root pointer: a small MAC-protected record naming the current head
//! snapshot of a zone.
//!
//! The record is stored twice in one value, the second copy
//! [`ROOT_DISTANCE`] bytes after the first, so a torn or partially
//! corrupted write still leaves one verifiable copy.

use cairn_codec::{from_bytes, record, to_bytes};
use cairn_crypto::ZoneKeys;
use cairn_types::ContentId;
use tracing::warn;

use crate::error::{ZoneError, ZoneResult};

/// Storage key of the root pointer inside the `{zone}` namespace.
pub const ROOT_POINTER_KEY: &str = "RootPointer";

/// Offset of the second copy.
pub const ROOT_DISTANCE: usize = 4096;

pub const ROOT_POINTER_VERSION: u8 = 1;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootPointer {
    pub version: u8,
    /// Publication time in Unix nanoseconds.
    pub timestamp: i64,
    pub pointer: ContentId,
    /// MAC over the encoded record with an empty digest.
    pub digest: Vec<u8>,
}

record!(RootPointer { version, timestamp, pointer, digest });

impl RootPointer {
    /// Build and sign a pointer to `pointer`.
    pub fn new(pointer: ContentId, timestamp: i64, keys: &ZoneKeys) -> ZoneResult<Self> {
        let mut ptr = Self {
            version: ROOT_POINTER_VERSION,
            timestamp,
            pointer,
            digest: Vec::new(),
        };
        ptr.digest = keys.mac(&ptr.signed_bytes()?);
        Ok(ptr)
    }

    fn signed_bytes(&self) -> ZoneResult<Vec<u8>> {
        let unsigned = Self {
            digest: Vec::new(),
            ..self.clone()
        };
        Ok(to_bytes(&unsigned)?)
    }

    /// Whether the digest matches the rest of the record.
    pub fn verify(&self, keys: &ZoneKeys) -> bool {
        match self.signed_bytes() {
            Ok(input) => keys.verify_mac(&input, &self.digest),
            Err(_) => false,
        }
    }
}

/// Lay out the two copies of `ptr` as one stored value.
pub fn encode_blob(ptr: &RootPointer) -> ZoneResult<Vec<u8>> {
    let encoded = to_bytes(ptr)?;
    if encoded.len() > ROOT_DISTANCE {
        return Err(ZoneError::RootPointerTooLarge(encoded.len()));
    }
    let mut data = vec![0u8; ROOT_DISTANCE];
    data[..encoded.len()].copy_from_slice(&encoded);
    data.extend_from_slice(&encoded);
    Ok(data)
}

fn decode_copy(data: &[u8], copy: u8, keys: &ZoneKeys) -> Option<RootPointer> {
    match from_bytes::<RootPointer>(data) {
        Ok((ptr, _)) if ptr.verify(keys) => Some(ptr),
        Ok(_) => {
            warn!(copy, "root pointer integrity check failed");
            None
        }
        Err(e) => {
            warn!(copy, error = %e, "root pointer copy unreadable");
            None
        }
    }
}

/// Pick the pointer to trust from a stored value.
///
/// Both copies valid: the newer wins, and on equal timestamps the second
/// copy. One valid: that one. `None` when neither verifies.
pub fn select(data: &[u8], keys: &ZoneKeys) -> Option<RootPointer> {
    let first = decode_copy(data, 1, keys);
    let second = if data.len() > ROOT_DISTANCE {
        decode_copy(&data[ROOT_DISTANCE..], 2, keys)
    } else {
        None
    };
    match (first, second) {
        (Some(a), Some(b)) => Some(if a.timestamp > b.timestamp { a } else { b }),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}
