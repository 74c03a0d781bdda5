use cairn_types::ContentId;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{CryptoError, CryptoResult};

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Keyed content hasher producing zone-scoped [`ContentId`]s.
///
/// The key is the zone's ID-hash sub-key, so identical plaintext hashes to
/// the same ID within a zone and to unrelated IDs across zones.
#[derive(Clone)]
pub struct IdHasher {
    mac: HmacSha256,
}

impl IdHasher {
    pub fn new(key: &[u8]) -> CryptoResult<Self> {
        let mac = HmacSha256::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: key.len(),
        })?;
        Ok(Self { mac })
    }

    /// Hash plaintext into its content ID.
    pub fn hash(&self, data: &[u8]) -> ContentId {
        let mut mac = self.mac.clone();
        mac.update(data);
        ContentId::new(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for IdHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdHasher").finish_non_exhaustive()
    }
}
