use aes::cipher::KeyInit;
use aes::Aes256;
use cairn_types::ContentId;
use hmac::Mac;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::hasher::{HmacSha256, IdHasher};
use crate::suite::Suite;

/// The primitives derived from a zone secret.
///
/// The secret is split into the ID-hash key, the cipher key, and the MAC
/// key, in that order, using the suite's fixed sub-key lengths.
pub struct ZoneKeys {
    suite: Suite,
    secret: Zeroizing<Vec<u8>>,
    id_hasher: IdHasher,
    pub(crate) cipher: Aes256,
    pub(crate) mac: HmacSha256,
}

impl ZoneKeys {
    /// Build the zone primitives from `secret`.
    ///
    /// Fails with [`CryptoError::InvalidKeyLength`] unless the secret is
    /// exactly `suite.key_len()` bytes.
    pub fn new(secret: &[u8], suite: Suite) -> CryptoResult<Self> {
        if secret.len() != suite.key_len() {
            return Err(CryptoError::InvalidKeyLength {
                expected: suite.key_len(),
                actual: secret.len(),
            });
        }
        let split1 = suite.id_hash_key_len();
        let split2 = split1 + suite.cipher_key_len();

        match suite {
            Suite::Aes256CbcHmacSha256 => {
                let id_hasher = IdHasher::new(&secret[..split1])?;
                let cipher = Aes256::new_from_slice(&secret[split1..split2]).map_err(|_| {
                    CryptoError::InvalidKeyLength {
                        expected: suite.cipher_key_len(),
                        actual: split2 - split1,
                    }
                })?;
                let mac = <HmacSha256 as Mac>::new_from_slice(&secret[split2..]).map_err(|_| {
                    CryptoError::InvalidKeyLength {
                        expected: suite.mac_key_len(),
                        actual: secret.len() - split2,
                    }
                })?;
                Ok(Self {
                    suite,
                    secret: Zeroizing::new(secret.to_vec()),
                    id_hasher,
                    cipher,
                    mac,
                })
            }
        }
    }

    /// Generate a fresh random secret for `suite`.
    pub fn generate_secret(suite: Suite) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let mut secret = Zeroizing::new(vec![0u8; suite.key_len()]);
        OsRng
            .try_fill_bytes(&mut secret)
            .map_err(|e| CryptoError::Random(e.to_string()))?;
        Ok(secret)
    }

    pub fn suite(&self) -> Suite {
        self.suite
    }

    /// The full zone secret, used when wrapping it for an identity.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Content ID of `plaintext` in this zone.
    pub fn content_id(&self, plaintext: &[u8]) -> ContentId {
        self.id_hasher.hash(plaintext)
    }

    /// MAC of `data` under the zone MAC key.
    pub fn mac(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }

    /// Constant-time check of `tag` against the MAC of `data`.
    pub fn verify_mac(&self, data: &[u8], tag: &[u8]) -> bool {
        let mut mac = self.mac.clone();
        mac.update(data);
        mac.verify_slice(tag).is_ok()
    }

    /// Size of a MAC tag in bytes.
    pub fn mac_size(&self) -> usize {
        32
    }

    /// Cipher block size in bytes.
    pub fn block_size(&self) -> usize {
        16
    }
}

impl std::fmt::Debug for ZoneKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneKeys")
            .field("suite", &self.suite)
            .finish_non_exhaustive()
    }
}
