use std::fmt;

/// An encryption suite: the algorithms a zone uses and the lengths of the
/// three sub-keys its secret is split into.
///
/// A zone secret is `id_hash_key || cipher_key || mac_key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Suite {
    /// HMAC-SHA256 content IDs, AES-256-CBC, HMAC-SHA256 authentication.
    Aes256CbcHmacSha256,
}

impl Suite {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aes256CbcHmacSha256 => "AES256-CBC-HMAC-SHA256",
        }
    }

    pub fn id_hash_key_len(&self) -> usize {
        match self {
            Self::Aes256CbcHmacSha256 => 32,
        }
    }

    pub fn cipher_key_len(&self) -> usize {
        match self {
            Self::Aes256CbcHmacSha256 => 32,
        }
    }

    pub fn mac_key_len(&self) -> usize {
        match self {
            Self::Aes256CbcHmacSha256 => 32,
        }
    }

    /// Total secret length: the sum of the three sub-key lengths.
    pub fn key_len(&self) -> usize {
        self.id_hash_key_len() + self.cipher_key_len() + self.mac_key_len()
    }
}

impl Default for Suite {
    fn default() -> Self {
        Self::Aes256CbcHmacSha256
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
