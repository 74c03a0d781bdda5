use crate::error::TypeError;
use crate::id::ContentId;

/// Storage location of an object: the first two ID bytes pick a two-level
/// directory, the rest of the ID (hex) is the key inside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shard {
    pub prefix: [u8; 2],
    pub leaf: String,
}

impl Shard {
    /// Namespace of this shard inside `zone`.
    pub fn namespace(&self, zone: &str) -> String {
        shard_namespace(zone, self.prefix)
    }
}

/// `{zone}/objects/{b0}/{b1}` with each byte as two lowercase hex digits.
pub fn shard_namespace(zone: &str, prefix: [u8; 2]) -> String {
    format!("{zone}/objects/{:02x}/{:02x}", prefix[0], prefix[1])
}

impl ContentId {
    /// Split this ID into its shard location.
    pub fn shard(&self) -> Result<Shard, TypeError> {
        let bytes = self.as_bytes();
        if bytes.len() < 2 {
            return Err(TypeError::InvalidId { len: bytes.len() });
        }
        Ok(Shard {
            prefix: [bytes[0], bytes[1]],
            leaf: hex::encode(&bytes[2..]),
        })
    }

    /// Rebuild an ID from a shard prefix and a hex leaf key.
    pub fn from_shard(prefix: [u8; 2], leaf: &str) -> Result<Self, TypeError> {
        let suffix = hex::decode(leaf).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let mut data = Vec::with_capacity(2 + suffix.len());
        data.extend_from_slice(&prefix);
        data.extend_from_slice(&suffix);
        Ok(Self::new(data))
    }
}
