use std::fmt;

use cairn_codec::{CodecResult, Decode, Decoder, Encode, Encoder};

use crate::error::TypeError;

/// Content-addressed identifier for any stored object.
///
/// A `ContentId` is the zone-keyed hash of an object's plaintext. Identical
/// plaintext in the same zone always produces the same `ContentId`, which
/// makes objects deduplicatable. The same plaintext in two zones produces
/// unrelated IDs because the hash key belongs to the zone.
///
/// An empty `ContentId` is *undefined* and means "no object".
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(Vec<u8>);

impl ContentId {
    /// Wrap raw hash bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    /// The undefined ID.
    pub const fn undefined() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` if this ID references no object.
    pub fn is_undefined(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Full hex rendering, used for every persisted or parsed form.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse a full hex ID.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({self})")
    }
}

/// Abbreviated rendering for display: IDs longer than 16 bytes show as
/// `first8hex...last8hex`.
impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() > 16 {
            let tail = &self.0[self.0.len() - 8..];
            write!(f, "{}...{}", hex::encode(&self.0[..8]), hex::encode(tail))
        } else {
            write!(f, "{}", self.to_hex())
        }
    }
}

impl From<Vec<u8>> for ContentId {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ContentId {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for ContentId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Encode for ContentId {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        enc.put_bytes(&self.0)
    }
}

impl Decode for ContentId {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        Ok(Self(dec.get_bytes()?))
    }
}
