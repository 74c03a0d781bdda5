use std::fmt;

use cairn_codec::{CodecResult, Decode, Decoder, Encode, Encoder};

use crate::error::{TreeError, TreeResult};

/// Version written into every node header.
pub const NODE_VERSION: u8 = 1;

/// Node type tag, the first byte of every serialized node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    SimpleFile = 1,
    ChunkedFile = 2,
    Directory = 3,
    Snapshot = 4,
}

impl NodeType {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> TreeResult<Self> {
        match tag {
            1 => Ok(Self::SimpleFile),
            2 => Ok(Self::ChunkedFile),
            3 => Ok(Self::Directory),
            4 => Ok(Self::Snapshot),
            other => Err(TreeError::UnsupportedType(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SimpleFile => "simple-file",
            Self::ChunkedFile => "chunked-file",
            Self::Directory => "directory",
            Self::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A size in bytes, displayed in the largest unit it exceeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileSize(pub i64);

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const KB: i64 = 1024;
        const MB: i64 = 1024 * 1024;
        if self.0 > MB {
            write!(f, "{} MB", self.0 / MB)
        } else if self.0 > KB {
            write!(f, "{} kB", self.0 / KB)
        } else {
            write!(f, "{} B", self.0)
        }
    }
}

impl From<i64> for FileSize {
    fn from(size: i64) -> Self {
        Self(size)
    }
}

impl Encode for FileSize {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        self.0.encode(enc)
    }
}

impl Decode for FileSize {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        i64::decode(dec).map(Self)
    }
}

/// File mode bits as stored in directory entries.
///
/// The directory flag is the top bit; the low nine bits are the Unix
/// permission bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FileMode(pub u32);

impl FileMode {
    pub const DIR: u32 = 1 << 31;
    pub const PERM: u32 = 0o777;

    pub fn file(perm: u32) -> Self {
        Self(perm & Self::PERM)
    }

    pub fn dir(perm: u32) -> Self {
        Self(Self::DIR | (perm & Self::PERM))
    }

    pub fn is_dir(self) -> bool {
        self.0 & Self::DIR != 0
    }

    pub fn perm(self) -> u32 {
        self.0 & Self::PERM
    }
}

impl fmt::Display for FileMode {
    /// `ls`-style rendering, e.g. `drwxr-xr-x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(10);
        out.push(if self.is_dir() { 'd' } else { '-' });
        for shift in [6, 3, 0] {
            let bits = (self.0 >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        f.write_str(&out)
    }
}

impl Encode for FileMode {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        self.0.encode(enc)
    }
}

impl Decode for FileMode {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        u32::decode(dec).map(Self)
    }
}
