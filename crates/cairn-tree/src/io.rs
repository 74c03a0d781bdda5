use cairn_types::ContentId;
use sha2::{Digest, Sha256};

use crate::error::{TreeError, TreeResult};

/// Source of plaintext objects by content ID.
pub trait ObjectReader {
    fn read(&self, id: &ContentId) -> TreeResult<Vec<u8>>;
}

/// Sink for plaintext objects; returns the ID the object is stored under.
pub trait ObjectWriter {
    fn write(&mut self, data: &[u8]) -> TreeResult<ContentId>;
}

impl<R: ObjectReader + ?Sized> ObjectReader for &R {
    fn read(&self, id: &ContentId) -> TreeResult<Vec<u8>> {
        (**self).read(id)
    }
}

impl<W: ObjectWriter + ?Sized> ObjectWriter for &mut W {
    fn write(&mut self, data: &[u8]) -> TreeResult<ContentId> {
        (**self).write(data)
    }
}

/// Writer that stores nothing and returns the SHA-256 of each object.
///
/// Used for dry runs: a traversal into a `NullWriter` produces the shape
/// of a tree without touching a zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWriter {
    written: u64,
}

impl NullWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes passed to `write`.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl ObjectWriter for NullWriter {
    fn write(&mut self, data: &[u8]) -> TreeResult<ContentId> {
        self.written += data.len() as u64;
        Ok(ContentId::new(Sha256::digest(data).to_vec()))
    }
}

impl ObjectReader for NullWriter {
    fn read(&self, id: &ContentId) -> TreeResult<Vec<u8>> {
        Err(TreeError::storage(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("object {id} not stored by null writer"),
        )))
    }
}
