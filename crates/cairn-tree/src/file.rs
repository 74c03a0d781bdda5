use std::io::{self, Read};
use std::slice;

use cairn_codec::record;
use cairn_types::ContentId;

use crate::io::ObjectReader;

/// Read access to a file node's content.
pub trait File {
    /// Content size in bytes.
    fn size(&self) -> i64;

    /// Stream the content, fetching any referenced chunks from `objects`.
    fn reader<'a>(&'a self, objects: &'a dyn ObjectReader) -> Box<dyn Read + 'a>;
}

/// A file whose content is stored inline in the node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimpleFile {
    pub content: Vec<u8>,
}

record!(SimpleFile { content });

impl SimpleFile {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl File for SimpleFile {
    fn size(&self) -> i64 {
        self.content.len() as i64
    }

    fn reader<'a>(&'a self, _objects: &'a dyn ObjectReader) -> Box<dyn Read + 'a> {
        Box::new(self.content.as_slice())
    }
}

/// One chunk of a [`ChunkedFile`]: its length and the ID of its bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chunk {
    pub size: i64,
    pub content: ContentId,
}

record!(Chunk { size, content });

/// A file split into separately stored chunks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkedFile {
    pub content_size: i64,
    pub chunks: Vec<Chunk>,
}

record!(ChunkedFile { content_size, chunks });

impl ChunkedFile {
    pub fn new(content_size: i64) -> Self {
        Self {
            content_size,
            chunks: Vec::new(),
        }
    }

    pub fn add_chunk(&mut self, size: i64, content: ContentId) {
        self.chunks.push(Chunk { size, content });
    }
}

impl File for ChunkedFile {
    fn size(&self) -> i64 {
        self.content_size
    }

    fn reader<'a>(&'a self, objects: &'a dyn ObjectReader) -> Box<dyn Read + 'a> {
        Box::new(ChunkReader {
            objects,
            chunks: self.chunks.iter(),
            data: Vec::new(),
            pos: 0,
        })
    }
}

/// Forward-only reader over a chunk list.
///
/// Holds at most one fetched chunk; the next one is read only when the
/// current one is exhausted.
struct ChunkReader<'a> {
    objects: &'a dyn ObjectReader,
    chunks: slice::Iter<'a, Chunk>,
    data: Vec<u8>,
    pos: usize,
}

impl Read for ChunkReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos == self.data.len() {
            let Some(chunk) = self.chunks.next() else {
                return Ok(0);
            };
            self.data = self.objects.read(&chunk.content).map_err(io::Error::other)?;
            self.pos = 0;
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
