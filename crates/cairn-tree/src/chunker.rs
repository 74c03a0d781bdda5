use std::io::{ErrorKind, Read};

use cairn_types::ContentId;
use tracing::debug;

use crate::error::TreeResult;
use crate::file::{ChunkedFile, SimpleFile};
use crate::io::ObjectWriter;
use crate::node::Node;

/// Largest file stored inline, and the size of each chunk of a larger one.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Store the content of `reader` as a file node and return the node ID.
///
/// `size` is the expected length: up to [`CHUNK_SIZE`] the content is
/// inlined in a simple file, beyond that it is split into chunks.
pub fn write_file<W, R>(writer: &mut W, reader: R, size: u64) -> TreeResult<ContentId>
where
    W: ObjectWriter + ?Sized,
    R: Read,
{
    write_file_with(writer, reader, size, CHUNK_SIZE)
}

/// [`write_file`] with an explicit chunk size.
pub fn write_file_with<W, R>(
    writer: &mut W,
    mut reader: R,
    size: u64,
    chunk_size: usize,
) -> TreeResult<ContentId>
where
    W: ObjectWriter + ?Sized,
    R: Read,
{
    if size <= chunk_size as u64 {
        let mut content = Vec::with_capacity(size as usize);
        reader.read_to_end(&mut content)?;
        let node = Node::from(SimpleFile::new(content));
        return writer.write(&node.serialize()?);
    }

    let mut file = ChunkedFile::new(0);
    let mut buf = vec![0u8; chunk_size];
    let mut total: i64 = 0;
    loop {
        let read = fill(&mut reader, &mut buf)?;
        if read == 0 {
            break;
        }
        let id = writer.write(&buf[..read])?;
        file.add_chunk(read as i64, id);
        total += read as i64;
    }
    // The content may have changed since `size` was taken.
    file.content_size = total;
    debug!(size = total, chunks = file.chunks.len(), "wrote chunked file");

    writer.write(&Node::from(file).serialize()?)
}

/// Store an in-memory buffer as a file node.
pub fn write_bytes<W: ObjectWriter + ?Sized>(
    writer: &mut W,
    data: &[u8],
) -> TreeResult<ContentId> {
    write_file(writer, data, data.len() as u64)
}

/// Read until `buf` is full or the reader is exhausted.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
