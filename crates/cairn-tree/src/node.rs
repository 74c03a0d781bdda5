use cairn_codec::{Decode, Decoder, Encode, Encoder};
use cairn_types::ContentId;

use crate::directory::Directory;
use crate::error::{TreeError, TreeResult};
use crate::file::{ChunkedFile, File, SimpleFile};
use crate::io::ObjectReader;
use crate::snapshot::Snapshot;
use crate::types::{NodeType, NODE_VERSION};

/// A tree node.
///
/// Serialized as `type_tag || version || fields`. A node's ID is the zone
/// ID of these bytes, so nodes are immutable once written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    SimpleFile(SimpleFile),
    ChunkedFile(ChunkedFile),
    Directory(Directory),
    Snapshot(Snapshot),
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::SimpleFile(_) => NodeType::SimpleFile,
            Self::ChunkedFile(_) => NodeType::ChunkedFile,
            Self::Directory(_) => NodeType::Directory,
            Self::Snapshot(_) => NodeType::Snapshot,
        }
    }

    pub fn serialize(&self) -> TreeResult<Vec<u8>> {
        let mut enc = Encoder::new();
        enc.put_u8(self.node_type().tag());
        enc.put_u8(NODE_VERSION);
        match self {
            Self::SimpleFile(n) => n.encode(&mut enc)?,
            Self::ChunkedFile(n) => n.encode(&mut enc)?,
            Self::Directory(n) => n.encode(&mut enc)?,
            Self::Snapshot(n) => n.encode(&mut enc)?,
        }
        Ok(enc.into_bytes())
    }

    /// Decode a node. The whole input must be consumed.
    pub fn deserialize(data: &[u8]) -> TreeResult<Self> {
        let Some(&tag) = data.first() else {
            return Err(TreeError::Truncated);
        };
        let node_type = NodeType::from_tag(tag)?;

        let mut dec = Decoder::new(data);
        dec.get_u8()?;
        // Any version is accepted; the layout has never changed.
        let _version = dec.get_u8()?;
        let node = match node_type {
            NodeType::SimpleFile => Self::SimpleFile(SimpleFile::decode(&mut dec)?),
            NodeType::ChunkedFile => Self::ChunkedFile(ChunkedFile::decode(&mut dec)?),
            NodeType::Directory => Self::Directory(Directory::decode(&mut dec)?),
            NodeType::Snapshot => Self::Snapshot(Snapshot::decode(&mut dec)?),
        };
        dec.finish()?;
        Ok(node)
    }

    /// Fetch and decode the node stored under `id`.
    pub fn deserialize_by_id<R: ObjectReader + ?Sized>(
        id: &ContentId,
        objects: &R,
    ) -> TreeResult<Self> {
        if id.is_undefined() {
            return Err(TreeError::UndefinedId);
        }
        let data = objects.read(id)?;
        Self::deserialize(&data)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Self::Directory(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_snapshot(&self) -> Option<&Snapshot> {
        match self {
            Self::Snapshot(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&dyn File> {
        match self {
            Self::SimpleFile(f) => Some(f as &dyn File),
            Self::ChunkedFile(f) => Some(f as &dyn File),
            _ => None,
        }
    }

    /// Like [`Node::as_file`], failing with [`TreeError::NotAFile`].
    pub fn file(&self) -> TreeResult<&dyn File> {
        self.as_file().ok_or(TreeError::NotAFile(self.node_type()))
    }

    pub fn into_snapshot(self) -> TreeResult<Snapshot> {
        match self {
            Self::Snapshot(s) => Ok(s),
            other => Err(TreeError::UnexpectedType {
                expected: NodeType::Snapshot,
                actual: other.node_type(),
            }),
        }
    }

    pub fn into_directory(self) -> TreeResult<Directory> {
        match self {
            Self::Directory(d) => Ok(d),
            other => Err(TreeError::UnexpectedType {
                expected: NodeType::Directory,
                actual: other.node_type(),
            }),
        }
    }
}

impl From<SimpleFile> for Node {
    fn from(n: SimpleFile) -> Self {
        Self::SimpleFile(n)
    }
}

impl From<ChunkedFile> for Node {
    fn from(n: ChunkedFile) -> Self {
        Self::ChunkedFile(n)
    }
}

impl From<Directory> for Node {
    fn from(n: Directory) -> Self {
        Self::Directory(n)
    }
}

impl From<Snapshot> for Node {
    fn from(n: Snapshot) -> Self {
        Self::Snapshot(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::testing::MemoryObjects;
    use crate::io::ObjectWriter;
    use crate::types::{FileMode, FileSize};
    use cairn_codec::CodecError;

    fn id(byte: u8) -> ContentId {
        ContentId::new(vec![byte; 32])
    }

    #[test]
    fn simple_file_wire_layout() {
        let bytes = Node::from(SimpleFile::new(b"hi".to_vec())).serialize().unwrap();
        assert_eq!(bytes, vec![1, 1, 0, 0, 0, 2, b'h', b'i']);
    }

    #[test]
    fn snapshot_wire_layout() {
        let snapshot = Snapshot::new(7, FileSize(3), id(0xaa), ContentId::undefined());
        let bytes = Node::from(snapshot.clone()).serialize().unwrap();

        let mut expected = vec![4u8, 1];
        expected.extend_from_slice(&7i64.to_be_bytes());
        expected.extend_from_slice(&3i64.to_be_bytes());
        expected.extend_from_slice(&[0, 0, 0, 32]);
        expected.extend_from_slice(&[0xaa; 32]);
        expected.extend_from_slice(&[0, 0, 0, 0]);
        assert_eq!(bytes, expected);
        assert_eq!(Node::deserialize(&bytes).unwrap(), Node::Snapshot(snapshot));
    }

    #[test]
    fn directory_preserves_entry_order() {
        let mut dir = Directory::new();
        dir.add_entry("zeta", FileMode::file(0o644), 100, id(1));
        dir.add_entry("alpha", FileMode::dir(0o755), 200, id(2));
        let bytes = Node::from(dir).serialize().unwrap();

        let node = Node::deserialize(&bytes).unwrap();
        assert!(node.is_directory());
        let dir = node.as_directory().unwrap();
        let names: Vec<_> = dir.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert!(dir.get("alpha").unwrap().mode.is_dir());
        assert_eq!(dir.get("zeta").unwrap().mod_time, 100);
    }

    #[test]
    fn chunked_file_decodes_as_file() {
        let mut file = ChunkedFile::new(10);
        file.add_chunk(6, id(1));
        file.add_chunk(4, id(2));
        let node = Node::deserialize(&Node::from(file).serialize().unwrap()).unwrap();
        assert_eq!(node.node_type(), NodeType::ChunkedFile);
        assert_eq!(node.file().unwrap().size(), 10);
        assert!(node.as_snapshot().is_none());
    }

    #[test]
    fn empty_input_is_truncated() {
        assert!(matches!(Node::deserialize(&[]), Err(TreeError::Truncated)));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(matches!(
            Node::deserialize(&[9, 1, 0, 0]),
            Err(TreeError::UnsupportedType(9))
        ));
    }

    #[test]
    fn header_only_is_a_codec_error() {
        assert!(matches!(
            Node::deserialize(&[1]),
            Err(TreeError::Codec(CodecError::UnexpectedEof { .. }))
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = Node::from(SimpleFile::new(b"x".to_vec())).serialize().unwrap();
        bytes.push(0);
        assert!(matches!(
            Node::deserialize(&bytes),
            Err(TreeError::Codec(CodecError::TrailingBytes { .. }))
        ));
    }

    #[test]
    fn non_file_nodes_are_not_files() {
        let node = Node::from(Directory::new());
        assert!(node.as_file().is_none());
        assert!(matches!(
            node.file(),
            Err(TreeError::NotAFile(NodeType::Directory))
        ));
        assert!(matches!(
            node.into_snapshot(),
            Err(TreeError::UnexpectedType {
                expected: NodeType::Snapshot,
                actual: NodeType::Directory
            })
        ));
    }

    #[test]
    fn undefined_id_is_not_read() {
        let objects = MemoryObjects::default();
        assert!(matches!(
            Node::deserialize_by_id(&ContentId::undefined(), &objects),
            Err(TreeError::UndefinedId)
        ));
        assert_eq!(objects.reads.get(), 0);
    }

    #[test]
    fn deserialize_by_id_reads_the_object() {
        let mut objects = MemoryObjects::default();
        let bytes = Node::from(SimpleFile::new(b"data".to_vec())).serialize().unwrap();
        let node_id = objects.write(&bytes).unwrap();
        let node = Node::deserialize_by_id(&node_id, &objects).unwrap();
        assert_eq!(node, Node::SimpleFile(SimpleFile::new(b"data".to_vec())));
    }
}
