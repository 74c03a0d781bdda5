//! Tree object model for Cairn.
//!
//! A backup is a tree of immutable nodes stored as zone objects:
//!
//! - [`SimpleFile`]: file content inlined in the node
//! - [`ChunkedFile`]: larger files as a list of separately stored chunks
//! - [`Directory`]: named entries with mode, modification time and child ID
//! - [`Snapshot`]: a root tree plus a link to the previous snapshot
//!
//! Nodes are built bottom-up: chunks, then files, then directories, then the
//! snapshot. Each serialized node is handed to an [`ObjectWriter`], which
//! returns the ID the parent records.

pub mod chunker;
pub mod directory;
pub mod error;
pub mod file;
pub mod history;
pub mod io;
pub mod listing;
pub mod node;
pub mod snapshot;
pub mod types;

pub use chunker::{write_bytes, write_file, write_file_with, CHUNK_SIZE};
pub use directory::{Directory, DirectoryEntry};
pub use error::{TreeError, TreeResult};
pub use file::{Chunk, ChunkedFile, File, SimpleFile};
pub use history::list_snapshots;
pub use io::{NullWriter, ObjectReader, ObjectWriter};
pub use listing::{render_tree, render_tree_at};
pub use node::Node;
pub use snapshot::Snapshot;
pub use types::{FileMode, FileSize, NodeType, NODE_VERSION};
