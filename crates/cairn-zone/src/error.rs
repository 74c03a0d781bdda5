use cairn_codec::CodecError;
use cairn_crypto::CryptoError;
use cairn_store::StoreError;
use cairn_tree::{NodeType, TreeError};
use cairn_types::{ContentId, TypeError};

use crate::identity::IdentityError;

/// Errors from zone operations.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("persistence error: {0}")]
    Store(#[from] StoreError),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("invalid ID: {0}")]
    Type(#[from] TypeError),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    /// No object is stored under the ID.
    #[error("object not found: {0}")]
    NotFound(ContentId),

    /// The root pointer names a node that is not a snapshot.
    #[error("root {id} is not a snapshot ({actual})")]
    CorruptRoot { id: ContentId, actual: NodeType },

    /// Neither root pointer copy is usable and no snapshot object exists.
    #[error("no root pointer found from object store")]
    NoRootFound,

    /// None of the supplied keys unlocks the zone.
    #[error("no key to open zone '{0}'")]
    NoKeyForZone(String),

    /// An encoded root pointer does not fit in one copy slot.
    #[error("root pointer too large: {0} bytes")]
    RootPointerTooLarge(usize),
}

/// Result alias for zone operations.
pub type ZoneResult<T> = Result<T, ZoneError>;
