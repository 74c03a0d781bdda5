use thiserror::Error;

/// Errors from zone key handling and object encryption.
///
/// Every variant is fatal for the object at hand: callers never receive
/// partially decrypted data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The zone secret does not match the suite's key length.
    #[error("invalid zone key length: {actual} vs {expected}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The blob cannot be an encrypted object (too short or not block aligned).
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// The MAC did not verify.
    #[error("integrity check failed")]
    IntegrityError,

    /// The pad length byte is larger than the decrypted data.
    #[error("invalid padding length {pad_len} for {len} bytes")]
    InvalidPadding { pad_len: usize, len: usize },

    /// Nothing was left after removing the padding.
    #[error("truncated data")]
    TruncatedData,

    /// The payload flag byte is neither raw nor compressed.
    #[error("invalid compression flag: {0}")]
    InvalidCompressionFlag(u8),

    /// The compressed payload could not be inflated.
    #[error("decompression failed: {0}")]
    DecompressionError(String),

    /// The payload could not be deflated.
    #[error("compression failed: {0}")]
    CompressionError(String),

    /// The system random source failed.
    #[error("random source failed: {0}")]
    Random(String),
}

/// Result alias for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
