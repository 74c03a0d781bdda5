//! Identities that can unlock a zone.
//!
//! A zone stores its secret once per identity, encrypted to that identity's
//! public key under `{zone}/identities/{key id}`. Opening a zone needs the
//! matching private key. Key algorithms live outside this crate.

/// Opaque failure from an identity key implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct IdentityError(pub String);

impl IdentityError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub trait PublicKey: Send + Sync {
    /// Stable identifier, used as the storage key of the wrapped secret.
    fn id(&self) -> String;

    fn encrypt(&self, msg: &[u8]) -> Result<Vec<u8>, IdentityError>;
}

pub trait PrivateKey: Send + Sync {
    fn id(&self) -> String;

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, IdentityError>;

    fn public_key(&self) -> Box<dyn PublicKey>;
}
