//! Deterministic binary codec for Cairn.
//!
//! Every structure Cairn persists (tree nodes, root pointers, content IDs)
//! is written with this codec. The format carries no schema: the shape of
//! the Rust type drives both directions, and field order is wire order.
//!
//! # Encoding Rules
//!
//! - `u8` is written verbatim.
//! - `u32`/`i32` are 4 bytes, `u64`/`i64` are 8 bytes, big-endian.
//! - `String` and `Vec<u8>` are a 4-byte big-endian length, then raw bytes.
//! - `Vec<T>` is a 4-byte element count, then each element in order.
//! - Records (see [`record!`]) encode their persistent fields in
//!   declaration order; fields listed under `skip` are not persisted.
//! - `Box<T>` is transparent.
//!
//! Decoding stops exactly at the boundary implied by the encoded lengths.
//! [`from_bytes`] reports how much it consumed; [`from_bytes_exact`]
//! rejects trailing input.

pub mod decode;
pub mod encode;
pub mod error;

pub use decode::{Decode, Decoder};
pub use encode::{Encode, Encoder};
pub use error::{CodecError, CodecResult};

/// Encode a value into a fresh buffer.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let mut enc = Encoder::new();
    value.encode(&mut enc)?;
    Ok(enc.into_bytes())
}

/// Decode a value from the front of `data`.
///
/// Returns the value and the number of bytes it occupied. Any bytes after
/// that are left to the caller.
pub fn from_bytes<T: Decode>(data: &[u8]) -> CodecResult<(T, usize)> {
    let mut dec = Decoder::new(data);
    let value = T::decode(&mut dec)?;
    Ok((value, dec.position()))
}

/// Decode a value that must span all of `data`.
pub fn from_bytes_exact<T: Decode>(data: &[u8]) -> CodecResult<T> {
    let mut dec = Decoder::new(data);
    let value = T::decode(&mut dec)?;
    dec.finish()?;
    Ok(value)
}

/// Implement [`Encode`] and [`Decode`] for a struct by listing its fields.
///
/// Fields are written in the order listed. Fields named in the optional
/// `skip` block are non-persistent: they are never encoded and are filled
/// with `Default::default()` on decode.
///
/// ```
/// use cairn_codec::record;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Entry {
///     name: String,
///     size: i64,
///     cached: bool,
/// }
///
/// record!(Entry { name, size } skip { cached });
///
/// let entry = Entry { name: "a".into(), size: 3, cached: true };
/// let bytes = cairn_codec::to_bytes(&entry).unwrap();
/// let back: Entry = cairn_codec::from_bytes_exact(&bytes).unwrap();
/// assert_eq!(back.size, 3);
/// assert!(!back.cached);
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident),* $(,)? } $(skip { $($skipped:ident),* $(,)? })?) => {
        impl $crate::Encode for $ty {
            fn encode(&self, enc: &mut $crate::Encoder) -> $crate::CodecResult<()> {
                let _ = &enc;
                $( $crate::Encode::encode(&self.$field, enc)?; )*
                Ok(())
            }
        }

        impl $crate::Decode for $ty {
            fn decode(dec: &mut $crate::Decoder<'_>) -> $crate::CodecResult<Self> {
                let _ = &dec;
                // Struct expression fields evaluate in the order written,
                // which keeps decode order equal to wire order.
                Ok(Self {
                    $( $field: $crate::Decode::decode(dec)?, )*
                    $($( $skipped: ::core::default::Default::default(), )*)?
                })
            }
        }
    };
}
