use crate::error::{CodecError, CodecResult};

/// Cursor over an encoded byte slice.
///
/// The decoder never reads past the lengths implied by the encoding, so
/// [`position`](Decoder::position) after a decode is the exact size of the
/// decoded value.
#[derive(Clone, Debug)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(CodecError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.take(N)?);
        Ok(arr)
    }

    pub fn get_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn get_u32(&mut self) -> CodecResult<u32> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn get_u64(&mut self) -> CodecResult<u64> {
        Ok(u64::from_be_bytes(self.take_array()?))
    }

    /// Read a 4-byte big-endian length prefix.
    pub fn get_len(&mut self) -> CodecResult<usize> {
        Ok(self.get_u32()? as usize)
    }

    /// Read a length-prefixed byte sequence.
    pub fn get_bytes(&mut self) -> CodecResult<Vec<u8>> {
        let len = self.get_len()?;
        Ok(self.take(len)?.to_vec())
    }

    /// Fail unless every input byte has been consumed.
    pub fn finish(&self) -> CodecResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes {
                consumed: self.pos,
                total: self.data.len(),
            })
        }
    }
}

/// A value that can be rebuilt from its binary representation.
pub trait Decode: Sized {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self>;

    /// Decode `count` consecutive elements. The length prefix has already
    /// been consumed by the caller.
    fn decode_seq(dec: &mut Decoder<'_>, count: usize) -> CodecResult<Vec<Self>> {
        // Each element takes at least one byte; never trust the prefix for
        // more capacity than the input can hold.
        let mut out = Vec::with_capacity(count.min(dec.remaining()));
        for _ in 0..count {
            out.push(Self::decode(dec)?);
        }
        Ok(out)
    }
}

impl Decode for u8 {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        dec.get_u8()
    }

    fn decode_seq(dec: &mut Decoder<'_>, count: usize) -> CodecResult<Vec<Self>> {
        Ok(dec.take(count)?.to_vec())
    }
}

impl Decode for u32 {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        dec.get_u32()
    }
}

impl Decode for i32 {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        Ok(dec.get_u32()? as i32)
    }
}

impl Decode for u64 {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        dec.get_u64()
    }
}

impl Decode for i64 {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        Ok(dec.get_u64()? as i64)
    }
}

impl Decode for String {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        let bytes = dec.get_bytes()?;
        String::from_utf8(bytes).map_err(|e| CodecError::InvalidUtf8(e.to_string()))
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        let count = dec.get_len()?;
        T::decode_seq(dec, count)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(dec: &mut Decoder<'_>) -> CodecResult<Self> {
        Ok(Box::new(T::decode(dec)?))
    }
}
