use crate::error::{CodecError, CodecResult};

/// Append-only output buffer for encoded values.
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Create an empty encoder.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Write a 4-byte big-endian length prefix.
    pub fn put_len(&mut self, len: usize) -> CodecResult<()> {
        let len = u32::try_from(len)
            .map_err(|_| CodecError::Unsupported(format!("length {len} exceeds u32")))?;
        self.put_u32(len);
        Ok(())
    }

    /// Write a length-prefixed byte sequence.
    pub fn put_bytes(&mut self, data: &[u8]) -> CodecResult<()> {
        self.put_len(data.len())?;
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// A value with a fixed binary representation.
///
/// Composite values encode their parts in declaration order, which is also
/// the wire order. See [`record!`](crate::record) for structs.
pub trait Encode {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()>;

    /// Encode a sequence of values as a length prefix followed by each
    /// element. Byte elements override this to write one flat buffer.
    fn encode_seq(items: &[Self], enc: &mut Encoder) -> CodecResult<()>
    where
        Self: Sized,
    {
        enc.put_len(items.len())?;
        for item in items {
            item.encode(enc)?;
        }
        Ok(())
    }
}

impl Encode for u8 {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        enc.put_u8(*self);
        Ok(())
    }

    fn encode_seq(items: &[Self], enc: &mut Encoder) -> CodecResult<()> {
        enc.put_bytes(items)
    }
}

impl Encode for u32 {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        enc.put_u32(*self);
        Ok(())
    }
}

impl Encode for i32 {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        enc.put_u32(*self as u32);
        Ok(())
    }
}

impl Encode for u64 {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        enc.put_u64(*self);
        Ok(())
    }
}

impl Encode for i64 {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        enc.put_u64(*self as u64);
        Ok(())
    }
}

impl Encode for str {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        enc.put_bytes(self.as_bytes())
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        self.as_str().encode(enc)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        T::encode_seq(self, enc)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        T::encode_seq(self, enc)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        (**self).encode(enc)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, enc: &mut Encoder) -> CodecResult<()> {
        (**self).encode(enc)
    }
}
