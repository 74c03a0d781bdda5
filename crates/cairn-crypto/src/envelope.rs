//! Authenticated object encryption.
//!
//! On-disk format of every object:
//!
//! ```text
//! [16 bytes: IV]
//! [N bytes:  AES-256-CBC(payload || padding)]
//! [32 bytes: HMAC-SHA256(IV || ciphertext)]
//! ```
//!
//! where `payload = flag || data`, `flag` is `1` for zlib-compressed data
//! and `0` for raw data. Padding is `0, 1, .., pad_len-2, pad_len`; only the
//! final byte is meaningful on decode.

use std::io::{Read, Write};

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, InnerIvInit};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use hmac::Mac;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use crate::error::{CryptoError, CryptoResult};
use crate::keys::ZoneKeys;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Payload flag: data stored as-is.
pub const FLAG_RAW: u8 = 0;
/// Payload flag: data stored zlib-compressed.
pub const FLAG_COMPRESSED: u8 = 1;

/// An encrypted object plus the accounting of how it was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sealed {
    /// `IV || ciphertext || MAC`.
    pub data: Vec<u8>,
    /// Whether the payload was stored compressed.
    pub compressed: bool,
    /// Bytes saved by compression (0 when stored raw).
    pub saved: u64,
}

/// Number of padding bytes for a payload of `len` bytes: always
/// `1..=block_size`.
pub fn pad_len(len: usize, block_size: usize) -> usize {
    block_size - (len % block_size)
}

/// Append padding in the on-disk layout.
fn push_padding(buf: &mut Vec<u8>, pad_len: usize) {
    for i in 0..pad_len - 1 {
        buf.push(i as u8);
    }
    buf.push(pad_len as u8);
}

fn compress(data: &[u8]) -> CryptoResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| CryptoError::CompressionError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| CryptoError::CompressionError(e.to_string()))
}

fn decompress(data: &[u8]) -> CryptoResult<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| CryptoError::DecompressionError(e.to_string()))?;
    Ok(out)
}

impl ZoneKeys {
    /// Compress (when it helps), pad, encrypt and authenticate `plaintext`.
    pub fn seal(&self, plaintext: &[u8]) -> CryptoResult<Sealed> {
        let compressed = compress(plaintext)?;
        let (flag, body, saved) = if compressed.len() < plaintext.len() {
            let saved = (plaintext.len() - compressed.len()) as u64;
            (FLAG_COMPRESSED, compressed.as_slice(), saved)
        } else {
            (FLAG_RAW, plaintext, 0)
        };

        let block_size = self.block_size();
        let payload_len = 1 + body.len();
        let pad_len = pad_len(payload_len, block_size);

        let mut out = Vec::with_capacity(block_size + payload_len + pad_len + self.mac_size());
        out.resize(block_size, 0);
        OsRng
            .try_fill_bytes(&mut out[..block_size])
            .map_err(|e| CryptoError::Random(e.to_string()))?;
        out.push(flag);
        out.extend_from_slice(body);
        push_padding(&mut out, pad_len);

        let (iv, to_encrypt) = out.split_at_mut(block_size);
        let encryptor = Aes256CbcEnc::inner_iv_slice_init(self.cipher.clone(), iv)
            .map_err(|_| CryptoError::MalformedCiphertext("invalid IV length".into()))?;
        let msg_len = to_encrypt.len();
        encryptor
            .encrypt_padded_mut::<NoPadding>(to_encrypt, msg_len)
            .map_err(|_| CryptoError::MalformedCiphertext("payload not block aligned".into()))?;

        let mut mac = self.mac.clone();
        mac.update(&out);
        out.extend_from_slice(&mac.finalize().into_bytes());

        Ok(Sealed {
            data: out,
            compressed: flag == FLAG_COMPRESSED,
            saved,
        })
    }

    /// Authenticate, decrypt, unpad and inflate an object blob.
    pub fn open(&self, data: &[u8]) -> CryptoResult<Vec<u8>> {
        let block_size = self.block_size();
        let mac_len = self.mac_size();
        // Padding is never empty, so even an empty payload fills a block.
        if data.len() <= block_size + mac_len {
            return Err(CryptoError::MalformedCiphertext(format!(
                "encrypted data too short: {} bytes",
                data.len()
            )));
        }
        if (data.len() - mac_len) % block_size != 0 {
            return Err(CryptoError::MalformedCiphertext(format!(
                "encrypted data not block aligned: {} bytes",
                data.len()
            )));
        }

        let (encrypted, tag) = data.split_at(data.len() - mac_len);
        let mut mac = self.mac.clone();
        mac.update(encrypted);
        if mac.verify_slice(tag).is_err() {
            debug!(len = data.len(), "object MAC mismatch");
            return Err(CryptoError::IntegrityError);
        }

        let (iv, ciphertext) = encrypted.split_at(block_size);
        let mut buf = ciphertext.to_vec();
        let decryptor = Aes256CbcDec::inner_iv_slice_init(self.cipher.clone(), iv)
            .map_err(|_| CryptoError::MalformedCiphertext("invalid IV length".into()))?;
        let decrypted = decryptor
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|_| CryptoError::MalformedCiphertext("ciphertext not block aligned".into()))?;

        let pad_len = decrypted[decrypted.len() - 1] as usize;
        if pad_len > decrypted.len() {
            return Err(CryptoError::InvalidPadding {
                pad_len,
                len: decrypted.len(),
            });
        }
        let payload = &decrypted[..decrypted.len() - pad_len];
        let (&flag, body) = payload.split_first().ok_or(CryptoError::TruncatedData)?;

        match flag {
            FLAG_RAW => Ok(body.to_vec()),
            FLAG_COMPRESSED => decompress(body),
            other => Err(CryptoError::InvalidCompressionFlag(other)),
        }
    }
}
