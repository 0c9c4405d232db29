//! # Headerless LZW encoder and decoder
//!
//! This crate provides a byte oriented LZW codec whose stream carries nothing but codes. There is
//! no header, no clear code and no end code. Codes are packed least significant bit first and
//! start out 9 bits wide, growing by one bit each time the dictionary reaches the next power of
//! two. When the dictionary would need 13 bit codes it is cleared back to the 256 single byte
//! roots and the width drops back to 9 bits.
//!
//! Since the stream does not mark its own end, the embedding container has to carry two facts
//! alongside it: the exact number of valid bits and the length of the decompressed data. Both are
//! handed back to [`lzw_decode`].
//!
//! Exemplary round trip:
//!
//! ```
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//! let encoded = tvlzw::lzw_encode(data).unwrap();
//! assert_eq!(encoded.bits, 16 * 9);
//!
//! let decoded = tvlzw::lzw_decode(
//!     &encoded.data,
//!     encoded.data.len() as u32,
//!     encoded.bits,
//!     data.len() as u32,
//! ).unwrap();
//! assert_eq!(&decoded[..], &data[..]);
//! ```
pub(crate) const MAX_CODESIZE: u8 = 12;
pub(crate) const MIN_CODESIZE: u8 = 9;
pub(crate) const MAX_ENTRIES: usize = 1 << MAX_CODESIZE as usize;
/// The first code that is not a single byte root.
pub(crate) const FIRST_CODE: Code = 1 << (MIN_CODESIZE - 1);

/// Alias for a LZW code point
pub(crate) type Code = u16;

pub mod base64;
mod bits;
pub mod decode;
mod dict;
pub mod encode;

pub use crate::encode::Encoded;

/// The ways in which en- or decoding can fail.
///
/// Running out of input or out of output space is not an error. A decoder that stops early simply
/// returns fewer bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LzwError {
    /// The stream referenced a code the dictionary does not have yet.
    ///
    /// `next` is the code the decoder would have assigned next. Right after the start and after
    /// each dictionary reset only single byte codes are valid, `next` is then `256`.
    #[error("invalid code {code} in stream, next free code is {next}")]
    InvalidCode { code: u16, next: u16 },
    /// Allocating the dictionary, the output or the bit buffer failed.
    #[error("out of memory")]
    OutOfMemory,
    /// The compressed stream would have more bits than fit into a `u32`.
    #[error("compressed stream exceeds u32::MAX bits")]
    TooLarge,
}

/// Compress `input` into a packed code stream.
///
/// Returns the packed bytes together with the exact number of valid bits. The last byte is padded
/// with zero bits.
pub fn lzw_encode(input: &[u8]) -> Result<Encoded, LzwError> {
    encode::Encoder::new().encode(input)
}

/// Expand a packed code stream.
///
/// Only the first `compressed_bytes` bytes of `compressed` and, within those, only the first
/// `compressed_bits` bits are read. Decoding stops as soon as `expected_output_bytes` have been
/// produced, or when the bits run out, whichever is first. A result shorter than
/// `expected_output_bytes` therefore means the input was incomplete.
pub fn lzw_decode(
    compressed: &[u8],
    compressed_bytes: u32,
    compressed_bits: u32,
    expected_output_bytes: u32,
) -> Result<Vec<u8>, LzwError> {
    let len = usize::try_from(compressed_bytes).unwrap_or(usize::MAX);
    let data = compressed.get(..len).unwrap_or(compressed);
    let expected = usize::try_from(expected_output_bytes).unwrap_or(usize::MAX);
    decode::Decoder::new().decode(data, compressed_bits, expected)
}

/// Get a filled, fixed length allocation or report the failure.
pub(crate) fn alloc_filled<T: Clone>(len: usize, value: T) -> Result<Box<[T]>, LzwError> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len).map_err(|_| LzwError::OutOfMemory)?;
    vec.resize(len, value);
    Ok(vec.into_boxed_slice())
}
