//! Bit level reading and writing, least significant bit first.
use crate::{Code, LzwError};

/// Widest value that can be moved through the bit buffers in one call.
const MAX_WIDTH: u8 = 32;

/// A growable sink of bits.
///
/// Bits fill every byte starting at its least significant bit. Completed bytes move from the
/// bit buffer into `bytes`; the final, partial byte is only materialized by [`release`] and its
/// unused high bits are zero.
///
/// [`release`]: #method.release
pub(crate) struct BitWriter {
    /// Bytes that are complete.
    bytes: Vec<u8>,
    /// Factor by which the byte capacity is multiplied once it is exhausted.
    granularity: usize,
    /// The buffer bits.
    buffer: u64,
    /// The number of valid buffer bits.
    bits_in_buffer: u8,
    /// All bits written so far, padding not included.
    bits_written: u64,
}

/// A consumer of bits from a borrowed buffer.
///
/// Only the first `bit_count` bits are considered valid, the remainder of the last byte is
/// padding and is never returned.
pub(crate) struct BitReader<'a> {
    /// Bytes that have not been moved into the bit buffer yet.
    inp: &'a [u8],
    /// Valid bits remaining in `inp`.
    unread: u64,
    /// The buffer bits.
    bit_buffer: u64,
    /// The number of valid buffer bits.
    bits: u8,
}

impl BitWriter {
    /// Create a writer that can hold `bits` without reallocating.
    ///
    /// The capacity is rounded up to whole bytes, with at least one byte. A `granularity` below
    /// two is raised to two.
    pub(crate) fn with_capacity(bits: usize, granularity: usize) -> Result<Self, LzwError> {
        let bytes_wanted = bits.max(8).div_ceil(8);
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(bytes_wanted)
            .map_err(|_| LzwError::OutOfMemory)?;

        Ok(BitWriter {
            bytes,
            granularity: granularity.max(2),
            buffer: 0,
            bits_in_buffer: 0,
            bits_written: 0,
        })
    }

    #[cfg(test)]
    pub(crate) fn append_bit(&mut self, bit: bool) -> Result<(), LzwError> {
        self.append_bits(u64::from(bit), 1)
    }

    /// Append the `width` low order bits of `value`, least significant first.
    pub(crate) fn append_bits(&mut self, value: u64, width: u8) -> Result<(), LzwError> {
        debug_assert!(width <= MAX_WIDTH);
        let mask = (1u64 << width) - 1;
        self.buffer |= (value & mask) << self.bits_in_buffer;
        self.bits_in_buffer += width;
        self.bits_written += u64::from(width);

        while self.bits_in_buffer >= 8 {
            self.push_byte(self.buffer as u8)?;
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
        }

        Ok(())
    }

    /// The number of bytes needed to hold all bits written so far.
    pub(crate) fn byte_count(&self) -> usize {
        self.bytes.len() + usize::from(self.bits_in_buffer > 0)
    }

    /// The exact number of bits written so far.
    pub(crate) fn bit_count(&self) -> u64 {
        self.bits_written
    }

    /// Take the written bytes, leaving an empty writer behind.
    pub(crate) fn release(&mut self) -> Result<Vec<u8>, LzwError> {
        if self.bits_in_buffer > 0 {
            self.push_byte(self.buffer as u8)?;
        }

        self.buffer = 0;
        self.bits_in_buffer = 0;
        self.bits_written = 0;
        Ok(core::mem::take(&mut self.bytes))
    }

    fn push_byte(&mut self, byte: u8) -> Result<(), LzwError> {
        if self.bytes.len() == self.bytes.capacity() {
            let capacity = self.bytes.capacity();
            let additional = capacity
                .max(1)
                .saturating_mul(self.granularity - 1)
                .min(isize::MAX as usize - capacity);
            // An oversized step must not fail a write that needs a single byte.
            if self.bytes.try_reserve_exact(additional).is_err() {
                self.bytes
                    .try_reserve(1)
                    .map_err(|_| LzwError::OutOfMemory)?;
            }
        }

        self.bytes.push(byte);
        Ok(())
    }
}

impl<'a> BitReader<'a> {
    /// Read at most `bit_count` bits from `inp`.
    ///
    /// A count beyond the physical length of `inp` is clamped to it.
    pub(crate) fn new(inp: &'a [u8], bit_count: u64) -> Self {
        let unread = bit_count.min(inp.len() as u64 * 8);
        let needed = unread.div_ceil(8) as usize;
        BitReader {
            inp: &inp[..needed],
            unread,
            bit_buffer: 0,
            bits: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn read_bit(&mut self) -> Option<bool> {
        if self.is_end_of_stream() {
            return None;
        }

        Some(self.read_bits(1) == 1)
    }

    /// Read up to `width` bits.
    ///
    /// When the stream runs out early the bits collected so far are returned, in their low order
    /// positions.
    pub(crate) fn read_bits(&mut self, width: u8) -> u64 {
        debug_assert!(width <= MAX_WIDTH);
        if self.bits < width {
            self.refill_bits();
        }

        let take = width.min(self.bits);
        let value = self.bit_buffer & ((1u64 << take) - 1);
        self.bit_buffer >>= take;
        self.bits -= take;
        value
    }

    /// Read one full code, or nothing if fewer than `code_size` valid bits remain.
    pub(crate) fn read_code(&mut self, code_size: u8) -> Option<Code> {
        if self.remaining() < u64::from(code_size) {
            return None;
        }

        Some(self.read_bits(code_size) as Code)
    }

    pub(crate) fn remaining(&self) -> u64 {
        u64::from(self.bits) + self.unread
    }

    pub(crate) fn is_end_of_stream(&self) -> bool {
        self.remaining() == 0
    }

    fn refill_bits(&mut self) {
        while self.bits <= 56 && self.unread > 0 {
            let (&byte, tail) = match self.inp.split_first() {
                Some(split) => split,
                None => break,
            };

            self.inp = tail;
            let valid = self.unread.min(8) as u8;
            let byte = u64::from(byte) & ((1u64 << valid) - 1);
            self.bit_buffer |= byte << self.bits;
            self.bits += valid;
            self.unread -= u64::from(valid);
        }
    }
}
