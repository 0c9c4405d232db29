//! The prefix table shared by encoder and decoder.
use crate::{alloc_filled, Code, LzwError, FIRST_CODE, MAX_CODESIZE, MAX_ENTRIES, MIN_CODESIZE};

/// Prefix of the single byte roots.
const NO_PREFIX: Code = Code::MAX;
/// An unused slot of the lookup index.
const EMPTY: Code = Code::MAX;
/// Slots of the lookup index. A power of two, at least twice the number of entries.
const SLOTS: usize = 2 * MAX_ENTRIES;

/// One dictionary entry: the sequence of `prefix` followed by `byte`.
#[derive(Clone, Copy)]
struct Link {
    prefix: Code,
    byte: u8,
}

/// A bounded table of prefix chains.
///
/// Codes below 256 are the single byte roots and never change. Every further code is appended in
/// order and refers to an earlier code as its prefix, so the code assigned to a sequence only
/// depends on the order in which entries are added. The lookup index is a hash over
/// `(prefix, byte)` and does not influence code assignment.
pub(crate) struct Dictionary {
    links: Box<[Link]>,
    /// The length of the sequence of each code.
    depths: Box<[u16]>,
    /// Open addressing index from `(prefix, byte)` to the code of that entry.
    slots: Box<[Code]>,
    /// Number of populated entries, roots included.
    len: usize,
    /// The width of the next code in the stream.
    code_size: u8,
    /// How often the table filled up and was cleared.
    resets: usize,
}

impl Dictionary {
    pub(crate) fn new() -> Result<Self, LzwError> {
        let mut dict = Dictionary {
            links: alloc_filled(MAX_ENTRIES, Link::root(0))?,
            depths: alloc_filled(MAX_ENTRIES, 0)?,
            slots: alloc_filled(SLOTS, EMPTY)?,
            len: 0,
            code_size: MIN_CODESIZE,
            resets: 0,
        };
        dict.reset();
        Ok(dict)
    }

    /// Drop all entries but the roots and go back to the minimum code size.
    pub(crate) fn reset(&mut self) {
        for byte in 0..=u8::MAX {
            self.links[usize::from(byte)] = Link::root(byte);
            self.depths[usize::from(byte)] = 1;
        }

        for slot in self.slots.iter_mut() {
            *slot = EMPTY;
        }

        self.len = usize::from(FIRST_CODE);
        self.code_size = MIN_CODESIZE;
    }

    /// The number of populated entries.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// The code the next added entry will get.
    pub(crate) fn next_code(&self) -> Code {
        self.len as Code
    }

    pub(crate) fn code_size(&self) -> u8 {
        self.code_size
    }

    pub(crate) fn resets(&self) -> usize {
        self.resets
    }

    /// Find the code for the sequence of `prefix` followed by `byte`.
    pub(crate) fn find(&self, prefix: Code, byte: u8) -> Option<Code> {
        let mut slot = Self::hash(prefix, byte);
        loop {
            let code = self.slots[slot];
            if code == EMPTY {
                return None;
            }

            let link = self.links[usize::from(code)];
            if link.prefix == prefix && link.byte == byte {
                return Some(code);
            }

            slot = (slot + 1) & (SLOTS - 1);
        }
    }

    /// Append the sequence of `prefix` followed by `byte` as the next code.
    ///
    /// Returns `false` without changing anything when the table is at capacity. The caller must
    /// pass a `prefix` below [`next_code`].
    ///
    /// [`next_code`]: #method.next_code
    pub(crate) fn add(&mut self, prefix: Code, byte: u8) -> bool {
        if self.len == MAX_ENTRIES {
            return false;
        }

        debug_assert!(usize::from(prefix) < self.len);
        let code = self.next_code();
        self.links[self.len] = Link { prefix, byte };
        self.depths[self.len] = self.depths[usize::from(prefix)] + 1;

        let mut slot = Self::hash(prefix, byte);
        while self.slots[slot] != EMPTY {
            slot = (slot + 1) & (SLOTS - 1);
        }
        self.slots[slot] = code;

        self.len += 1;
        true
    }

    /// Widen codes once the table reaches the next power of two.
    ///
    /// A table that would need codes wider than `MAX_CODESIZE` is cleared instead. Returns `true`
    /// in that case, which starts a new epoch for both sides of the stream.
    pub(crate) fn grow_code_size(&mut self) -> bool {
        if self.len != 1 << self.code_size {
            return false;
        }

        self.code_size += 1;
        if self.code_size > MAX_CODESIZE {
            self.reset();
            self.resets += 1;
            log::trace!("dictionary full, starting epoch {}", self.resets);
            return true;
        }

        log::trace!("code size now {} bits at {} entries", self.code_size, self.len);
        false
    }

    /// Write the sequence for `code` into `buffer`, returning the written part.
    ///
    /// The first byte of the returned slice is the first byte of the sequence.
    pub(crate) fn reconstruct<'b>(&self, code: Code, buffer: &'b mut [u8]) -> &'b [u8] {
        let depth = usize::from(self.depths[usize::from(code)]);
        let out = &mut buffer[..depth];
        let mut code = code;
        for byte in out.iter_mut().rev() {
            let link = self.links[usize::from(code)];
            *byte = link.byte;
            code = link.prefix;
        }
        out
    }

    fn hash(prefix: Code, byte: u8) -> usize {
        let key = (u32::from(prefix) << 8) | u32::from(byte);
        // Fibonacci hashing, keep the top bits.
        (key.wrapping_mul(0x9e37_79b9) >> (32 - SLOTS.trailing_zeros())) as usize
    }
}

impl Link {
    fn root(byte: u8) -> Self {
        Link { prefix: NO_PREFIX, byte }
    }
}
