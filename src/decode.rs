//! A module for all decoding needs.
use crate::bits::BitReader;
use crate::dict::Dictionary;
use crate::{alloc_filled, Code, LzwError, FIRST_CODE, MAX_ENTRIES, MIN_CODESIZE};

/// The longest sequence a single code can stand for.
const MAX_SEQUENCE: usize = MAX_ENTRIES - FIRST_CODE as usize + 1;

/// The LZW decoder.
///
/// Like the [`Encoder`], a decoder holds no state between calls. The dictionary is rebuilt from
/// the code stream on every call to [`decode`].
///
/// [`Encoder`]: ../encode/struct.Encoder.html
/// [`decode`]: #method.decode
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    _private: (),
}

/// The table reconstruction, fed one code at a time.
pub(crate) struct DecodeState {
    /// The table of decoded codes.
    table: Dictionary,
    /// Space to spell out the sequence of one code.
    buffer: Box<[u8]>,
    /// The previous code, `None` at the start and after each reset.
    last: Option<Code>,
    /// The number of codes seen.
    codes: usize,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder::default()
    }

    /// Decode the first `bits` bits of `inp`, producing at most `expected` bytes.
    ///
    /// Stops without error once `expected` bytes are written or once fewer bits remain than the
    /// current code size. A trailing partial code is ignored.
    pub fn decode(&self, inp: &[u8], bits: u32, expected: usize) -> Result<Vec<u8>, LzwError> {
        let mut reader = BitReader::new(inp, u64::from(bits));

        // The stream cannot produce more than this, however large `expected` is.
        let codes = reader.remaining() / u64::from(MIN_CODESIZE);
        let producible = usize::try_from(codes)
            .unwrap_or(usize::MAX)
            .saturating_mul(MAX_SEQUENCE);
        let mut out = Vec::new();
        out.try_reserve_exact(expected.min(producible))
            .map_err(|_| LzwError::OutOfMemory)?;

        let mut state = DecodeState::new()?;

        while !reader.is_end_of_stream() && out.len() < expected {
            let code = match reader.read_code(state.code_size()) {
                Some(code) => code,
                None => break,
            };

            state.push_code(code, &mut out, expected)?;
        }

        if out.len() < expected {
            log::debug!(
                "code stream exhausted after {} of {} bytes",
                out.len(),
                expected
            );
        }

        log::debug!(
            "decoded {} codes into {} bytes, {} resets, {} bits unread",
            state.codes,
            out.len(),
            state.table.resets(),
            reader.remaining(),
        );

        Ok(out)
    }
}

impl DecodeState {
    pub(crate) fn new() -> Result<Self, LzwError> {
        Ok(DecodeState {
            table: Dictionary::new()?,
            buffer: alloc_filled(MAX_ENTRIES, 0)?,
            last: None,
            codes: 0,
        })
    }

    /// The width of the next code.
    pub(crate) fn code_size(&self) -> u8 {
        self.table.code_size()
    }

    /// Expand `code`, appending to `out` but never beyond `limit` bytes in total.
    pub(crate) fn push_code(
        &mut self,
        code: Code,
        out: &mut Vec<u8>,
        limit: usize,
    ) -> Result<(), LzwError> {
        self.codes += 1;

        let prev = match self.last {
            Some(prev) => prev,
            None => {
                // No last state? This is the first code after a reset, it must be a byte.
                if code >= FIRST_CODE {
                    return Err(LzwError::InvalidCode {
                        code,
                        next: FIRST_CODE,
                    });
                }

                write_limited(out, &[code as u8], limit);
                self.last = Some(code);
                return Ok(());
            }
        };

        let next = self.table.next_code();
        let first = if code < next {
            let sequence = self.table.reconstruct(code, &mut self.buffer);
            write_limited(out, sequence, limit);
            sequence[0]
        } else if code == next {
            // The encoder used the entry it created for the previous code right away. That entry
            // is the previous sequence followed by its own first byte.
            let sequence = self.table.reconstruct(prev, &mut self.buffer);
            let first = sequence[0];
            write_limited(out, sequence, limit);
            write_limited(out, &[first], limit);
            first
        } else {
            return Err(LzwError::InvalidCode { code, next });
        };

        let added = self.table.add(prev, first);
        debug_assert!(added, "dictionary is reset before reaching capacity");

        self.last = if self.table.grow_code_size() {
            None
        } else {
            Some(code)
        };

        Ok(())
    }
}

fn write_limited(out: &mut Vec<u8>, bytes: &[u8], limit: usize) {
    let room = limit.saturating_sub(out.len());
    out.extend_from_slice(&bytes[..bytes.len().min(room)]);
}
