//! A module for all encoding needs.
use crate::bits::BitWriter;
use crate::dict::Dictionary;
use crate::{Code, LzwError};

/// Initial size of the output buffer, 1 KiB.
const DEFAULT_CAPACITY_BITS: usize = 8192;

/// The LZW encoder.
///
/// The encoder itself only carries the configuration of its output buffer. Every call to
/// [`encode`] starts from a fresh dictionary, so one encoder can be reused for any number of
/// independent buffers.
///
/// [`encode`]: #method.encode
#[derive(Clone, Debug)]
pub struct Encoder {
    capacity_bits: usize,
    growth: usize,
}

/// A compressed buffer and its exact length in bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoded {
    /// The packed codes. Bits beyond `bits` in the last byte are zero.
    pub data: Vec<u8>,
    /// The number of valid bits in `data`.
    pub bits: u32,
}

/// A consumer of the code stream.
pub(crate) trait CodeSink {
    /// Insert a code of `code_size` bits.
    fn buffer_code(&mut self, code: Code, code_size: u8) -> Result<(), LzwError>;
}

/// Counters of one encoding run.
pub(crate) struct Summary {
    pub(crate) codes: usize,
    pub(crate) resets: usize,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder {
            capacity_bits: DEFAULT_CAPACITY_BITS,
            growth: 2,
        }
    }

    /// Reserve room for `bits` of output up front.
    ///
    /// This is only a hint, the output grows as needed. At least one byte is always reserved.
    pub fn with_capacity_bits(self, bits: usize) -> Self {
        Encoder {
            capacity_bits: bits,
            ..self
        }
    }

    /// Multiply the output capacity by `granularity` whenever it runs out.
    ///
    /// Values below two are treated as two.
    pub fn with_growth(self, granularity: usize) -> Self {
        Encoder {
            growth: granularity.max(2),
            ..self
        }
    }

    /// Compress all of `inp`.
    pub fn encode(&self, inp: &[u8]) -> Result<Encoded, LzwError> {
        let mut writer = BitWriter::with_capacity(self.capacity_bits, self.growth)?;
        let summary = encode_codes(inp, &mut writer)?;
        let bits = u32::try_from(writer.bit_count()).map_err(|_| LzwError::TooLarge)?;
        debug_assert_eq!(writer.byte_count(), bits.div_ceil(8) as usize);
        let data = writer.release()?;

        log::debug!(
            "encoded {} bytes into {} codes, {} bits, {} resets",
            inp.len(),
            summary.codes,
            bits,
            summary.resets,
        );

        Ok(Encoded { data, bits })
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

impl CodeSink for BitWriter {
    fn buffer_code(&mut self, code: Code, code_size: u8) -> Result<(), LzwError> {
        self.append_bits(u64::from(code), code_size)
    }
}

/// Run the greedy longest match over `inp`, putting every code into `sink`.
pub(crate) fn encode_codes<S: CodeSink>(inp: &[u8], sink: &mut S) -> Result<Summary, LzwError> {
    let mut summary = Summary {
        codes: 0,
        resets: 0,
    };

    let (&first, rest) = match inp.split_first() {
        Some(split) => split,
        None => return Ok(summary),
    };

    let mut tree = Dictionary::new()?;
    // The code corresponding to the currently read characters.
    let mut current_code = Code::from(first);

    for &byte in rest {
        if let Some(code) = tree.find(current_code, byte) {
            current_code = code;
            continue;
        }

        sink.buffer_code(current_code, tree.code_size())?;
        summary.codes += 1;

        // A reset drops the entry this code would have created.
        if !tree.grow_code_size() {
            let added = tree.add(current_code, byte);
            debug_assert!(added, "dictionary is reset before reaching capacity");
        }

        current_code = Code::from(byte);
    }

    sink.buffer_code(current_code, tree.code_size())?;
    summary.codes += 1;
    summary.resets = tree.resets();
    Ok(summary)
}
