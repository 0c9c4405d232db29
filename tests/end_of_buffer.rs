//! Decoding stops at whichever runs out first, the output space or the valid input bits.
use tvlzw::{lzw_decode, lzw_encode, LzwError};

fn sample() -> Vec<u8> {
    let mut data = vec![];
    for i in 0..2000u32 {
        data.extend_from_slice(b"TOBEORNOT");
        data.extend_from_slice(&i.to_le_bytes());
        data.extend(core::iter::repeat(b'z').take((i % 40) as usize));
    }
    data
}

#[test]
fn output_capacity_truncates() {
    let data = sample();
    let encoded = lzw_encode(&data).unwrap();
    let bytes = encoded.data.len() as u32;

    for &limit in &[0, 1, 2, 9, 10, 100, 4095, 4096, 10_000, data.len() - 1] {
        let decoded = lzw_decode(&encoded.data, bytes, encoded.bits, limit as u32).unwrap();
        assert_eq!(decoded.len(), limit);
        assert_eq!(&decoded[..], &data[..limit], "limit {}", limit);
    }
}

#[test]
fn output_capacity_cuts_into_long_code() {
    // Bytes 37 to 45 come from one nine byte code, the code after it spans ten bytes.
    let data = vec![7u8; 1000];
    let encoded = lzw_encode(&data).unwrap();
    for limit in 44..=47 {
        let decoded = lzw_decode(
            &encoded.data,
            encoded.data.len() as u32,
            encoded.bits,
            limit,
        )
        .unwrap();
        assert_eq!(decoded, vec![7u8; limit as usize]);
    }
}

#[test]
fn larger_capacity_is_not_filled() {
    let data = b"TOBEORNOTTOBEORTOBEORNOT";
    let encoded = lzw_encode(data).unwrap();
    let decoded = lzw_decode(&encoded.data, encoded.data.len() as u32, encoded.bits, 1000).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn oversized_capacity_on_small_stream() {
    assert!(lzw_decode(&[], 0, 0, u32::MAX).unwrap().is_empty());

    let data = b"TOBEORNOTTOBEORTOBEORNOT";
    let encoded = lzw_encode(data).unwrap();
    let decoded =
        lzw_decode(&encoded.data, encoded.data.len() as u32, encoded.bits, u32::MAX).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn input_bits_truncate() {
    let data = sample();
    let encoded = lzw_encode(&data).unwrap();
    let bytes = encoded.data.len() as u32;
    let expected = data.len() as u32;

    let mut previous = 0;
    // Whole codes, and cuts in the middle of a code.
    for &cut in &[9, 14, 18, 1000, 1001, 1007, 20_003] {
        let bits = encoded.bits - cut;
        let decoded = lzw_decode(&encoded.data, bytes, bits, expected).unwrap();
        assert!(decoded.len() < data.len());
        assert_eq!(&decoded[..], &data[..decoded.len()], "cut {}", cut);
        if previous != 0 {
            assert!(decoded.len() <= previous);
        }
        previous = decoded.len();
    }

    assert!(lzw_decode(&encoded.data, bytes, 8, expected).unwrap().is_empty());
    assert!(lzw_decode(&encoded.data, bytes, 0, expected).unwrap().is_empty());
}

#[test]
fn input_bytes_truncate() {
    let data = sample();
    let encoded = lzw_encode(&data).unwrap();
    let half = encoded.data.len() / 2;

    // The bit count claims more than the bytes provide.
    let decoded = lzw_decode(&encoded.data, half as u32, encoded.bits, data.len() as u32).unwrap();
    assert!(decoded.len() < data.len());
    assert_eq!(&decoded[..], &data[..decoded.len()]);

    let sliced = lzw_decode(&encoded.data[..half], u32::MAX, encoded.bits, data.len() as u32).unwrap();
    assert_eq!(sliced, decoded);
}

#[test]
fn never_reads_past_bit_count() {
    let data = b"TOBEORNOTTOBEORTOBEORNOT";
    let encoded = lzw_encode(data).unwrap();

    // Whatever follows the valid bits is ignored.
    let mut padded = encoded.data.clone();
    padded.extend_from_slice(&[0xff; 16]);
    let decoded = lzw_decode(&padded, padded.len() as u32, encoded.bits, 1000).unwrap();
    assert_eq!(decoded, data);

    // The same holds for the padding bits inside the final byte.
    let single = lzw_encode(b"Z").unwrap();
    let mut dirty = single.data.clone();
    *dirty.last_mut().unwrap() |= 0xfe;
    let decoded = lzw_decode(&dirty, dirty.len() as u32, single.bits, 100).unwrap();
    assert_eq!(decoded, b"Z");
}

#[test]
fn corrupt_code_is_reported() {
    let data = b"TOBEORNOTTOBEORTOBEORNOT";
    let mut encoded = lzw_encode(data).unwrap();
    // The tenth code, 256, becomes 511 which the decoder cannot know of yet.
    encoded.data[10] |= 0xfe;
    encoded.data[11] |= 0x01;
    let err = lzw_decode(&encoded.data, 18, encoded.bits, data.len() as u32).unwrap_err();
    assert_eq!(err, LzwError::InvalidCode { code: 511, next: 264 });
}
