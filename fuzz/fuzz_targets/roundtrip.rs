#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let encoded = tvlzw::lzw_encode(data).expect("encoding never fails for small inputs");
    let decoded = tvlzw::lzw_decode(
        &encoded.data,
        encoded.data.len() as u32,
        encoded.bits,
        data.len() as u32,
    );
    assert_eq!(decoded.as_deref(), Ok(data));
});
