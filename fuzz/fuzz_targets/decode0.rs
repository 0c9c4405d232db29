#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw_data: &[u8]| {
    let bits = raw_data.len().saturating_mul(8).min(u32::MAX as usize) as u32;
    let _ = tvlzw::lzw_decode(raw_data, raw_data.len() as u32, bits, 1 << 20);
    let _ = tvlzw::base64::decode(raw_data);
});
