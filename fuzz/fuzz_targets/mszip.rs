#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // decompress() must never panic on arbitrary bytes, whether or not they
    // happen to be a valid container.
    let _ = mszip::decompress(data);
});
