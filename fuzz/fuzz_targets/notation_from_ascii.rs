#![no_main]

use libfuzzer_sys::fuzz_target;
use pgn_parser::san::Notation;

fuzz_target!(|data: &[u8]| {
    let Ok(notation) = Notation::from_ascii(data) else {
        return;
    };
    let roundtripped = Notation::from_ascii(notation.to_string().as_bytes()).expect("roundtrip");
    assert_eq!(notation, roundtripped);
});
