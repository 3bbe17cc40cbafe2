#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate carpathia;

use carpathia::{ByteSource, Receiver};

struct NullSource;

impl ByteSource for NullSource {
    fn request_byte(&mut self) {}
}

fuzz_target!(|data: &[u8]| {
    let mut rx = Receiver::new(NullSource);

    for &b in data {
        let _ = rx.receive_byte(b);
    }
    rx.aggregate();
    let _ = rx.position().location();
    let _ = rx.position().date_time();
    let _ = rx.position().altitude();
});
