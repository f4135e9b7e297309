// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use poke_stream::{MessageId, Stream};

fuzz_target!(|data: &[u8]| {
    let mut stream = Stream::<256>::new();
    if stream.load(data).is_err() {
        return;
    }

    // Decode a call header followed by a greeting-shaped payload
    let mut reader = stream.reader();
    let _ = reader.decode_value::<MessageId>();
    let _ = reader.decode_str();
    let _ = reader.decode_cstring();
    let _ = reader.decode_value::<[[u32; 2]; 10]>();
    let _ = reader.decode_value::<heapless::String<16>>();
    assert!(reader.position() <= data.len());

    // Stream-level decodes are atomic: a failure never moves the cursor
    loop {
        let before = stream.cursor();
        if stream.decode_str().is_err() {
            assert_eq!(stream.cursor(), before);
            break;
        }
    }
    assert!(stream.cursor() <= stream.used());
});
