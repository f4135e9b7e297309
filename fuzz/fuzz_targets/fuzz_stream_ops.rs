// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use poke_stream::Stream;

fuzz_target!(|data: &[u8]| {
    let mut stream = Stream::<64>::new();

    // Each pair of bytes is (opcode, operand)
    for op in data.chunks_exact(2) {
        let before = stream.cursor();
        let ok = match op[0] % 8 {
            0 => stream.encode_u8(op[1]).is_ok(),
            1 => stream.encode_u32(u32::from(op[1])).is_ok(),
            2 => stream.encode_f64(f64::from(op[1])).is_ok(),
            3 => {
                let text = "poke".repeat(usize::from(op[1] % 20));
                stream.encode_str(&text).is_ok()
            }
            4 => stream.decode_u16().is_ok(),
            5 => stream.decode_str().is_ok(),
            6 => stream.pop_scalar::<u32>().is_ok(),
            _ => {
                stream.seal();
                true
            }
        };
        if !ok {
            assert_eq!(stream.cursor(), before);
        }
        assert!(stream.cursor() <= stream.capacity());
        assert!(stream.used() <= stream.capacity());
    }
});
