// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Stream properties: boundaries, atomicity and randomized round trips.
//
// Randomized tests use a fixed seed so failures are reproducible; set
// POKE_SEED to explore other sequences.

#![allow(clippy::float_cmp)]
#![allow(clippy::cast_possible_truncation)]

use poke_stream::array::{elements, elements_mut, Encoder, RawDecoder, RawEncoder, StreamDecoder};
use poke_stream::{code_array, Error, Reader, Stream};

const ROUNDS: usize = 256;

fn rng() -> fastrand::Rng {
    let seed = std::env::var("POKE_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x706f_6b65);
    fastrand::Rng::with_seed(seed)
}

/// One randomly chosen value, remembered so it can be checked after decode
#[derive(Debug, Clone, PartialEq)]
enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    fn random(rng: &mut fastrand::Rng) -> Self {
        match rng.u8(0..12) {
            0 => Self::U8(rng.u8(..)),
            1 => Self::I8(rng.i8(..)),
            2 => Self::U16(rng.u16(..)),
            3 => Self::I16(rng.i16(..)),
            4 => Self::U32(rng.u32(..)),
            5 => Self::I32(rng.i32(..)),
            6 => Self::U64(rng.u64(..)),
            7 => Self::I64(rng.i64(..)),
            8 => Self::F32(rng.f32() * 1000.0 - 500.0),
            9 => Self::F64(rng.f64() * 1e9 - 5e8),
            10 => Self::Bool(rng.bool()),
            _ => {
                let len = rng.usize(0..12);
                Self::Str((0..len).map(|_| rng.alphanumeric()).collect())
            }
        }
    }

    fn width(&self) -> usize {
        match self {
            Self::U8(_) | Self::I8(_) | Self::Bool(_) => 1,
            Self::U16(_) | Self::I16(_) => 2,
            Self::U32(_) | Self::I32(_) | Self::F32(_) => 4,
            Self::U64(_) | Self::I64(_) | Self::F64(_) => 8,
            Self::Str(s) => s.len() + 1,
        }
    }

    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> poke_stream::Result<()> {
        match self {
            Self::U8(v) => stream.encode_u8(*v),
            Self::I8(v) => stream.encode_i8(*v),
            Self::U16(v) => stream.encode_u16(*v),
            Self::I16(v) => stream.encode_i16(*v),
            Self::U32(v) => stream.encode_u32(*v),
            Self::I32(v) => stream.encode_i32(*v),
            Self::U64(v) => stream.encode_u64(*v),
            Self::I64(v) => stream.encode_i64(*v),
            Self::F32(v) => stream.encode_f32(*v),
            Self::F64(v) => stream.encode_f64(*v),
            Self::Bool(v) => stream.encode_bool(*v),
            Self::Str(s) => stream.encode_str(s),
        }
    }

    fn decode_like(&self, reader: &mut Reader<'_>) -> poke_stream::Result<Self> {
        Ok(match self {
            Self::U8(_) => Self::U8(reader.decode_u8()?),
            Self::I8(_) => Self::I8(reader.decode_i8()?),
            Self::U16(_) => Self::U16(reader.decode_u16()?),
            Self::I16(_) => Self::I16(reader.decode_i16()?),
            Self::U32(_) => Self::U32(reader.decode_u32()?),
            Self::I32(_) => Self::I32(reader.decode_i32()?),
            Self::U64(_) => Self::U64(reader.decode_u64()?),
            Self::I64(_) => Self::I64(reader.decode_i64()?),
            Self::F32(_) => Self::F32(reader.decode_f32()?),
            Self::F64(_) => Self::F64(reader.decode_f64()?),
            Self::Bool(_) => Self::Bool(reader.decode_bool()?),
            Self::Str(_) => Self::Str(reader.decode_str()?.to_owned()),
        })
    }
}

// === Sequential round trips ===

#[test]
fn random_sequences_roundtrip() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let mut stream = Stream::<128>::new();
        let mut values = Vec::new();
        loop {
            let value = Value::random(&mut rng);
            if value.encode(&mut stream).is_err() {
                break;
            }
            values.push(value);
        }

        let expected_len: usize = values.iter().map(Value::width).sum();
        assert_eq!(stream.cursor(), expected_len, "no padding between values");

        stream.seal();
        let mut reader = stream.reader();
        for value in &values {
            assert_eq!(&value.decode_like(&mut reader).unwrap(), value);
        }
        assert!(reader.is_empty());
    }
}

#[test]
fn failed_encode_never_moves_cursor() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let mut stream = Stream::<24>::new();
        loop {
            let value = Value::random(&mut rng);
            let before = stream.cursor();
            match value.encode(&mut stream) {
                Ok(()) => assert_eq!(stream.cursor(), before + value.width()),
                Err(Error::Overflow {
                    requested,
                    available,
                }) => {
                    assert_eq!(stream.cursor(), before);
                    assert_eq!(requested, value.width());
                    assert_eq!(available, 24 - before);
                    break;
                }
                Err(other) => panic!("unexpected error {other}"),
            }
        }
    }
}

#[test]
fn truncated_message_underflows_without_moving() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let mut full = Stream::<64>::new();
        let value = Value::random(&mut rng);
        value.encode(&mut full).unwrap();
        full.seal();

        let cut = rng.usize(0..value.width());
        let mut truncated = Stream::<64>::new();
        truncated.load(&full.message()[..cut]).unwrap();

        let mut reader = truncated.reader();
        assert!(matches!(
            value.decode_like(&mut reader),
            Err(Error::Underflow { .. })
        ));
        assert_eq!(reader.position(), 0);
    }
}

// === Boundaries ===

#[test]
fn string_poke_roundtrip() {
    let mut stream = Stream::<16>::new();
    stream.encode_str("poke").unwrap();
    assert_eq!(stream.cursor(), 5);

    stream.seal();
    let (view, consumed) = stream.decode_cstring().unwrap();
    assert_eq!(view.to_str().unwrap(), "poke");
    assert_eq!(consumed, 5);
    assert_eq!(stream.cursor(), 5);
}

#[test]
fn string_hi_does_not_fit_two_bytes() {
    let mut stream = Stream::<2>::new();
    assert!(matches!(
        stream.encode_str("hi"),
        Err(Error::Overflow { .. })
    ));
    assert_eq!(stream.cursor(), 0);
}

#[test]
fn decode_stops_at_used_not_capacity() {
    let mut stream = Stream::<16>::new();
    stream.encode_u16(5).unwrap();
    stream.seal();

    assert_eq!(stream.decode_u16().unwrap(), 5);
    assert_eq!(
        stream.decode_u8(),
        Err(Error::Underflow {
            requested: 1,
            available: 0
        })
    );
}

#[test]
fn reset_twice_equals_reset_once() {
    let mut once = Stream::<8>::new();
    let mut twice = Stream::<8>::new();
    for stream in [&mut once, &mut twice] {
        stream.encode_u32(9).unwrap();
        stream.seal();
        stream.decode_u8().unwrap();
    }
    once.reset();
    twice.reset();
    twice.reset();
    assert_eq!(
        (once.cursor(), once.used()),
        (twice.cursor(), twice.used())
    );
}

// === Arrays ===

#[test]
fn u16_array_fills_capacity_exactly() {
    let values: [u16; 3] = [1, 2, 3];
    let mut stream = Stream::<6>::new();
    assert_eq!(code_array(&mut stream, &values, Encoder).unwrap(), 3);
    assert_eq!(stream.remaining(), 0);

    stream.seal();
    let mut back = [0u16; 3];
    code_array(&mut stream, &mut back, StreamDecoder).unwrap();
    assert_eq!(back, values);
}

#[test]
fn array_failure_keeps_earlier_elements() {
    let mut stream = Stream::<7>::new();
    let values: [u32; 4] = [1, 2, 3, 4];
    let failure = code_array(&mut stream, &values, Encoder).unwrap_err();
    assert_eq!(failure.index, 1);
    assert_eq!(stream.cursor(), 4);
    assert_eq!(stream.written(), &1u32.to_ne_bytes());
}

#[test]
fn random_raw_regions_roundtrip() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let size = rng.usize(1..9);
        let count = rng.usize(0..8);
        let region: Vec<u8> = (0..count * size).map(|_| rng.u8(..)).collect();

        let mut stream = Stream::<64>::new();
        code_array(&mut stream, elements(&region, count, size).unwrap(), RawEncoder).unwrap();
        assert_eq!(stream.written(), region.as_slice());

        stream.seal();
        let mut back = vec![0u8; region.len()];
        code_array(&mut stream, elements_mut(&mut back, count, size).unwrap(), RawDecoder)
            .unwrap();
        assert_eq!(back, region);
    }
}

// === Pop ===

#[test]
fn pop_reverses_encode_order() {
    let mut rng = rng();
    for _ in 0..ROUNDS {
        let mut stream = Stream::<64>::new();
        let pushed: Vec<u32> = (0..rng.usize(1..16)).map(|_| rng.u32(..)).collect();
        for value in &pushed {
            stream.encode_u32(*value).unwrap();
        }
        for value in pushed.iter().rev() {
            assert_eq!(stream.pop_scalar::<u32>().unwrap(), *value);
        }
        assert_eq!(stream.cursor(), 0);
        assert!(stream.pop_scalar::<u8>().is_err());
    }
}
