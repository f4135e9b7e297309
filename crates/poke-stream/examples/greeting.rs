// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Greeting Call Example
//!
//! Marshals a `greeting` record (two strings and a 10x2 array of sayings)
//! into a call stream, routes it through a dispatcher to `say_hello`, then
//! runs `do_math` whose result travels back in the output stream.
//!
//! ## Usage
//!
//! ```sh
//! cargo run --example greeting
//! ```

use poke_stream::{begin_call, Decode, Dispatcher, Encode, MessageId, Reader, Result, Stream};

const CAPACITY: usize = 128;

const SAY_HELLO: MessageId = MessageId::from_name("say_hello");
const DO_MATH: MessageId = MessageId::from_name("do_math");

/// One saying, a single counter
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Saying {
    it_was: u32,
}

impl Encode for Saying {
    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
        stream.encode_u32(self.it_was)
    }
}

impl Decode<'_> for Saying {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            it_was: reader.decode_u32()?,
        })
    }
}

/// Greeting record; the strings borrow from whichever buffer decoded them
#[derive(Debug)]
struct Greeting<'a> {
    hello: &'a str,
    world: &'a str,
    array: [[Saying; 2]; 10],
}

impl Encode for Greeting<'_> {
    fn encode<const N: usize>(&self, stream: &mut Stream<N>) -> Result<()> {
        stream.encode_str(self.hello)?;
        stream.encode_str(self.world)?;
        stream.encode_value(&self.array)
    }
}

impl<'a> Decode<'a> for Greeting<'a> {
    fn decode(reader: &mut Reader<'a>) -> Result<Self> {
        Ok(Self {
            hello: reader.decode_str()?,
            world: reader.decode_str()?,
            array: reader.decode_value()?,
        })
    }
}

fn say_hello(input: &mut Stream<CAPACITY>, _output: &mut Stream<CAPACITY>) -> Result<()> {
    let mut reader = input.reader();
    let greeting: Greeting<'_> = reader.decode_value()?;
    let total: u32 = greeting.array.iter().flatten().map(|s| s.it_was).sum();
    println!(
        "[say_hello] {} {} ({} sayings, total {})",
        greeting.hello,
        greeting.world,
        greeting.array.len() * 2,
        total
    );
    Ok(())
}

fn do_math(input: &mut Stream<CAPACITY>, output: &mut Stream<CAPACITY>) -> Result<()> {
    let x = input.decode_i32()?;
    output.reset();
    output.encode_i32(x * x)
}

fn main() -> Result<()> {
    let mut hello = say_hello;
    let mut math = do_math;

    let mut dispatcher = Dispatcher::<'_, CAPACITY, 4>::new();
    dispatcher.register(SAY_HELLO, &mut hello)?;
    dispatcher.register(DO_MATH, &mut math)?;
    println!("Registered routes: {:?}", dispatcher);

    let mut array = [[Saying::default(); 2]; 10];
    for (i, saying) in array.iter_mut().flatten().enumerate() {
        saying.it_was = i as u32;
    }
    let greeting = Greeting {
        hello: "hello",
        world: "world",
        array,
    };

    let mut input = Stream::<CAPACITY>::new();
    let mut output = Stream::<CAPACITY>::new();

    begin_call(SAY_HELLO, &mut input)?;
    input.encode_value(&greeting)?;
    println!("say_hello message: {} bytes", input.cursor());
    input.seal();
    dispatcher.dispatch_tagged(&mut input, &mut output)?;

    begin_call(DO_MATH, &mut input)?;
    input.encode_i32(12)?;
    input.seal();
    dispatcher.dispatch_tagged(&mut input, &mut output)?;
    output.seal();
    println!("do_math(12) = {}", output.decode_i32()?);

    Ok(())
}
