// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A reader and writer for a textual, Ion-like data notation:
//! 
//! ```text
//! // comments run to the end of the line
//! point::{x: 1, y: 0x1f, label: "origin", tags: ['a', b], code: (add 1 2.5)}
//! ```
//! 
//! * Values are null, booleans, 64-bit integers (decimal, `0x` hex or
//!   `0b` binary), floats, strings, symbols, structs, lists and
//!   s-expressions, each optionally carrying annotations (`name::`).
//! 
//! * Layered: [lex](lex/index.html) gives direct
//!   access to the tokens, [parse](parse/index.html) builds a
//!   [Value](value/struct.Value.html) tree, and the tree is rendered
//!   back via `Display` (or [Value::render](value/struct.Value.html#method.render)).
//! 
//! * Errors carry precise locations (`@line.col`, plus the file path
//!   for [parse_file](parse/fn.parse_file.html)).
//! 
//! Not supported: binary encoding, decimals, timestamps, and
//! streaming partial input.

pub mod buffered_chars;
pub mod context;
pub mod lex;
pub mod number;
pub mod parse;
pub mod pos;
pub mod settings;
pub mod value;

pub use parse::{parse, parse_str, parse_all, parse_file, ErrorKind};
pub use value::Value;
