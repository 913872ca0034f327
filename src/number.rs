// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion of number token literals. The lexer only collects the
//! characters allowed for the radix, all checking happens here.

use crate::value::Atom;
use num::{BigInt, ToPrimitive};
use kstring::KString;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum NumericError {
    #[error("cannot parse real number {:?}: only decimal reals are supported", .0.as_str())]
    RadixReal(KString),
    #[error("cannot parse real number {:?}", .0.as_str())]
    InvalidReal(KString),
    #[error("cannot parse base {radix} integer: {:?}", .digits.as_str())]
    InvalidInteger { radix: u32, digits: KString },
    #[error("base {radix} integer {:?} does not fit into 64 bits", .digits.as_str())]
    IntegerOutOfRange { radix: u32, digits: KString },
}

/// Splits off a `0x` or `0b` prefix.
pub fn split_radix(literal: &str) -> (u32, &str) {
    if let Some(digits) = literal.strip_prefix("0x") {
        (16, digits)
    } else if let Some(digits) = literal.strip_prefix("0b") {
        (2, digits)
    } else {
        (10, literal)
    }
}

/// Convert the text of a number token to an `Atom::Float` if it
/// contains a dot, to an `Atom::Int` otherwise.
pub fn convert_number(literal: &str) -> Result<Atom, NumericError> {
    let (radix, digits) = split_radix(literal);
    if literal.contains('.') {
        if radix != 10 {
            return Err(NumericError::RadixReal(KString::from_ref(literal)))
        }
        // Too many digits give inf, which would not read back.
        return match literal.parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(Atom::Float(x)),
            _ => Err(NumericError::InvalidReal(KString::from_ref(literal)))
        }
    }
    // Going through BigInt tells bad digits apart from overflow.
    let n = BigInt::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| NumericError::InvalidInteger {
            radix,
            digits: KString::from_ref(digits)
        })?;
    n.to_i64()
        .map(Atom::Int)
        .ok_or_else(|| NumericError::IntegerOutOfRange {
            radix,
            digits: KString::from_ref(digits)
        })
}
