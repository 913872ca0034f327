// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! What a stream of text was read from (other than the position
//! within it), for error messages.

use crate::pos::Pos;
use std::{path::PathBuf, fmt::{Formatter, Debug, Display}};

pub trait Context : Debug + Send + Sync {
    /// Format the source alone, to be put *before* a colon and the
    /// error reason. Does not include the colon.
    fn format_without_pos(&self, f: &mut Formatter<'_>)
                          -> Result<(), std::fmt::Error>;

    /// "in" for files, "from" for other things.
    fn preposition(&self) -> &'static str {
        "in"
    }

    /// Format location to be put *after* the error reason and a
    /// space.
    fn format_with_pos(&self, pos: Pos, f: &mut Formatter<'_>)
                       -> Result<(), std::fmt::Error> {
        f.write_str(self.preposition())?;
        f.write_str(" ")?;
        self.format_without_pos(f)?;
        Display::fmt(&pos, f)
    }

    /// Same as `format_without_pos` but as a string.
    fn to_string_without_pos(&self) -> String {
        format!("{}", &WithoutPos(self))
    }
}

// Formatter::new is not public, hence go through Display.
struct WithoutPos<'t, T: Context + ?Sized>(&'t T);

impl<'t, T: Context + ?Sized> Display for WithoutPos<'t, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.format_without_pos(f)
    }
}


#[derive(Debug)]
pub struct FileContext {
    pub path: PathBuf
}

impl Context for FileContext {
    fn format_without_pos(&self, f: &mut Formatter<'_>)
                          -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{:?}", &self.path))
    }
}

/// A stream without a path, like stdin.
#[derive(Debug)]
pub struct SpecialContext {
    name: String
}

impl SpecialContext {
    pub fn new(name: &str) -> Self {
        SpecialContext { name: name.to_string() }
    }
}

impl Context for SpecialContext {
    fn preposition(&self) -> &'static str {
        "from"
    }
    fn format_without_pos(&self, f: &mut Formatter<'_>)
                          -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("({})", &self.name))
    }
}
