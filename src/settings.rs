// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for both reading (parsing) and writing (rendering)
//! values.

/// How values are written out.
#[derive(Debug)]
pub struct Format {
    /// Put single quotes around every symbol, even those that would
    /// read back fine without (makes symbols stand out from field
    /// names when debugging).
    pub quote_all_symbols: bool,
}

pub const DEBUG_FORMAT : Format = Format {
    quote_all_symbols: true,
};

pub const COMPACT_FORMAT : Format = Format {
    quote_all_symbols: false,
};


/// How input is read.
#[derive(Debug)]
pub struct Modes {
    /// Maximum nesting of containers and annotations.
    pub max_depth: u32,
}

pub const DEFAULT_MODES : Modes = Modes {
    // Fits the 2 MiB stack of spawned threads (and test threads)
    // in debug builds, which overflow at around 400.
    max_depth: 128,
};


#[derive(Debug)]
pub struct Settings<'t> {
    pub format: &'t Format,
    pub modes: &'t Modes,
}

impl Default for Settings<'static> {
    fn default() -> Self {
        Settings {
            format: &DEBUG_FORMAT,
            modes: &DEFAULT_MODES,
        }
    }
}
