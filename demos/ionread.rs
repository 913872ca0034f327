// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use ionread::buffered_chars::buffered_chars;
use ionread::context::{Context, FileContext, SpecialContext};
use ionread::lex::{Lexer, TokenKind, TokenWithPos};
use ionread::parse::{Parser, write_all};
use ionread::settings::{Settings, Modes, COMPACT_FORMAT, DEBUG_FORMAT};
use clap::Parser as ClapParser;
use std::io::{stdin, stdout, BufWriter, Read, Write};
use std::path::PathBuf;
use anyhow::{Result, bail};


#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Stream the tokens instead of building values
    #[clap(short, long, value_parser)]
    tokens: bool,
    /// Show the token position (only with --tokens)
    #[clap(long, value_parser)]
    pos: bool,
    /// Show the whitespace tokens (only with --tokens)
    #[clap(short, long, value_parser)]
    whitespace: bool,
    /// Quote symbols only where needed
    #[clap(short, long, value_parser)]
    compact: bool,
    /// Maximum nesting depth
    #[clap(long, value_parser, default_value_t = 128)]
    max_depth: u32,
    /// Path to the input file, `-` for stdin
    #[clap(value_parser, required(true))]
    input_path: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (fh, container): (Box<dyn Read>, Box<dyn Context>) =
        if args.input_path.as_os_str() == "-" {
            (Box::new(stdin()), Box::new(SpecialContext::new("stdin")))
        } else {
            (Box::new(std::fs::File::open(&args.input_path)?),
             Box::new(FileContext { path: args.input_path.clone() }))
        };
    let lexer = Lexer::new(buffered_chars(fh));

    if args.tokens {

        // Read through the token stream and just do some bookkeeping
        // and print the tokens.

        let mut count_tokens = 0;
        let mut count_illegal = 0;
        for te in lexer {
            let TokenWithPos(token, pos) = te?;
            count_tokens += 1;
            match token.kind {
                TokenKind::Whitespace if !args.whitespace => continue,
                TokenKind::Illegal => count_illegal += 1,
                _ => {}
            }
            if args.pos {
                println!("{pos} {token}");
            } else {
                println!("{token}");
            }
        }
        println!("// count_tokens = {count_tokens}, count_illegal = {count_illegal}");

    } else {

        // Slurp in the whole contents as a list of values, then print
        // those.

        let modes = Modes { max_depth: args.max_depth };
        let settings = Settings {
            format: if args.compact { &COMPACT_FORMAT } else { &DEBUG_FORMAT },
            modes: &modes,
        };
        let vals = match Parser::new(lexer, &settings).parse_all() {
            Ok(vals) => vals,
            Err(e) => bail!("{}", e.in_context(container)),
        };
        if args.compact {
            let mut out = BufWriter::new(stdout());
            for v in &vals {
                writeln!(out, "{}", v.render_with(settings.format))?;
            }
            out.flush()?;
        } else {
            write_all(BufWriter::new(stdout()), &vals)?;
        }

    }
    Ok(())
}
