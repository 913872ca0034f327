// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Building values from the token stream, and the entry points for
//! reading and writing whole inputs.

use crate::pos::Pos;
use crate::context::{self, Context};
use crate::lex::{Lexer, LexError, LexErrorWithPos, Token, TokenKind, TokenWithPos};
use crate::number::{convert_number, NumericError};
use crate::settings::{Settings, Modes};
use crate::value::{Atom, Field, Parenkind, VValue, Value, ValueType};
use crate::buffered_chars::buffered_chars;
use kstring::KString;
use std::fmt::{Formatter, Display};
use std::io::{Read, Write};
use std::path::Path;
use std::fs::File;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{0}")]
    Lex(LexError),
    #[error("{0}")]
    Numeric(NumericError),
    #[error("unexpected token {0}")]
    UnexpectedToken(Token),
    #[error("'{}' {1} expects '{}', got '{}'",
            .0.opening(), .0.closing(), .2.closing())]
    ParenMismatch(Parenkind, Pos, Parenkind),
    #[error("invalid struct field name: a {0} instead of a symbol or string")]
    InvalidFieldName(ValueType),
    #[error("missing struct field name")]
    MissingFieldName,
    #[error("struct field name carries annotation '{0}'")]
    AnnotatedFieldName(KString),
    #[error("expecting ':' after struct field name, got {0}")]
    MissingColon(Token),
    #[error("missing value for struct field '{0}'")]
    MissingFieldValue(KString),
    #[error("annotation '{0}' is not followed by a value")]
    DanglingAnnotation(KString),
    #[error("nesting too deep")]
    NestingTooDeep,
    #[error("premature EOF while expecting closing character '{}' for '{}'",
            .0.closing(), .0.opening())]
    UnexpectedEof(Parenkind),
}

/// The broad classes of errors, for callers that need to react
/// differently to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreadable input
    Io,
    /// A character or escape sequence that is not allowed
    Lex,
    /// A token where the grammar does not allow it
    Syntax,
    /// A number literal that does not convert
    NumericConversion,
    /// Input ended inside a container
    UnexpectedEndOfInput,
}

impl ParseError {
    fn at(self, p: Pos) -> ParseErrorWithPos {
        ParseErrorWithPos {
            err: self,
            pos: p
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lex(LexError::IOError(_)) => ErrorKind::Io,
            ParseError::Lex(_) => ErrorKind::Lex,
            ParseError::Numeric(_) => ErrorKind::NumericConversion,
            ParseError::UnexpectedEof(_) => ErrorKind::UnexpectedEndOfInput,
            ParseError::UnexpectedToken(_)
                | ParseError::ParenMismatch(_, _, _)
                | ParseError::InvalidFieldName(_)
                | ParseError::MissingFieldName
                | ParseError::AnnotatedFieldName(_)
                | ParseError::MissingColon(_)
                | ParseError::MissingFieldValue(_)
                | ParseError::DanglingAnnotation(_)
                | ParseError::NestingTooDeep => ErrorKind::Syntax,
        }
    }
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct ParseErrorWithPos {
    pub err: ParseError,
    pub pos: Pos
}

impl ParseErrorWithPos {
    pub fn kind(&self) -> ErrorKind {
        self.err.kind()
    }

    /// Attach the source the error happened in.
    pub fn in_context(self, container: Box<dyn Context>) -> ParseErrorWithLocation {
        ParseErrorWithLocation::PC(
            Box::new(
                ParseErrorWithPosContext {
                    err_with_pos: self,
                    container
                }))
    }
}

impl From<LexErrorWithPos> for ParseErrorWithPos {
    fn from(ep: LexErrorWithPos) -> ParseErrorWithPos {
        let LexErrorWithPos { err, pos } = ep;
        ParseError::Lex(err).at(pos)
    }
}

trait At<T> {
    fn at(self, p: Pos) -> Result<T, ParseErrorWithPos>;
}

impl<T> At<T> for Result<T, NumericError> {
    fn at(self, p: Pos) -> Result<T, ParseErrorWithPos> {
        self.map_err(|e| ParseError::Numeric(e).at(p))
    }
}

#[derive(Error, Debug)]
pub struct ParseErrorWithPosContext {
    err_with_pos: ParseErrorWithPos,
    container: Box<dyn Context>
}

impl Display for ParseErrorWithPosContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{} ",
                                 self.err_with_pos.err))?;
        self.container.format_with_pos(self.err_with_pos.pos, f)
    }
}

#[derive(Error, Debug)]
pub enum ParseErrorWithContext {
    #[error("{}: {0}", .1.to_string_without_pos())]
    IO(std::io::Error, Box<dyn Context>)
}

#[derive(Error, Debug)]
pub enum ParseErrorWithLocation {
    #[error("{0}")]
    PC(Box<ParseErrorWithPosContext>),
    #[error("{0}")]
    IO(Box<ParseErrorWithContext>)
}

impl ParseErrorWithLocation {
    fn io(e: std::io::Error, container: Box<dyn Context>) -> ParseErrorWithLocation {
        ParseErrorWithLocation::IO(Box::new(ParseErrorWithContext::IO(e, container)))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseErrorWithLocation::PC(e) => e.err_with_pos.kind(),
            ParseErrorWithLocation::IO(_) => ErrorKind::Io,
        }
    }
}


/// Recursive descent over the tokens from a `Lexer`. Keeps its own
/// slot for one token of lookahead (needed to see whether a symbol
/// is followed by `::`), separate from the lexer's. An error met
/// while looking ahead waits in that slot until the next token is
/// asked for.
pub struct Parser<'s, I> {
    lexer: Lexer<I>,
    pushed_back: Option<Result<TokenWithPos, ParseErrorWithPos>>,
    modes: &'s Modes,
}

impl<'s, I> Parser<'s, I>
    where I: Iterator<Item = anyhow::Result<(char, Pos)>>
{
    pub fn new(lexer: Lexer<I>, settings: &'s Settings) -> Self {
        Parser {
            lexer,
            pushed_back: None,
            modes: settings.modes,
        }
    }

    fn scan(&mut self) -> Result<TokenWithPos, ParseErrorWithPos> {
        if let Some(r) = self.pushed_back.take() {
            return r
        }
        Ok(self.lexer.next_token()?)
    }

    fn unscan(&mut self, r: Result<TokenWithPos, ParseErrorWithPos>) {
        self.pushed_back = Some(r);
    }

    // Comments can separate whitespace into several tokens, thus loop.
    fn scan_ignore_whitespace(&mut self) -> Result<TokenWithPos, ParseErrorWithPos> {
        loop {
            let t = self.scan()?;
            if t.0.kind != TokenKind::Whitespace {
                return Ok(t)
            }
        }
    }

    /// Parse the next value. Returns `None` at the end of the input,
    /// and also for a comma or colon where a value would be
    /// expected.
    pub fn parse(&mut self) -> Result<Option<Value>, ParseErrorWithPos> {
        self.parse_value(self.modes.max_depth)
    }

    /// Parse all values up to the end of the input.
    pub fn parse_all(&mut self) -> Result<Vec<Value>, ParseErrorWithPos> {
        let mut vals = Vec::new();
        loop {
            let t = self.scan_ignore_whitespace()?;
            if t.0.kind == TokenKind::Eof {
                return Ok(vals)
            }
            if let Some(v) = self.parse_token(t, self.modes.max_depth)? {
                vals.push(v);
            }
        }
    }

    fn parse_value(&mut self, depth_fuel: u32) -> Result<Option<Value>, ParseErrorWithPos> {
        let t = self.scan_ignore_whitespace()?;
        self.parse_token(t, depth_fuel)
    }

    fn parse_token(&mut self, t: TokenWithPos, depth_fuel: u32)
                   -> Result<Option<Value>, ParseErrorWithPos> {
        let TokenWithPos(Token { kind, text }, pos) = t;
        match kind {
            TokenKind::Eof
                | TokenKind::Whitespace
                | TokenKind::Comma
                | TokenKind::Colon => Ok(None),
            TokenKind::Illegal => Err(ParseError::Lex(LexError::from_illegal(text)).at(pos)),
            TokenKind::Symbol => {
                let next = self.scan_ignore_whitespace();
                if matches!(next,
                            Ok(TokenWithPos(Token { kind: TokenKind::DoubleColon, .. }, _))) {
                    if depth_fuel == 0 {
                        return Err(ParseError::NestingTooDeep.at(pos))
                    }
                    match self.parse_value(depth_fuel - 1)? {
                        Some(mut v) => {
                            // Inner annotations were attached already
                            v.annotations.insert(0, text);
                            Ok(Some(v))
                        }
                        None => Err(ParseError::DanglingAnnotation(text).at(pos))
                    }
                } else {
                    self.unscan(next);
                    Ok(Some(match text.as_str() {
                        "true" => Atom::Bool(true),
                        "false" => Atom::Bool(false),
                        "null" => Atom::Null,
                        _ => Atom::Symbol(text)
                    }.into()))
                }
            }
            TokenKind::String => Ok(Some(Atom::String(text).into())),
            TokenKind::Number => Ok(Some(convert_number(&text).at(pos)?.into())),
            TokenKind::Open(pk) => {
                if depth_fuel == 0 {
                    return Err(ParseError::NestingTooDeep.at(pos))
                }
                let v = if pk == Parenkind::Curly {
                    self.parse_struct(pos, depth_fuel - 1)?
                } else {
                    self.parse_sequence(pk, pos, depth_fuel - 1)?
                };
                Ok(Some(v))
            }
            TokenKind::Close(_) | TokenKind::DoubleColon =>
                Err(ParseError::UnexpectedToken(Token { kind, text }).at(pos)),
        }
    }

    // Commas between the elements are accepted anywhere and ignored.
    fn parse_sequence(&mut self, pk: Parenkind, startpos: Pos, depth_fuel: u32)
                      -> Result<Value, ParseErrorWithPos> {
        let mut vals = Vec::new();
        loop {
            let t = self.scan_ignore_whitespace()?;
            match t.0.kind {
                TokenKind::Eof =>
                    return Err(ParseError::UnexpectedEof(pk).at(startpos)),
                TokenKind::Close(k) if k == pk => {
                    let v = if pk == Parenkind::Round {
                        VValue::Sexp(vals)
                    } else {
                        VValue::List(vals)
                    };
                    return Ok(v.into())
                }
                TokenKind::Close(k) =>
                    return Err(ParseError::ParenMismatch(pk, startpos, k).at(t.1)),
                _ => {
                    if let Some(v) = self.parse_token(t, depth_fuel)? {
                        vals.push(v);
                    }
                }
            }
        }
    }

    fn parse_struct(&mut self, startpos: Pos, depth_fuel: u32)
                    -> Result<Value, ParseErrorWithPos> {
        let premature_eof = || ParseError::UnexpectedEof(Parenkind::Curly).at(startpos);
        let mut fields = Vec::new();
        loop {
            let t = self.scan_ignore_whitespace()?;
            let namepos = t.1;
            match t.0.kind {
                TokenKind::Eof => return Err(premature_eof()),
                TokenKind::Close(Parenkind::Curly) =>
                    return Ok(VValue::Struct(fields).into()),
                TokenKind::Comma => {}
                _ => {
                    let name = match self.parse_token(t, depth_fuel)? {
                        Some(Value { annotations,
                                     value: VValue::Atom(Atom::Symbol(s) | Atom::String(s)) }) =>
                            match annotations.into_iter().next() {
                                Some(a) => return Err(ParseError::AnnotatedFieldName(a)
                                                      .at(namepos)),
                                None => s
                            },
                        Some(v) =>
                            return Err(ParseError::InvalidFieldName(v.value_type())
                                       .at(namepos)),
                        None => return Err(ParseError::MissingFieldName.at(namepos)),
                    };
                    let t = self.scan_ignore_whitespace()?;
                    match t.0.kind {
                        TokenKind::Colon => {}
                        TokenKind::Eof => return Err(premature_eof()),
                        _ => return Err(ParseError::MissingColon(t.0).at(t.1)),
                    }
                    let t = self.scan_ignore_whitespace()?;
                    let (valuekind, valuepos) = (t.0.kind, t.1);
                    match self.parse_token(t, depth_fuel)? {
                        Some(value) => fields.push(Field { name, value }),
                        None if valuekind == TokenKind::Eof => return Err(premature_eof()),
                        None => return Err(ParseError::MissingFieldValue(name).at(valuepos)),
                    }
                }
            }
        }
    }
}


/// Parse one value from `fh`, using the default settings. Reading
/// stops after the value (plus one token of lookahead); the rest of
/// the input is not examined. Returns `None` for empty input.
pub fn parse(
    fh: impl Read,
) -> Result<Option<Value>, ParseErrorWithPos>
{
    parse_with_settings(fh, &Settings::default())
}

pub fn parse_with_settings(
    fh: impl Read,
    settings: &Settings,
) -> Result<Option<Value>, ParseErrorWithPos>
{
    let mut parser = Parser::new(Lexer::new(buffered_chars(fh)), settings);
    parser.parse()
}

pub fn parse_str(s: &str) -> Result<Option<Value>, ParseErrorWithPos> {
    parse(s.as_bytes())
}

/// Parse all values in `fh`, in order.
pub fn parse_all(
    fh: impl Read,
) -> Result<Vec<Value>, ParseErrorWithPos>
{
    let settings = Settings::default();
    let mut parser = Parser::new(Lexer::new(buffered_chars(fh)), &settings);
    parser.parse_all()
}

/// Parse one value from the file at `path`. The file is closed
/// again before returning, also on errors.
pub fn parse_file(path: &Path) -> Result<Option<Value>, ParseErrorWithLocation> {
    let file_context = || Box::new(context::FileContext { path: path.to_path_buf() });
    let fh = File::open(path)
        .map_err(|e| ParseErrorWithLocation::io(e, file_context()))?;
    parse(fh).map_err(|e| e.in_context(file_context()))
}

/// Write each value on its own line.
pub fn write_all<'t>(
    out: impl Write,
    vals: impl IntoIterator<Item = &'t Value>
) -> Result<(), std::io::Error> {
    let mut out = out; // for `File`
    for v in vals.into_iter() {
        writeln!(out, "{}", v)?;
    }
    out.flush()
}

pub fn write_file<'t>(path: &Path, vals: impl IntoIterator<Item = &'t Value>)
                      -> Result<(), std::io::Error> {
    write_all(std::io::BufWriter::new(File::create(path)?), vals)
}
