// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Translating a character stream to a token stream. Quoted text is
//! unescaped here already, numbers are only collected (see
//! [number](../number/index.html) for their conversion). Whitespace
//! is returned as tokens, comments are not. See
//! [parse](../parse/index.html) if interested in values rather than
//! tokens.

use crate::pos::Pos;
use crate::value::{Parenkind, fmt_quoted, is_identifier_start, is_identifier_char};
use kstring::KString;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexError {
    #[error("IO error ({0}) after")]
    IOError(anyhow::Error),
    #[error("unexpected EOF in text delimited by '{0}' starting")]
    UnexpectedEofInQuoted(char),
    #[error("illegal character {:?}", .0.as_str())]
    IllegalChar(KString),
    #[error("invalid escape sequence {:?}", .0.as_str())]
    InvalidEscape(KString),
}

impl LexError {
    pub fn at(self, p: Pos) -> LexErrorWithPos {
        LexErrorWithPos {
            err: self,
            pos: p
        }
    }

    /// The error for the text of an `Illegal` token.
    pub fn from_illegal(text: KString) -> LexError {
        if text.len() > 1 && text.starts_with('\\') {
            LexError::InvalidEscape(text)
        } else {
            LexError::IllegalChar(text)
        }
    }
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct LexErrorWithPos {
    pub err: LexError,
    pub pos: Pos
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Whitespace,
    Comma,
    Colon,
    /// `::`, separates an annotation from the value
    DoubleColon,
    /// Identifiers, and text in single quotes
    Symbol,
    /// Text in double quotes
    String,
    Open(Parenkind),
    Close(Parenkind),
    Number,
    Illegal,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Whitespace => f.write_str("WHITESPACE"),
            TokenKind::Comma => f.write_str("COMMA"),
            TokenKind::Colon => f.write_str("COLON"),
            TokenKind::DoubleColon => f.write_str("DOUBLE_COLON"),
            TokenKind::Symbol => f.write_str("SYMBOL"),
            TokenKind::String => f.write_str("STRING"),
            TokenKind::Open(pk) => f.write_fmt(format_args!("OPEN_{}", pk.name())),
            TokenKind::Close(pk) => f.write_fmt(format_args!("CLOSE_{}", pk.name())),
            TokenKind::Number => f.write_str("NUMBER"),
            TokenKind::Illegal => f.write_str("ILLEGAL"),
        }
    }
}

/// A token kind together with its literal text (unescaped for
/// `Symbol` and `String`, empty for `Eof`).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: KString,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str) -> Token {
        Token { kind, text: KString::from_ref(text) }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::String => {
                f.write_str("STRING ")?;
                fmt_quoted(f, '"', &self.text)
            }
            kind => f.write_fmt(format_args!("{} '{}'", kind, self.text)),
        }
    }
}

/// A token and the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos(pub Token, pub Pos);


pub fn maybe_open_close(c: char) -> Option<TokenKind> {
    match c {
        '(' => Some(TokenKind::Open(Parenkind::Round)),
        '[' => Some(TokenKind::Open(Parenkind::Square)),
        '{' => Some(TokenKind::Open(Parenkind::Curly)),
        ')' => Some(TokenKind::Close(Parenkind::Round)),
        ']' => Some(TokenKind::Close(Parenkind::Square)),
        '}' => Some(TokenKind::Close(Parenkind::Curly)),
        _ => None
    }
}

pub fn is_whitespace_char(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n'
}

fn is_decimal_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn is_hex_char(c: char) -> bool {
    c.is_ascii_hexdigit() || c == '.'
}

fn is_binary_char(c: char) -> bool {
    c == '0' || c == '1' || c == '.'
}


/// Turns `(char, Pos)` items, as delivered by
/// [buffered_chars](../buffered_chars/fn.buffered_chars.html), into
/// tokens. Keeps one slot for a token given back via `pushback`,
/// independent of any lookahead done by its users.
pub struct Lexer<I> {
    cs: I,
    /// A character read too far, to be delivered again.
    unread: Option<(char, Pos)>,
    /// Position after the last character read.
    endpos: Pos,
    /// `cs` is exhausted or failed; it must not be asked again.
    at_eof: bool,
    pushed_back: Option<TokenWithPos>,
    /// Set when iterating and the end (or an error) was delivered.
    done: bool,
    tmp: String,
}

impl<I> Lexer<I>
    where I: Iterator<Item = anyhow::Result<(char, Pos)>>
{
    pub fn new(cs: I) -> Self {
        Lexer {
            cs,
            unread: None,
            endpos: Pos::START,
            at_eof: false,
            pushed_back: None,
            done: false,
            tmp: String::new(),
        }
    }

    /// Give back a token to be returned by the next call to
    /// `next_token`. There is only one slot, a second pushback without
    /// a `next_token` in between replaces the first token.
    pub fn pushback(&mut self, t: TokenWithPos) {
        self.pushed_back = Some(t);
    }

    fn next_char(&mut self) -> Result<Option<(char, Pos)>, LexErrorWithPos> {
        if let Some(cp) = self.unread.take() {
            return Ok(Some(cp))
        }
        if self.at_eof {
            return Ok(None)
        }
        match self.cs.next() {
            None => {
                self.at_eof = true;
                Ok(None)
            }
            Some(Err(e)) => {
                self.at_eof = true;
                Err(LexError::IOError(e).at(self.endpos))
            }
            Some(Ok((c, pos))) => {
                self.endpos = pos.after(c);
                Ok(Some((c, pos)))
            }
        }
    }

    fn unread_char(&mut self, cp: (char, Pos)) {
        self.unread = Some(cp);
    }

    fn token(&self, kind: TokenKind, pos: Pos) -> TokenWithPos {
        TokenWithPos(Token::new(kind, &self.tmp), pos)
    }

    fn single(kind: TokenKind, c: char, pos: Pos) -> TokenWithPos {
        let mut buf = [0; 4];
        TokenWithPos(Token::new(kind, c.encode_utf8(&mut buf)), pos)
    }

    /// Append characters to `tmp` as long as they are `accepted`.
    fn extend_while(&mut self, accepted: fn(char) -> bool)
                    -> Result<(), LexErrorWithPos> {
        while let Some((c, pos)) = self.next_char()? {
            if accepted(c) {
                self.tmp.push(c);
            } else {
                self.unread_char((c, pos));
                break;
            }
        }
        Ok(())
    }

    fn skip_line(&mut self) -> Result<(), LexErrorWithPos> {
        while let Some((c, _)) = self.next_char()? {
            if c == '\n' {
                break;
            }
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) -> Result<(), LexErrorWithPos> {
        while let Some((c, pos)) = self.next_char()? {
            if !is_whitespace_char(c) {
                self.unread_char((c, pos));
                break;
            }
        }
        Ok(())
    }

    // `first` was already checked to be a digit.
    fn read_number(&mut self, first: char) -> Result<(), LexErrorWithPos> {
        self.tmp.clear();
        self.tmp.push(first);
        let mut accepted: fn(char) -> bool = is_decimal_char;
        if first == '0' {
            match self.next_char()? {
                Some(('x', _)) => {
                    self.tmp.push('x');
                    accepted = is_hex_char;
                }
                Some(('b', _)) => {
                    self.tmp.push('b');
                    accepted = is_binary_char;
                }
                Some(cp) => self.unread_char(cp),
                None => return Ok(())
            }
        }
        self.extend_while(accepted)
    }

    /// Reads the text up to `delimiter` into `tmp`, unescaping.
    /// Returns `TokenKind::Illegal` with the escape sequence in `tmp`
    /// if it is not a valid one, `kind` otherwise.
    fn read_delimited(&mut self, kind: TokenKind, delimiter: char, startpos: Pos)
                      -> Result<TokenKind, LexErrorWithPos> {
        self.tmp.clear();
        let mut escaped = false;
        loop {
            let c = match self.next_char()? {
                Some((c, _)) => c,
                None => return Err(
                    LexError::UnexpectedEofInQuoted(delimiter).at(startpos))
            };
            if escaped {
                match c {
                    '"' => self.tmp.push('"'),
                    't' => self.tmp.push('\t'),
                    'n' => self.tmp.push('\n'),
                    'r' => self.tmp.push('\r'),
                    '\n' => {
                        // Line continuation, also drops the
                        // indentation of the next line
                        self.skip_whitespace()?;
                    }
                    _ => {
                        self.tmp.clear();
                        self.tmp.push('\\');
                        self.tmp.push(c);
                        return Ok(TokenKind::Illegal)
                    }
                }
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == delimiter {
                return Ok(kind)
            } else {
                self.tmp.push(c);
            }
        }
    }

    /// The next token. At the end of the input, returns `Eof` tokens
    /// (repeatedly).
    pub fn next_token(&mut self) -> Result<TokenWithPos, LexErrorWithPos> {
        if let Some(t) = self.pushed_back.take() {
            return Ok(t)
        }
        loop {
            let (c, pos) = match self.next_char()? {
                Some(cp) => cp,
                None => return Ok(TokenWithPos(Token::new(TokenKind::Eof, ""),
                                               self.endpos))
            };
            if is_whitespace_char(c) {
                self.tmp.clear();
                self.tmp.push(c);
                self.extend_while(is_whitespace_char)?;
                return Ok(self.token(TokenKind::Whitespace, pos))
            } else if is_identifier_start(c) {
                self.tmp.clear();
                self.tmp.push(c);
                self.extend_while(is_identifier_char)?;
                return Ok(self.token(TokenKind::Symbol, pos))
            } else if c.is_ascii_digit() {
                self.read_number(c)?;
                return Ok(self.token(TokenKind::Number, pos))
            } else if let Some(kind) = maybe_open_close(c) {
                return Ok(Self::single(kind, c, pos))
            }
            match c {
                '/' => match self.next_char()? {
                    Some(('/', _)) => {
                        // Line comment, invisible to users of the lexer
                        self.skip_line()?;
                    }
                    other => {
                        if let Some(cp) = other {
                            self.unread_char(cp);
                        }
                        return Ok(Self::single(TokenKind::Illegal, c, pos))
                    }
                },
                ':' => match self.next_char()? {
                    Some((':', _)) => {
                        return Ok(TokenWithPos(Token::new(TokenKind::DoubleColon, "::"),
                                               pos))
                    }
                    other => {
                        if let Some(cp) = other {
                            self.unread_char(cp);
                        }
                        return Ok(Self::single(TokenKind::Colon, c, pos))
                    }
                },
                ',' => return Ok(Self::single(TokenKind::Comma, c, pos)),
                '\'' => {
                    let kind = self.read_delimited(TokenKind::Symbol, c, pos)?;
                    return Ok(self.token(kind, pos))
                }
                '"' => {
                    let kind = self.read_delimited(TokenKind::String, c, pos)?;
                    return Ok(self.token(kind, pos))
                }
                _ => return Ok(Self::single(TokenKind::Illegal, c, pos))
            }
        }
    }
}

/// Iterating yields all tokens before `Eof`, then ends; it also
/// ends after yielding an error.
impl<I> Iterator for Lexer<I>
    where I: Iterator<Item = anyhow::Result<(char, Pos)>>
{
    type Item = Result<TokenWithPos, LexErrorWithPos>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None
        }
        match self.next_token() {
            Ok(TokenWithPos(Token { kind: TokenKind::Eof, .. }, _)) => {
                self.done = true;
                None
            }
            Ok(t) => Some(Ok(t)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
