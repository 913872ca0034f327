// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runtime data types representing a parsed value, and rendering
//! them back to text.

//! [Atom](Atom) holds the scalars, [VValue](VValue) adds the
//! containers, and [Value](Value) pairs a `VValue` with its
//! annotations. Containers own their children; there are no cycles.

use crate::settings::{Format, DEBUG_FORMAT};
use std::fmt::{Display, Formatter, Write};
use kstring::KString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parenkind {
    /// `( )`, s-expressions
    Round,
    /// `[ ]`, lists
    Square,
    /// `{ }`, structs
    Curly
}

impl Parenkind {
    pub fn opening(self) -> char {
        match self {
            Parenkind::Round => '(',
            Parenkind::Square => '[',
            Parenkind::Curly => '{'
        }
    }
    pub fn closing(self) -> char {
        match self {
            Parenkind::Round => ')',
            Parenkind::Square => ']',
            Parenkind::Curly => '}'
        }
    }
    /// Used in token names, e.g. `OPEN_BRACE`.
    pub fn name(self) -> &'static str {
        match self {
            Parenkind::Round => "PAREN",
            Parenkind::Square => "BRACKET",
            Parenkind::Curly => "BRACE"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Bool,
    Int,
    Float,
    String,
    Symbol,
    Struct,
    List,
    Sexp,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Symbol => "symbol",
            ValueType::Struct => "struct",
            ValueType::List => "list",
            ValueType::Sexp => "sexp",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(KString),
    Symbol(KString),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: KString,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub enum VValue {
    Atom(Atom),
    /// Fields in source order; the order is kept for rendering but
    /// does not matter for equality, and names can repeat.
    Struct(Vec<Field>),
    List(Vec<Value>),
    Sexp(Vec<Value>),
}

// Multiset comparison; every field of `a` must be matched by a
// distinct field of `b`.
fn fields_eq(a: &[Field], b: &[Field]) -> bool {
    if a.len() != b.len() {
        return false
    }
    let mut used = vec![false; b.len()];
    'outer: for fa in a {
        for (i, fb) in b.iter().enumerate() {
            if !used[i] && fa == fb {
                used[i] = true;
                continue 'outer;
            }
        }
        return false
    }
    true
}

impl PartialEq for VValue {
    fn eq(&self, other: &VValue) -> bool {
        match (self, other) {
            (VValue::Atom(a), VValue::Atom(b)) => a == b,
            (VValue::Struct(a), VValue::Struct(b)) => fields_eq(a, b),
            (VValue::List(a), VValue::List(b)) => a == b,
            (VValue::Sexp(a), VValue::Sexp(b)) => a == b,
            _ => false
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    /// Outermost first, as they appear in the source.
    pub annotations: Vec<KString>,
    pub value: VValue,
}

impl From<VValue> for Value {
    fn from(value: VValue) -> Value {
        Value { annotations: Vec::new(), value }
    }
}

impl From<Atom> for Value {
    fn from(a: Atom) -> Value {
        VValue::Atom(a).into()
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match &self.value {
            VValue::Atom(a) => match a {
                Atom::Null => ValueType::Null,
                Atom::Bool(_) => ValueType::Bool,
                Atom::Int(_) => ValueType::Int,
                Atom::Float(_) => ValueType::Float,
                Atom::String(_) => ValueType::String,
                Atom::Symbol(_) => ValueType::Symbol,
            }
            VValue::Struct(_) => ValueType::Struct,
            VValue::List(_) => ValueType::List,
            VValue::Sexp(_) => ValueType::Sexp,
        }
    }

    pub fn with_annotation(mut self, name: &str) -> Value {
        self.annotations.push(KString::from_ref(name));
        self
    }

    /// The first field called `name`, if this is a struct.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match &self.value {
            VValue::Struct(fields) =>
                fields.iter().find(|f| f.name.as_str() == name).map(|f| &f.value),
            _ => None
        }
    }

    /// The elements of a list or s-expression.
    pub fn elements(&self) -> Option<&[Value]> {
        match &self.value {
            VValue::List(vs) | VValue::Sexp(vs) => Some(vs),
            _ => None
        }
    }

    /// The text in the default format (see `Display`).
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Render in the given format, e.g. `value.render_with(&COMPACT_FORMAT)`.
    pub fn render_with(&self, format: &Format) -> String {
        Rendered { value: self, format }.to_string()
    }
}

/// Easily create a symbol
pub fn symbol(s: &str) -> Value {
    Atom::Symbol(KString::from_ref(s)).into()
}

/// Easily create a string
pub fn string(s: &str) -> Value {
    Atom::String(KString::from_ref(s)).into()
}

/// Easily create a struct from name/value pairs
pub fn structure<'t>(fields: impl IntoIterator<Item = (&'t str, Value)>) -> Value {
    VValue::Struct(
        fields.into_iter()
            .map(|(name, value)| Field { name: KString::from_ref(name), value })
            .collect()).into()
}


pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_identifier(s: &str) -> bool {
    let mut cs = s.chars();
    match cs.next() {
        Some(c) if is_identifier_start(c) => cs.all(is_identifier_char),
        _ => false
    }
}

// Identifiers that the parser turns into non-symbols.
fn is_keyword(s: &str) -> bool {
    s == "true" || s == "false" || s == "null"
}

/// Write `s` delimited by `quote`, escaping only what the lexer
/// knows how to unescape.
pub(crate) fn fmt_quoted(f: &mut Formatter<'_>, quote: char, s: &str)
                         -> Result<(), std::fmt::Error> {
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\t' => f.write_str("\\t")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '"' if quote == '"' => f.write_str("\\\"")?,
            _ => f.write_char(c)?
        }
    }
    f.write_char(quote)
}

// Field and annotation names: bare if they read back as the same
// symbol, otherwise quoted with `quote`. Field names need `"` since
// quoted symbols like 'true' are still read as keywords; annotations
// need `'` since only symbols can be followed by `::`.
fn fmt_name(f: &mut Formatter<'_>, quote: char, s: &str) -> Result<(), std::fmt::Error> {
    if is_identifier(s) && !is_keyword(s) {
        f.write_str(s)
    } else {
        fmt_quoted(f, quote, s)
    }
}

fn fmt_float(f: &mut Formatter<'_>, x: f64) -> Result<(), std::fmt::Error> {
    if x.is_nan() {
        f.write_str("nan")
    } else if x.is_infinite() {
        f.write_str(if x > 0. { "inf" } else { "-inf" })
    } else {
        // Shortest representation that reads back as the same f64;
        // never uses exponent notation, which the lexer lacks. The
        // dot keeps it from reading back as an integer.
        let s = x.to_string();
        f.write_str(&s)?;
        if !s.contains('.') {
            f.write_str(".0")?;
        }
        Ok(())
    }
}

fn fmt_atom(f: &mut Formatter<'_>, a: &Atom, format: &Format)
            -> Result<(), std::fmt::Error> {
    match a {
        Atom::Null => f.write_str("null"),
        Atom::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
        Atom::Int(i) => f.write_fmt(format_args!("{}", i)),
        Atom::Float(x) => fmt_float(f, *x),
        Atom::String(s) => fmt_quoted(f, '"', s),
        Atom::Symbol(s) =>
            if format.quote_all_symbols {
                fmt_quoted(f, '\'', s)
            } else {
                fmt_name(f, '\'', s)
            }
    }
}

fn fmt_sequence(f: &mut Formatter<'_>,
                pk: Parenkind,
                separator: &str,
                vals: &[Value],
                format: &Format)
                -> Result<(), std::fmt::Error> {
    f.write_char(pk.opening())?;
    for (i, v) in vals.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        fmt_value(f, v, format)?;
    }
    f.write_char(pk.closing())
}

fn fmt_value(f: &mut Formatter<'_>, v: &Value, format: &Format)
             -> Result<(), std::fmt::Error> {
    for a in &v.annotations {
        fmt_name(f, '\'', a)?;
        f.write_str("::")?;
    }
    match &v.value {
        VValue::Atom(a) => fmt_atom(f, a, format),
        VValue::Struct(fields) => {
            f.write_char('{')?;
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt_name(f, '"', &field.name)?;
                f.write_str(": ")?;
                fmt_value(f, &field.value, format)?;
            }
            f.write_char('}')
        }
        VValue::List(vals) => fmt_sequence(f, Parenkind::Square, ", ", vals, format),
        VValue::Sexp(vals) => fmt_sequence(f, Parenkind::Round, " ", vals, format),
    }
}

/// A value paired with the format to display it in.
pub struct Rendered<'v, 'f> {
    pub value: &'v Value,
    pub format: &'f Format,
}

impl<'v, 'f> Display for Rendered<'v, 'f> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        fmt_value(f, self.value, self.format)
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        fmt_atom(f, self, &DEBUG_FORMAT)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        fmt_value(f, self, &DEBUG_FORMAT)
    }
}
