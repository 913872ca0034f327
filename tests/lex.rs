use ionread::buffered_chars::buffered_chars;
use ionread::lex::{Lexer, LexError, Token, TokenKind, TokenWithPos};
use ionread::pos::Pos;
use ionread::value::Parenkind;
use kstring::KString;

fn lexer(s: &str) -> Lexer<impl Iterator<Item = anyhow::Result<(char, Pos)>> + '_> {
    Lexer::new(buffered_chars(s.as_bytes()))
}

fn tokens(s: &str) -> Vec<(TokenKind, String)> {
    lexer(s)
        .map(|r| {
            let TokenWithPos(t, _) = r.expect("lex error");
            (t.kind, t.text.to_string())
        })
        .collect()
}

fn tok(kind: TokenKind, text: &str) -> (TokenKind, String) {
    (kind, text.to_string())
}

#[test]
fn whitespace_is_one_token() {
    assert_eq!(tokens("a  \t\n b"),
               vec![tok(TokenKind::Symbol, "a"),
                    tok(TokenKind::Whitespace, "  \t\n "),
                    tok(TokenKind::Symbol, "b")]);
}

#[test]
fn punctuation() {
    assert_eq!(tokens("{}[](),:::"),
               vec![tok(TokenKind::Open(Parenkind::Curly), "{"),
                    tok(TokenKind::Close(Parenkind::Curly), "}"),
                    tok(TokenKind::Open(Parenkind::Square), "["),
                    tok(TokenKind::Close(Parenkind::Square), "]"),
                    tok(TokenKind::Open(Parenkind::Round), "("),
                    tok(TokenKind::Close(Parenkind::Round), ")"),
                    tok(TokenKind::Comma, ","),
                    tok(TokenKind::DoubleColon, "::"),
                    tok(TokenKind::Colon, ":")]);
}

#[test]
fn numbers_collect_radix_digits() {
    assert_eq!(tokens("0x1F 0b102 12.5.6 1x"),
               vec![tok(TokenKind::Number, "0x1F"),
                    tok(TokenKind::Whitespace, " "),
                    tok(TokenKind::Number, "0b10"),
                    tok(TokenKind::Number, "2"),
                    tok(TokenKind::Whitespace, " "),
                    tok(TokenKind::Number, "12.5.6"),
                    tok(TokenKind::Whitespace, " "),
                    tok(TokenKind::Number, "1"),
                    tok(TokenKind::Symbol, "x")]);
    assert_eq!(tokens("0"), vec![tok(TokenKind::Number, "0")]);
    assert_eq!(tokens("0x1.8"), vec![tok(TokenKind::Number, "0x1.8")]);
}

#[test]
fn identifiers() {
    assert_eq!(tokens("foo_1 true"),
               vec![tok(TokenKind::Symbol, "foo_1"),
                    tok(TokenKind::Whitespace, " "),
                    tok(TokenKind::Symbol, "true")]);
    assert_eq!(tokens("_x"),
               vec![tok(TokenKind::Illegal, "_"),
                    tok(TokenKind::Symbol, "x")]);
}

#[test]
fn comments_are_invisible() {
    assert_eq!(tokens("// hi\n42"), vec![tok(TokenKind::Number, "42")]);
    assert_eq!(tokens("1 // no newline"),
               vec![tok(TokenKind::Number, "1"),
                    tok(TokenKind::Whitespace, " ")]);
    assert_eq!(tokens("a// c\n b"),
               vec![tok(TokenKind::Symbol, "a"),
                    tok(TokenKind::Whitespace, " "),
                    tok(TokenKind::Symbol, "b")]);
    assert_eq!(tokens("/a"),
               vec![tok(TokenKind::Illegal, "/"),
                    tok(TokenKind::Symbol, "a")]);
}

#[test]
fn quoted_text() {
    assert_eq!(tokens("'a b' \"c\\td\\n\\r\\\"\""),
               vec![tok(TokenKind::Symbol, "a b"),
                    tok(TokenKind::Whitespace, " "),
                    tok(TokenKind::String, "c\td\n\r\"")]);
    assert_eq!(tokens("\"\" ''"),
               vec![tok(TokenKind::String, ""),
                    tok(TokenKind::Whitespace, " "),
                    tok(TokenKind::Symbol, "")]);
    assert_eq!(tokens("\"// not a comment\""),
               vec![tok(TokenKind::String, "// not a comment")]);
}

#[test]
fn line_continuation() {
    assert_eq!(tokens("\"abc\\\n   def\""),
               vec![tok(TokenKind::String, "abcdef")]);
    assert_eq!(tokens("'x\\\n\n\t y'"),
               vec![tok(TokenKind::Symbol, "xy")]);
}

#[test]
fn invalid_escape() {
    let mut lx = lexer("\"\\q\"");
    let TokenWithPos(t, pos) = lx.next_token().unwrap();
    assert_eq!(t, Token::new(TokenKind::Illegal, "\\q"));
    assert_eq!(pos, Pos { line: 0, col: 0 });
    assert!(matches!(LexError::from_illegal(t.text),
                     LexError::InvalidEscape(s) if s.as_str() == "\\q"));
}

#[test]
fn unterminated_quoted_text() {
    let mut lx = lexer("  \"abc");
    lx.next_token().unwrap();
    let e = lx.next_token().unwrap_err();
    assert!(matches!(e.err, LexError::UnexpectedEofInQuoted('"')));
    assert_eq!(e.pos, Pos { line: 0, col: 2 });
}

#[test]
fn illegal_characters() {
    assert_eq!(tokens("%\r"),
               vec![tok(TokenKind::Illegal, "%"),
                    tok(TokenKind::Illegal, "\r")]);
    assert!(matches!(LexError::from_illegal(KString::from_ref("\\")),
                     LexError::IllegalChar(_)));
}

#[test]
fn eof_is_idempotent() {
    let mut lx = lexer("x");
    lx.next_token().unwrap();
    for _ in 0..3 {
        let TokenWithPos(t, pos) = lx.next_token().unwrap();
        assert_eq!(t, Token::new(TokenKind::Eof, ""));
        assert_eq!(pos, Pos { line: 0, col: 1 });
    }
}

#[test]
fn pushback_has_one_slot() {
    let mut lx = lexer("a b");
    let a = lx.next_token().unwrap();
    lx.pushback(a.clone());
    assert_eq!(lx.next_token().unwrap(), a);
    let ws = lx.next_token().unwrap();
    lx.pushback(a.clone());
    lx.pushback(ws.clone());
    assert_eq!(lx.next_token().unwrap(), ws);
    assert_eq!(lx.next_token().unwrap().0, Token::new(TokenKind::Symbol, "b"));
}

#[test]
fn positions() {
    let mut lx = lexer("a\n  bc // x\n");
    assert_eq!(lx.next_token().unwrap().1, Pos { line: 0, col: 0 });
    assert_eq!(lx.next_token().unwrap().1, Pos { line: 0, col: 1 });
    assert_eq!(lx.next_token().unwrap(), TokenWithPos(Token::new(TokenKind::Symbol, "bc"),
                                                Pos { line: 1, col: 2 }));
    lx.next_token().unwrap();
    assert_eq!(lx.next_token().unwrap().1, Pos { line: 2, col: 0 });
}

#[test]
fn token_display() {
    assert_eq!(Token::new(TokenKind::Open(Parenkind::Curly), "{").to_string(),
               "OPEN_BRACE '{'");
    assert_eq!(Token::new(TokenKind::String, "a\"b").to_string(),
               "STRING \"a\\\"b\"");
    assert_eq!(Token::new(TokenKind::Eof, "").to_string(), "EOF");
}
