use minforth::lang::tokenizing::{Lexer, Token, TokenKind};
use test_case::test_case;

/// The kind and payload of a token, without its location.
fn describe(token: &Token) -> (TokenKind, String) {
    let payload = match token {
        Token::Integer(_, value) => value.to_string(),
        Token::String(_, text) => text.clone(),
        Token::Keyword(_, text) => text.clone(),
        Token::Identifier(_, text) => text.clone(),
        Token::EndOfInput(_) => String::new(),
    };

    (token.kind(), payload)
}

/// Read every token up to and including the end of input.
fn tokens_of(code: &str) -> Vec<(TokenKind, String)> {
    let mut lexer = Lexer::new("<test>", code);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token().unwrap();
        let done = token.is_end_of_input();

        tokens.push(describe(&token));

        if done {
            break;
        }
    }

    tokens
}

fn eoi() -> (TokenKind, String) {
    (TokenKind::EndOfInput, String::new())
}

fn int(value: i64) -> (TokenKind, String) {
    (TokenKind::Integer, value.to_string())
}

fn string(text: &str) -> (TokenKind, String) {
    (TokenKind::String, text.to_string())
}

fn keyword(text: &str) -> (TokenKind, String) {
    (TokenKind::Keyword, text.to_string())
}

fn ident(text: &str) -> (TokenKind, String) {
    (TokenKind::Identifier, text.to_string())
}

#[test_case("", vec![eoi()]; "empty input")]
#[test_case("  \n\t ", vec![eoi()]; "only whitespace")]
#[test_case("1 31337 -7", vec![int(1), int(31337), int(-7), eoi()]; "integers")]
#[test_case("9223372036854775807 -9223372036854775808",
            vec![int(i64::MAX), int(i64::MIN), eoi()]; "integer limits")]
#[test_case("9223372036854775808", vec![ident("9223372036854775808"), eoi()]; "integer overflow is a name")]
#[test_case(r#""1" "" "foo""#, vec![string("1"), string(""), string("foo"), eoi()]; "strings")]
#[test_case(r#""\n""#, vec![string("\n"), eoi()]; "newline string")]
#[test_case(r#""a\nb""#, vec![string("a\\nb"), eoi()]; "no other escapes")]
#[test_case(r#"" "#, vec![ident("\""), eoi()]; "lone quote is a name")]
#[test_case(": ; ) if then else", vec![keyword(":"), keyword(";"), keyword(")"), keyword("if"),
                                      keyword("then"), keyword("else"), eoi()]; "keywords")]
#[test_case("a A foo? ?bar - ", vec![ident("a"), ident("A"), ident("foo?"), ident("?bar"),
                                     ident("-"), eoi()]; "identifiers")]
#[test_case("+ . 0= mod", vec![ident("+"), ident("."), ident("0="), ident("mod"), eoi()]; "operator names")]
#[test_case("2 ( I like pie ) .", vec![int(2), ident("."), eoi()]; "comments")]
#[test_case("( leading ) ( two ) 5", vec![int(5), eoi()]; "back to back comments")]
#[test_case("1 ( a ( b ) c ) 2", vec![int(1), int(2), eoi()]; "comment inside a comment")]
fn tokenizes(code: &str, expected: Vec<(TokenKind, String)>) {
    assert_eq!(tokens_of(code), expected);
}

#[test]
fn end_of_input_is_sticky() {
    let mut lexer = Lexer::new("<test>", "1");

    assert_eq!(lexer.next_token().unwrap().kind(), TokenKind::Integer);

    for _ in 0..3 {
        assert!(lexer.next_token().unwrap().is_end_of_input());
    }
}

#[test]
fn unterminated_comment() {
    let mut lexer = Lexer::new("<test>", "1 ( 2");

    assert!(lexer.next_token().is_ok());
    assert!(lexer.next_token().is_err());
}

#[test]
fn peek_does_not_consume() {
    let mut lexer = Lexer::new("<test>", "foo bar");

    assert!(lexer.peek().unwrap().is_identifier("foo"));
    assert!(lexer.peek().unwrap().is_identifier("foo"));
    assert!(lexer.next_token().unwrap().is_identifier("foo"));
    assert!(lexer.next_token().unwrap().is_identifier("bar"));
}

#[test]
fn single_token_pushback() {
    let mut lexer = Lexer::new("<test>", "foo bar baz");

    let foo = lexer.next_token().unwrap();
    let bar = lexer.next_token().unwrap();

    lexer.pushback(bar).unwrap();
    assert!(lexer.pushback(foo).is_err());

    assert!(lexer.next_token().unwrap().is_identifier("bar"));
    assert!(lexer.next_token().unwrap().is_identifier("baz"));
}

#[test]
fn tokens_know_where_they_came_from() {
    let mut lexer = Lexer::new("script.f", "1\n  foo");

    let one = lexer.next_token().unwrap();
    let foo = lexer.next_token().unwrap();

    assert_eq!((one.location().line(), one.location().column()), (1, 1));
    assert_eq!((foo.location().line(), foo.location().column()), (2, 3));
    assert_eq!(foo.location().path(), "script.f");
}

#[test]
fn deeply_nested_comments() {
    let code = format!("1 {}{} 2", "( ".repeat(20_000), ") ".repeat(20_000));

    assert_eq!(tokens_of(&code), vec![int(1), int(2), eoi()]);
}

#[test]
fn many_comments_in_a_row() {
    let code = format!("1 {} 2", "( x ) ".repeat(20_000));

    assert_eq!(tokens_of(&code), vec![int(1), int(2), eoi()]);
}
