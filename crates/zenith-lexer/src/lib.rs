// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Lexical analysis for the Zenith corpus language.
//!
//! This crate tokenizes Zenith source text using logos.
//!
//! # Design
//!
//! - `Token` — all Zenith token types (keywords, punctuation, literals, identifiers)
//! - Whitespace and `#` line comments are stripped during lexing (not tokens)
//! - `tokenize` pairs each token with its byte span for diagnostics
//!
//! # Examples
//!
//! ```
//! # use zenith_lexer::{tokenize, Token};
//! let tokens = tokenize("period:1.0").unwrap();
//! assert_eq!(tokens[0].0, Token::Period);
//! ```

use logos::Logos;
use std::ops::Range;
use std::rc::Rc;

/// Zenith token.
///
/// Represents all lexical elements of the corpus language. Dates and times
/// are kept as raw lexemes; calendar validation happens in the parser, where
/// an out-of-range value can be reported with its span.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")] // Skip whitespace
#[logos(skip r"#[^\n]*")] // Skip # comments
pub enum Token {
    // === Keywords ===
    /// Keyword `law`
    #[token("law")]
    Law,
    /// Keyword `target`
    #[token("target")]
    Target,
    /// Keyword `end_law`
    #[token("end_law")]
    EndLaw,
    /// Keyword `end_target`
    #[token("end_target")]
    EndTarget,
    /// Keyword `Event` (event block header)
    #[token("Event")]
    Event,
    /// Keyword `GROUP` (group expression header)
    #[token("GROUP")]
    Group,
    /// Keyword `start_date`
    #[token("start_date")]
    StartDate,
    /// Keyword `period`
    #[token("period")]
    Period,
    /// Keyword `key`
    #[token("key")]
    Key,
    /// Keyword `dictionnary` (sic, the corpus spelling)
    #[token("dictionnary")]
    Dictionnary,
    /// Keyword `at`
    #[token("at")]
    At,

    // === Punctuation ===
    /// Punctuation `:`
    #[token(":")]
    Colon,
    /// Punctuation `^` (coherence/dispersal separator)
    #[token("^")]
    Caret,
    /// Punctuation `-` (group term separator)
    #[token("-")]
    Dash,
    /// Punctuation `(`
    #[token("(")]
    LParen,
    /// Punctuation `)`
    #[token(")")]
    RParen,
    /// Punctuation `[`
    #[token("[")]
    LBracket,
    /// Punctuation `]`
    #[token("]")]
    RBracket,

    // === Literals ===
    /// Date literal `YYYY-MM-DD`.
    ///
    /// Matched before `Number` by length; the lexeme keeps the raw text so
    /// the parser can report calendar-range errors with a proper span.
    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}", |lex| Rc::from(lex.slice()), priority = 10)]
    Date(Rc<str>),

    /// Time literal `HH:MM` or `HH:MM:SS`.
    #[regex(r"[0-9]{2}:[0-9]{2}(:[0-9]{2})?", |lex| Rc::from(lex.slice()), priority = 10)]
    Time(Rc<str>),

    /// Dotted point literal (e.g. `1.0`, `0.1.30`).
    ///
    /// A numeric lexeme containing at least one `.`; field semantics are
    /// handled by point arithmetic, not the lexer.
    #[regex(r"[0-9]+(\.[0-9]+)+", |lex| Rc::from(lex.slice()))]
    DottedNumber(Rc<str>),

    /// Integer literal.
    ///
    /// LIMITATION: on overflow logos returns None and the lexer emits a
    /// generic error token; the original text is not preserved. The regex
    /// ensures valid format, so only overflow can fail here.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Number(i64),

    /// String literal, double-quoted.
    ///
    /// The only escape processed is `\"`; any other backslash sequence is
    /// kept verbatim.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        Rc::from(unescape_string(&s[1..s.len() - 1]).as_str())
    })]
    Str(Rc<str>),

    /// Identifier (law, target, event, and dictionary names).
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| Rc::from(lex.slice()))]
    Ident(Rc<str>),
}

/// Unescape string literal content: `\"` becomes `"`, everything else is verbatim.
fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'"') {
            chars.next();
            result.push('"');
        } else {
            result.push(c);
        }
    }
    result
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Law => write!(f, "law"),
            Token::Target => write!(f, "target"),
            Token::EndLaw => write!(f, "end_law"),
            Token::EndTarget => write!(f, "end_target"),
            Token::Event => write!(f, "Event"),
            Token::Group => write!(f, "GROUP"),
            Token::StartDate => write!(f, "start_date"),
            Token::Period => write!(f, "period"),
            Token::Key => write!(f, "key"),
            Token::Dictionnary => write!(f, "dictionnary"),
            Token::At => write!(f, "at"),
            Token::Colon => write!(f, ":"),
            Token::Caret => write!(f, "^"),
            Token::Dash => write!(f, "-"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Date(s) => write!(f, "{}", s),
            Token::Time(s) => write!(f, "{}", s),
            Token::DottedNumber(s) => write!(f, "{}", s),
            Token::Number(n) => write!(f, "{}", n),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Ident(id) => write!(f, "{}", id),
        }
    }
}

/// Lexical error with the byte span of the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalError {
    /// Kind of lexical failure
    pub kind: LexicalErrorKind,
    /// Byte range of the offending character(s)
    pub span: Range<usize>,
}

/// Category of lexical failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalErrorKind {
    /// A string literal was opened but never closed before end of input.
    UnterminatedString,
    /// A character that starts no token of the language.
    UnexpectedChar(char),
}

impl std::fmt::Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            LexicalErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexicalErrorKind::UnexpectedChar(c) => write!(f, "unexpected character '{}'", c),
        }
    }
}

impl std::error::Error for LexicalError {}

/// Tokenize source text into (token, byte span) pairs.
///
/// The first lexical error aborts the scan. An error token whose slice
/// starts with `"` is an unterminated string (a terminated one would have
/// matched the string regex); anything else is an unexpected character.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Range<usize>)>, LexicalError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let slice = lexer.slice();
                let kind = if slice.starts_with('"') {
                    LexicalErrorKind::UnterminatedString
                } else {
                    LexicalErrorKind::UnexpectedChar(slice.chars().next().unwrap_or('\0'))
                };
                return Err(LexicalError { kind, span });
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test helper: lex source and panic on any error.
    fn lex(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("lexing failed")
            .into_iter()
            .map(|(tok, _)| tok)
            .collect()
    }

    /// Test helper: create an identifier token.
    fn ident(s: &str) -> Token {
        Token::Ident(Rc::from(s))
    }

    /// Test helper: create a string literal token.
    fn string(s: &str) -> Token {
        Token::Str(Rc::from(s))
    }

    #[test]
    fn test_keywords() {
        let tokens = lex("law target end_law end_target at");
        assert_eq!(
            tokens,
            vec![
                Token::Law,
                Token::Target,
                Token::EndLaw,
                Token::EndTarget,
                Token::At,
            ]
        );
    }

    #[test]
    fn test_block_keywords() {
        let tokens = lex("start_date period key dictionnary Event GROUP");
        assert_eq!(
            tokens,
            vec![
                Token::StartDate,
                Token::Period,
                Token::Key,
                Token::Dictionnary,
                Token::Event,
                Token::Group,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        // `lawful` must not lex as `law` + `ful`
        let tokens = lex("lawful targets Events");
        assert_eq!(
            tokens,
            vec![ident("lawful"), ident("targets"), ident("Events")]
        );
    }

    #[test]
    fn test_punctuation() {
        let tokens = lex(": ^ - ( ) [ ]");
        assert_eq!(
            tokens,
            vec![
                Token::Colon,
                Token::Caret,
                Token::Dash,
                Token::LParen,
                Token::RParen,
                Token::LBracket,
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_date_and_time() {
        let tokens = lex("2024-01-01 10:00 23:59:59");
        assert_eq!(
            tokens,
            vec![
                Token::Date(Rc::from("2024-01-01")),
                Token::Time(Rc::from("10:00")),
                Token::Time(Rc::from("23:59:59")),
            ]
        );
    }

    #[test]
    fn test_numbers_and_points() {
        let tokens = lex("30 1.0 0.1.30");
        assert_eq!(
            tokens,
            vec![
                Token::Number(30),
                Token::DottedNumber(Rc::from("1.0")),
                Token::DottedNumber(Rc::from("0.1.30")),
            ]
        );
    }

    #[test]
    fn test_strings() {
        let tokens = lex(r#""hello" "with \"quotes\"" "back\slash""#);
        assert_eq!(
            tokens,
            vec![
                string("hello"),
                string("with \"quotes\""),
                string("back\\slash"),
            ]
        );
    }

    #[test]
    fn test_hash_comments() {
        let tokens = lex("law # this is a comment\nname");
        assert_eq!(tokens, vec![Token::Law, ident("name")]);
    }

    #[test]
    fn test_group_expression() {
        let tokens = lex("GROUP:(A 30^15 - B 15^0)");
        assert_eq!(
            tokens,
            vec![
                Token::Group,
                Token::Colon,
                Token::LParen,
                ident("A"),
                Token::Number(30),
                Token::Caret,
                Token::Number(15),
                Token::Dash,
                ident("B"),
                Token::Number(15),
                Token::Caret,
                Token::Number(0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_start_date_line() {
        let tokens = lex("start_date:2024-01-01 at 10:00");
        assert_eq!(
            tokens,
            vec![
                Token::StartDate,
                Token::Colon,
                Token::Date(Rc::from("2024-01-01")),
                Token::At,
                Token::Time(Rc::from("10:00")),
            ]
        );
    }

    #[test]
    fn test_tagged_event_declaration() {
        let tokens = lex(r#"A[ev1]:"First event""#);
        assert_eq!(
            tokens,
            vec![
                ident("A"),
                Token::LBracket,
                ident("ev1"),
                Token::RBracket,
                Token::Colon,
                string("First event"),
            ]
        );
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let tokens = tokenize("law x").unwrap();
        assert_eq!(tokens[0].1, 0..3);
        assert_eq!(tokens[1].1, 4..5);
    }

    #[test]
    fn test_unexpected_char() {
        let err = tokenize("law @ x").unwrap_err();
        assert_eq!(err.kind, LexicalErrorKind::UnexpectedChar('@'));
        assert_eq!(err.span, 4..5);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(r#"key:"never closed"#).unwrap_err();
        assert_eq!(err.kind, LexicalErrorKind::UnterminatedString);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \n\t # only a comment").unwrap().is_empty());
    }
}
