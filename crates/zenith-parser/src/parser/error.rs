//! Parse error types.

use std::fmt;
use zenith_ast::foundation::span::Span;
use zenith_ast::{Diagnostic, DiagnosticKind};
use zenith_lexer::{LexicalError, LexicalErrorKind, Token};

/// Parse error with source location and context.
///
/// The parser aborts on the first error; this type carries everything the
/// driver needs to render one diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Kind of parse error
    pub kind: ParseErrorKind,
    /// Source location where the error occurred
    pub span: Span,
    /// Human-readable error message
    pub message: String,
}

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The scanner rejected a character or an unterminated string.
    Lexical,
    /// A specific token was expected but a different one was found.
    UnexpectedToken,
    /// End of input reached while a construct was incomplete.
    UnexpectedEof,
    /// A date or time literal outside calendar ranges.
    InvalidDate,
    /// A literal lexed fine but failed value validation (malformed point,
    /// duplicate declaration within one block).
    InvalidLiteral,
    /// A configured resource limit was exceeded.
    LimitExceeded,
}

impl ParseError {
    /// Wrap a lexical error.
    pub fn lexical(error: LexicalError, file_id: u16) -> Self {
        let message = match &error.kind {
            LexicalErrorKind::UnterminatedString => "unterminated string literal".to_string(),
            LexicalErrorKind::UnexpectedChar(c) => format!("unexpected character '{}'", c),
        };
        Self {
            kind: ParseErrorKind::Lexical,
            span: Span::new(file_id, error.span.start as u32, error.span.end as u32),
            message,
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(expected: &Token, found: Option<&Token>, span: Span) -> Self {
        let message = match found {
            Some(token) => format!("expected '{}', found '{}'", expected, token),
            None => format!("expected '{}', found end of input", expected),
        };
        Self {
            kind: if found.is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::UnexpectedToken
            },
            span,
            message,
        }
    }

    /// Create an "unexpected token" error with an expectation description.
    pub fn unexpected_token(found: Option<&Token>, context: &str, span: Span) -> Self {
        let message = match found {
            Some(token) => format!("unexpected '{}', expected {}", token, context),
            None => format!("unexpected end of input, expected {}", context),
        };
        Self {
            kind: if found.is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::UnexpectedToken
            },
            span,
            message,
        }
    }

    /// Create an invalid-literal error.
    pub fn invalid_literal(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidLiteral,
            span,
            message: message.into(),
        }
    }

    /// Create an invalid date/time error.
    pub fn invalid_date(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidDate,
            span,
            message: message.into(),
        }
    }

    /// Create a resource-limit error.
    pub fn limit(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::LimitExceeded,
            span,
            message: message.into(),
        }
    }

    /// Convert to a diagnostic for formatting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let kind = match self.kind {
            ParseErrorKind::Lexical => DiagnosticKind::Lexical,
            ParseErrorKind::UnexpectedToken
            | ParseErrorKind::UnexpectedEof
            | ParseErrorKind::InvalidLiteral => DiagnosticKind::Syntax,
            ParseErrorKind::InvalidDate => DiagnosticKind::InvalidDate,
            ParseErrorKind::LimitExceeded => DiagnosticKind::ResourceLimit,
        };
        Diagnostic::error(kind, self.span, self.message.clone())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}
