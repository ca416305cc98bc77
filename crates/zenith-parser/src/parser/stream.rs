//! Token stream wrapper for the hand-written parser.

use super::error::ParseError;
use std::ops::Range;
use std::rc::Rc;
use zenith_ast::foundation::span::Span;
use zenith_lexer::Token;

/// Token stream with lookahead and position tracking.
///
/// Each token is paired with its byte span from the source, so error
/// messages point at real locations.
pub struct TokenStream<'src> {
    tokens: &'src [(Token, Range<usize>)],
    pos: usize,
    file_id: u16,
}

impl<'src> TokenStream<'src> {
    /// Create a new token stream over (token, byte span) pairs.
    pub fn new(tokens: &'src [(Token, Range<usize>)], file_id: u16) -> Self {
        Self {
            tokens,
            pos: 0,
            file_id,
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    /// Advance to the next token and return the consumed one.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos).map(|(tok, _)| tok);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check whether the current token matches the expected one by variant.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Expect a specific token and advance past it.
    pub fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if self.check(&expected) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(ParseError::expected_token(
                &expected,
                self.peek(),
                self.current_span(),
            ))
        }
    }

    /// Expect an identifier and return its text.
    pub fn expect_ident(&mut self, context: &str) -> Result<Rc<str>, ParseError> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = Rc::clone(name);
                self.advance();
                Ok(name)
            }
            other => Err(ParseError::unexpected_token(
                other,
                context,
                self.current_span(),
            )),
        }
    }

    /// Expect a string literal and return its content.
    pub fn expect_string(&mut self, context: &str) -> Result<Rc<str>, ParseError> {
        match self.peek() {
            Some(Token::Str(text)) => {
                let text = Rc::clone(text);
                self.advance();
                Ok(text)
            }
            other => Err(ParseError::unexpected_token(
                other,
                context,
                self.current_span(),
            )),
        }
    }

    /// Check if the end of the token stream was reached.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Current position in the token stream.
    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// Span covering `start` (a token position) through the last consumed token.
    pub fn span_from(&self, start: usize) -> Span {
        let start_byte = match self.tokens.get(start) {
            Some((_, span)) => span.start,
            None => return self.current_span(),
        };
        let end_byte = if self.pos > 0 {
            self.tokens
                .get(self.pos - 1)
                .map(|(_, span)| span.end)
                .unwrap_or(start_byte)
        } else {
            start_byte
        };
        Span::new(self.file_id, start_byte as u32, end_byte as u32)
    }

    /// Span of the current token, or a zero-length span at EOF.
    pub fn current_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some((_, span)) => Span::new(self.file_id, span.start as u32, span.end as u32),
            None => match self.tokens.last() {
                Some((_, span)) => Span::new(self.file_id, span.end as u32, span.end as u32),
                None => Span::zero(self.file_id),
            },
        }
    }
}
