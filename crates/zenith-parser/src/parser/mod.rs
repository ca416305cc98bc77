//! Parser entry points.

mod decl;
mod error;
mod stream;

pub use error::{ParseError, ParseErrorKind};
use stream::TokenStream;

use std::ops::Range;
use zenith_ast::foundation::span::Span;
use zenith_ast::Ast;
use zenith_lexer::{tokenize, Token};

/// Parser resource limits.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Maximum target nesting depth
    pub max_depth: usize,
    /// Maximum number of tokens accepted from one source
    pub max_tokens: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_tokens: 1 << 20,
        }
    }
}

/// Tokenize and parse source text.
///
/// # Parameters
/// - `source`: Zenith source text
/// - `file_id`: file identifier for span tracking
/// - `options`: resource limits
///
/// # Returns
/// - `Ok(Ast)` if lexing and parsing succeed
/// - `Err(ParseError)` on the first lexical or syntactic error
pub fn parse_source(
    source: &str,
    file_id: u16,
    options: &ParseOptions,
) -> Result<Ast, ParseError> {
    let tokens = tokenize(source).map_err(|e| ParseError::lexical(e, file_id))?;
    parse_tokens(&tokens, file_id, options)
}

/// Parse a pre-tokenized stream.
pub fn parse_tokens(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
    options: &ParseOptions,
) -> Result<Ast, ParseError> {
    if tokens.len() > options.max_tokens {
        return Err(ParseError::limit(
            format!(
                "token count {} exceeds the configured maximum of {}",
                tokens.len(),
                options.max_tokens
            ),
            Span::zero(file_id),
        ));
    }
    let mut stream = TokenStream::new(tokens, file_id);
    decl::parse_corpus(&mut stream, options)
}
