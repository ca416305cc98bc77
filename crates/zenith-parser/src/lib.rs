// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Hand-written recursive descent parser for the Zenith corpus language.
//!
//! ## Architecture
//!
//! - `stream`: token stream wrapper with lookahead
//! - `error`: `ParseError` and conversion to diagnostics
//! - `decl`: law and target declaration parsers
//!
//! The parser is strict and total: the first error aborts with a diagnostic
//! and no partial AST is returned. Resource limits (maximum token count and
//! nesting depth) bound memory on hostile inputs.

mod parser;

pub use parser::{parse_source, parse_tokens, ParseError, ParseErrorKind, ParseOptions};
