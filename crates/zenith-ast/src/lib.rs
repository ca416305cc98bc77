// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Syntax tree and foundations for the Zenith corpus language.
//!
//! # Design
//!
//! - `foundation` — spans and source maps, point arithmetic, datetime helpers
//! - `ast` — typed nodes (`Law`, `Target`, `EventDecl`, `GroupTerm`, `DictEntry`)
//! - `error` — structured diagnostics with a source-snippet formatter
//! - `unparse` — canonical rendering of an AST back to source text
//! - `json` — the tagged JSON encoding of the AST
//!
//! The AST is a plain owned value: the corpus owns all nodes, derived results
//! (indices, simulations) live in the downstream crates.

pub mod ast;
pub mod error;
pub mod foundation;
pub mod json;
pub mod unparse;

pub use ast::{Ast, DictEntry, EventDecl, GroupTerm, Law, Node, Target};
pub use error::{Diagnostic, DiagnosticFormatter, DiagnosticKind, Severity};
pub use foundation::point::{Point, PointError};
pub use foundation::span::{SourceFile, SourceMap, Span};
