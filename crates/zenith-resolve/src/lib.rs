// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Corpus model and resolution for the Zenith corpus language.
//!
//! # What this crate does
//!
//! 1. **Builds indices** — laws and targets by name, target generations,
//!    parent links (name-based, never pointers)
//! 2. **Computes dictionary inheritance** — an ancestor-chain view attached
//!    to each law at build time, so later queries never re-walk the tree
//! 3. **Validates** — accumulates structural diagnostics over the whole
//!    corpus; strict mode promotes warnings to errors
//! 4. **Resolves** — laws visible from a target or a population level, in
//!    traversal order
//!
//! # What this crate does NOT do
//!
//! - No simulation and no metrics (that is `zenith-runtime`)
//! - No mutation: the corpus is an immutable snapshot after `Corpus::build`

mod corpus;
mod error;
mod validate;

pub use corpus::{Corpus, LawInfo, TargetHierarchy, TargetInfo};
pub use error::ResolveError;
pub use validate::{validate, ValidateOptions};
