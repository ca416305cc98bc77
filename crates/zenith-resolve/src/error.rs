//! Resolution errors.

use thiserror::Error;

/// Lookup or query failure over a built corpus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("law not found: {0}")]
    LawNotFound(String),

    #[error("target not found: {0}")]
    TargetNotFound(String),

    #[error("population level must be -1 or >= 0, got {0}")]
    InvalidPopulation(i64),
}
