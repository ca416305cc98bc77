//! Runtime errors

use thiserror::Error;

/// Runtime result type
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime errors
///
/// A failure is scoped to one law or one query; batch operations record it
/// and continue with the remaining laws.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("law not found: {0}")]
    LawNotFound(String),

    #[error("target not found: {0}")]
    TargetNotFound(String),

    #[error("group of law '{law}' references undeclared event '{event}'")]
    UnknownEventRef { law: String, event: String },

    #[error("population level must be -1 or >= 0, got {0}")]
    InvalidPopulation(i64),

    #[error("numeric error in law '{law}': {message}")]
    Numeric { law: String, message: String },
}

impl From<zenith_resolve::ResolveError> for Error {
    fn from(error: zenith_resolve::ResolveError) -> Self {
        match error {
            zenith_resolve::ResolveError::LawNotFound(name) => Error::LawNotFound(name),
            zenith_resolve::ResolveError::TargetNotFound(name) => Error::TargetNotFound(name),
            zenith_resolve::ResolveError::InvalidPopulation(level) => {
                Error::InvalidPopulation(level)
            }
        }
    }
}
