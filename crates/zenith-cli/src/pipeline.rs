//! Corpus loading and pipeline sequencing.
//!
//! The pipeline is a straight-line function composition:
//! raw text → tokens → AST → corpus → validation → analysis. A failure at
//! any stage is terminal for that corpus and maps onto one exit code.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;
use zenith_ast::error::has_errors;
use zenith_ast::{DiagnosticFormatter, SourceMap};
use zenith_parser::{parse_source, ParseOptions};
use zenith_resolve::{validate, Corpus, ValidateOptions};
use zenith_runtime::Analysis;

/// Accepted corpus file extensions.
const EXTENSIONS: [&str; 3] = ["zenith", "zth", "znth"];

/// Driver failure with its process exit code.
///
/// Exit codes: 1 I/O or argument error, 2 parse error, 3 validation error,
/// 4 runtime analysis error.
#[derive(Debug)]
pub enum CliError {
    Io(String),
    Usage(String),
    Parse(String),
    Validation(String),
    Analysis(String),
}

impl CliError {
    /// The process exit code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            CliError::Io(_) | CliError::Usage(_) => 1,
            CliError::Parse(_) => 2,
            CliError::Validation(_) => 3,
            CliError::Analysis(_) => 4,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(message)
            | CliError::Usage(message)
            | CliError::Parse(message)
            | CliError::Validation(message)
            | CliError::Analysis(message) => write!(f, "{}", message),
        }
    }
}

impl From<zenith_runtime::Error> for CliError {
    fn from(error: zenith_runtime::Error) -> Self {
        CliError::Analysis(error.to_string())
    }
}

impl From<zenith_resolve::ResolveError> for CliError {
    fn from(error: zenith_resolve::ResolveError) -> Self {
        CliError::Analysis(error.to_string())
    }
}

/// Read a corpus file: extension check, UTF-8 read, BOM strip.
pub fn read_corpus_file(path: &Path) -> Result<String, CliError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !EXTENSIONS.contains(&extension) {
        return Err(CliError::Usage(format!(
            "unsupported corpus extension '{}' for {} (expected .zenith, .zth, or .znth)",
            extension,
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {}", path.display(), e)))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Run the front half of the pipeline: read, parse, build, validate.
///
/// Warnings are logged; errors (or warnings under `strict`) abort with the
/// matching exit code.
pub fn load_corpus(path: &PathBuf, strict: bool) -> Result<Corpus, CliError> {
    let text = read_corpus_file(path)?;

    let mut sources = SourceMap::new();
    let file_id = sources.add_file(path.clone(), text);
    let source = &sources.file(&zenith_ast::Span::zero(file_id)).source;

    let ast = parse_source(source, file_id, &ParseOptions::default()).map_err(|error| {
        let formatter = DiagnosticFormatter::new(&sources);
        CliError::Parse(formatter.format(&error.to_diagnostic()))
    })?;

    let corpus = Corpus::build(ast);
    let diagnostics = validate(&corpus, &ValidateOptions { strict });
    let formatter = DiagnosticFormatter::new(&sources);
    if has_errors(&diagnostics) {
        return Err(CliError::Validation(formatter.format_all(&diagnostics)));
    }
    for diagnostic in &diagnostics {
        warn!("{}", formatter.format(diagnostic));
    }

    Ok(corpus)
}

/// Run the whole pipeline through the analysis snapshot.
pub fn load_analysis(path: &PathBuf, strict: bool) -> Result<Analysis, CliError> {
    Ok(Analysis::new(load_corpus(path, strict)?))
}
