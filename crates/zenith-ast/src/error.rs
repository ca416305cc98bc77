//! Structured diagnostics.
//!
//! # Design
//!
//! - `Diagnostic` — one finding with a kind, severity, span, and message
//! - `DiagnosticKind` — categorizes findings by pipeline stage
//! - `DiagnosticFormatter` — renders diagnostics with source snippets
//!
//! The parser aborts on its first diagnostic; validation accumulates all of
//! them; simulation records per-law diagnostics without stopping the batch.

use crate::foundation::span::{SourceMap, Span};
use std::fmt;

/// A single finding with source location and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category of this finding
    pub kind: DiagnosticKind,
    /// Severity level
    pub severity: Severity,
    /// Primary source location
    pub span: Span,
    /// Human-readable message
    pub message: String,
    /// Additional notes or hints
    pub notes: Vec<String>,
}

/// Category of diagnostic, by origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Offending character or unterminated string (lexer)
    Lexical,
    /// Grammar violation (parser)
    Syntax,
    /// Invalid calendar date or time literal
    InvalidDate,
    /// Duplicate law or target name
    DuplicateName,
    /// `GROUP` references an event not declared in the law
    UnknownEventRef,
    /// Event tag that resolves to no ancestor dictionary entry
    UnresolvedTag,
    /// Dictionary `parent_ref` that resolves to no ancestor entry
    UnresolvedParentRef,
    /// Sum of group durations differs from the declared period
    PeriodMismatch,
    /// Non-positive period
    InvalidPeriod,
    /// Per-law simulation failure
    Semantic,
    /// Arithmetic failure inside a metric
    Numeric,
    /// Configured limit exceeded (token count, depth, sequence length)
    ResourceLimit,
}

impl DiagnosticKind {
    /// Human-readable name for this kind.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::Lexical => "lexical error",
            DiagnosticKind::Syntax => "syntax error",
            DiagnosticKind::InvalidDate => "invalid date/time",
            DiagnosticKind::DuplicateName => "duplicate name",
            DiagnosticKind::UnknownEventRef => "unknown event reference",
            DiagnosticKind::UnresolvedTag => "unresolved tag",
            DiagnosticKind::UnresolvedParentRef => "unresolved parent reference",
            DiagnosticKind::PeriodMismatch => "period mismatch",
            DiagnosticKind::InvalidPeriod => "invalid period",
            DiagnosticKind::Semantic => "semantic error",
            DiagnosticKind::Numeric => "numeric error",
            DiagnosticKind::ResourceLimit => "resource limit",
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Suspicious but valid; promoted to `Error` in strict mode
    Warning,
    /// The corpus cannot be used as written
    Error,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            span,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            span,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    /// Add a note or hint (chainable).
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// True if any diagnostic in the slice is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error)
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.kind.name(), self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// Formats diagnostics with source context.
///
/// Produces the location line, the source line, and a caret underline:
///
/// ```text
/// error: duplicate name: law 'm' is already declared
///   --> corpus.zenith:7:5
///    |
///  7 | law m:
///    | ^^^^^
/// ```
pub struct DiagnosticFormatter<'a> {
    sources: &'a SourceMap,
}

impl<'a> DiagnosticFormatter<'a> {
    /// Create a formatter over a source map.
    pub fn new(sources: &'a SourceMap) -> Self {
        Self { sources }
    }

    /// Format one diagnostic as a string with source context.
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", diagnostic));

        let file_path = self.sources.file_path(&diagnostic.span);
        let (line, col) = self.sources.line_col(&diagnostic.span);
        output.push_str(&format!("  --> {}:{}:{}\n", file_path.display(), line, col));

        let file = self.sources.file(&diagnostic.span);
        if let Some(source_line) = file.line_text(line) {
            output.push_str("   |\n");
            output.push_str(&format!("{:3} | {}\n", line, source_line));

            let start_col = col as usize;
            let span_len = (diagnostic.span.end - diagnostic.span.start) as usize;
            let end_col = (start_col + span_len).min(source_line.len() + 1);
            let underline = " ".repeat(start_col.saturating_sub(1))
                + &"^".repeat(end_col.saturating_sub(start_col).max(1));
            output.push_str(&format!("   | {}\n", underline));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("   = note: {}\n", note));
        }

        output
    }

    /// Format multiple diagnostics separated by blank lines.
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| self.format(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_sources() -> SourceMap {
        let mut sources = SourceMap::new();
        sources.add_file(
            PathBuf::from("test.zenith"),
            "law alpha:\nlaw alpha:".to_string(),
        );
        sources
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(
            DiagnosticKind::DuplicateName,
            Span::new(0, 15, 20),
            "law 'alpha' is already declared",
        );
        let text = diag.to_string();
        assert!(text.contains("error"));
        assert!(text.contains("duplicate name"));
        assert!(text.contains("alpha"));
    }

    #[test]
    fn test_has_errors() {
        let warning = Diagnostic::warning(DiagnosticKind::PeriodMismatch, Span::zero(0), "w");
        let error = Diagnostic::error(DiagnosticKind::InvalidPeriod, Span::zero(0), "e");
        assert!(!has_errors(&[warning.clone()]));
        assert!(has_errors(&[warning, error]));
    }

    #[test]
    fn test_formatter_snippet_and_underline() {
        let sources = test_sources();
        let diag = Diagnostic::error(
            DiagnosticKind::DuplicateName,
            Span::new(0, 11, 20),
            "law 'alpha' is already declared",
        )
        .with_note("first declared on line 1");

        let formatted = DiagnosticFormatter::new(&sources).format(&diag);
        assert!(formatted.contains("test.zenith:2:1"));
        assert!(formatted.contains("law alpha:"));
        assert!(formatted.contains("^^^^^"));
        assert!(formatted.contains("note: first declared on line 1"));
    }
}
