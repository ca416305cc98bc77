//! Structural validation.
//!
//! Validation never aborts early: all findings over the whole corpus are
//! accumulated and returned in traversal order. Strict mode promotes
//! warnings to errors.

use crate::corpus::{resolve_tag, Corpus};
use std::collections::HashSet;
use zenith_ast::{Diagnostic, DiagnosticKind, Law, Node, Severity, Target};

/// Validation knobs.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Promote warnings to errors
    pub strict: bool,
}

/// Validate a corpus, returning every diagnostic found.
pub fn validate(corpus: &Corpus, options: &ValidateOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen_laws: HashSet<&str> = HashSet::new();
    let mut seen_targets: HashSet<&str> = HashSet::new();
    let mut chain: Vec<&Target> = Vec::new();

    fn visit<'a>(
        nodes: &'a [Node],
        chain: &mut Vec<&'a Target>,
        seen_laws: &mut HashSet<&'a str>,
        seen_targets: &mut HashSet<&'a str>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for node in nodes {
            match node {
                Node::Law(law) => {
                    if !seen_laws.insert(&law.name) {
                        diagnostics.push(Diagnostic::error(
                            DiagnosticKind::DuplicateName,
                            law.span,
                            format!("law '{}' is already declared", law.name),
                        ));
                    }
                    validate_law(law, chain, diagnostics);
                }
                Node::Target(target) => {
                    if !seen_targets.insert(&target.name) {
                        diagnostics.push(Diagnostic::error(
                            DiagnosticKind::DuplicateName,
                            target.span,
                            format!("target '{}' is already declared", target.name),
                        ));
                    }
                    validate_dictionary(target, chain, diagnostics);
                    chain.push(target);
                    visit(&target.children, chain, seen_laws, seen_targets, diagnostics);
                    chain.pop();
                }
            }
        }
    }

    visit(
        &corpus.ast().roots,
        &mut chain,
        &mut seen_laws,
        &mut seen_targets,
        &mut diagnostics,
    );

    if options.strict {
        for diagnostic in &mut diagnostics {
            diagnostic.severity = Severity::Error;
        }
    }
    diagnostics
}

fn validate_law(law: &Law, chain: &[&Target], diagnostics: &mut Vec<Diagnostic>) {
    if law.period.minutes() <= 0 {
        diagnostics.push(Diagnostic::error(
            DiagnosticKind::InvalidPeriod,
            law.span,
            format!(
                "law '{}' has a non-positive period of {} minutes",
                law.name,
                law.period.minutes()
            ),
        ));
    }

    for term in &law.group {
        if !law.events.contains_key(&term.event_ref) {
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::UnknownEventRef,
                term.span,
                format!(
                    "group of law '{}' references event '{}' which is not declared in its Event block",
                    law.name, term.event_ref
                ),
            ));
        }
    }

    for event in law.events.values() {
        if let Some(tag) = event.tag.as_deref() {
            if resolve_tag(chain, tag).is_none() {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::UnresolvedTag,
                    event.span,
                    format!(
                        "event '{}' of law '{}' is tagged [{}], which resolves to no ancestor dictionary entry",
                        event.name, law.name, tag
                    ),
                ));
            }
        }
    }

    let group_total = law.group_duration_minutes();
    if group_total != law.period.minutes() {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticKind::PeriodMismatch,
                law.span,
                format!(
                    "group durations of law '{}' sum to {} minutes but the declared period is {} minutes",
                    law.name,
                    group_total,
                    law.period.minutes()
                ),
            ),
        );
    }
}

fn validate_dictionary(target: &Target, chain: &[&Target], diagnostics: &mut Vec<Diagnostic>) {
    for entry in target.dictionary.values() {
        if let Some(parent_key) = entry.parent_ref.as_deref() {
            if resolve_tag(chain, parent_key).is_none() {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::UnresolvedParentRef,
                    entry.span,
                    format!(
                        "dictionary entry '{}' of target '{}' references [{}], which resolves to no ancestor dictionary entry",
                        entry.local_key, target.name, parent_key
                    ),
                ));
            }
        }
    }
}
