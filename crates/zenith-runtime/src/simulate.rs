//! Law simulation.
//!
//! A law's group expression expands into an ordered, contiguous event
//! sequence: the cursor starts at the law's start datetime, each term emits
//! one event spanning its coherence plus dispersal minutes, and the cursor
//! moves to that event's end. Output is a pure function of the law and its
//! enclosing target chain.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use zenith_ast::foundation::time;
use zenith_resolve::Corpus;

/// One concrete, time-stamped occurrence produced by simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedEvent {
    pub event_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Effective description after dictionary inheritance
    pub description: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub start: NaiveDateTime,
    #[serde(serialize_with = "serialize_datetime")]
    pub end: NaiveDateTime,
    /// Always `coherence_minutes + dispersal_minutes`
    pub duration_minutes: i64,
    pub coherence_minutes: i64,
    pub dispersal_minutes: i64,
    pub law_name: String,
    /// Enclosing target names, outermost first
    pub target_chain: Vec<String>,
}

fn serialize_datetime<S: Serializer>(
    datetime: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&time::format_datetime(*datetime))
}

/// Simulate one law into its ordered event sequence.
///
/// Fails per-law: an undeclared event reference or a datetime overflow
/// aborts this law only, and callers running batches record the error and
/// continue.
pub fn simulate_law(corpus: &Corpus, name: &str) -> Result<Vec<SimulatedEvent>> {
    let law = corpus
        .law(name)
        .ok_or_else(|| Error::LawNotFound(name.to_string()))?;
    let info = corpus
        .law_info(name)
        .ok_or_else(|| Error::LawNotFound(name.to_string()))?;

    let mut cursor = law.start_datetime();
    let mut events = Vec::with_capacity(law.group.len());

    for term in &law.group {
        let declaration = law
            .events
            .get(&term.event_ref)
            .ok_or_else(|| Error::UnknownEventRef {
                law: name.to_string(),
                event: term.event_ref.clone(),
            })?;

        let duration = term.duration_minutes();
        let end = time::add_minutes(cursor, duration).map_err(|e| Error::Numeric {
            law: name.to_string(),
            message: e.to_string(),
        })?;

        let description = info
            .descriptions
            .get(&declaration.name)
            .cloned()
            .unwrap_or_else(|| declaration.description.clone());

        events.push(SimulatedEvent {
            event_name: declaration.name.clone(),
            tag: declaration.tag.clone(),
            description,
            start: cursor,
            end,
            duration_minutes: duration,
            coherence_minutes: term.coherence.minutes(),
            dispersal_minutes: term.dispersal.minutes(),
            law_name: name.to_string(),
            target_chain: info.target_chain.clone(),
        });
        cursor = end;
    }

    Ok(events)
}
