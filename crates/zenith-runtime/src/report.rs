//! Law, population, and corpus reports.
//!
//! Reports are serializable summaries assembled from simulations; a per-law
//! simulation failure is recorded and the rest of the batch continues.

use crate::error::Result;
use crate::simulate::SimulatedEvent;
use indexmap::IndexMap;
use serde::Serialize;
use zenith_ast::foundation::time::{self, minutes_between};
use zenith_resolve::Corpus;

/// Per-event totals within one law's simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventAggregate {
    pub name: String,
    pub count: usize,
    pub total_coherence_minutes: i64,
    pub total_dispersal_minutes: i64,
    pub mean_coherence_minutes: i64,
    pub mean_dispersal_minutes: i64,
}

/// Spacing between consecutive occurrences of the same event name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurrenceSpacing {
    pub name: String,
    pub mean_spacing_minutes: i64,
    pub spacing_count: usize,
}

/// Full description of one simulated law.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LawReport {
    pub name: String,
    pub target_chain: Vec<String>,
    pub start_datetime: String,
    /// Start shifted by the larger of the period and the simulated total
    pub end_datetime: String,
    pub period_minutes: i64,
    pub total_duration_minutes: i64,
    pub coherence_total_minutes: i64,
    pub dispersal_total_minutes: i64,
    pub event_count: usize,
    pub unique_event_count: usize,
    pub simulation: Vec<SimulatedEvent>,
    pub event_aggregates: Vec<EventAggregate>,
    pub recurrence: Vec<RecurrenceSpacing>,
}

/// A law whose simulation failed inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LawFailure {
    pub law_name: String,
    pub error: String,
}

/// Per-event statistics across a population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationEventStat {
    pub name: String,
    pub count: usize,
    pub total_duration_minutes: i64,
    pub mean_duration_minutes: i64,
    pub law_count: usize,
    pub laws: Vec<String>,
}

/// Aggregated description of all laws visible at a population level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationReport {
    pub population_level: i64,
    pub law_count: usize,
    pub valid_law_count: usize,
    pub total_events: usize,
    pub total_duration_minutes: i64,
    pub reports: Vec<LawReport>,
    pub failures: Vec<LawFailure>,
    pub event_statistics: Vec<PopulationEventStat>,
}

/// Corpus-level counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusOverview {
    pub law_count: usize,
    pub target_count: usize,
    pub total_events: usize,
    pub total_duration_minutes: i64,
    pub max_generation: u32,
}

/// Assemble a law report from its simulation.
pub fn law_report(corpus: &Corpus, name: &str, events: &[SimulatedEvent]) -> Result<LawReport> {
    let law = corpus
        .law(name)
        .ok_or_else(|| crate::error::Error::LawNotFound(name.to_string()))?;
    let info = corpus
        .law_info(name)
        .ok_or_else(|| crate::error::Error::LawNotFound(name.to_string()))?;

    let total: i64 = events.iter().map(|e| e.duration_minutes).sum();
    let coherence: i64 = events.iter().map(|e| e.coherence_minutes).sum();
    let dispersal: i64 = events.iter().map(|e| e.dispersal_minutes).sum();

    let start = law.start_datetime();
    let end = time::add_minutes(start, total.max(law.period.minutes())).map_err(|e| {
        crate::error::Error::Numeric {
            law: name.to_string(),
            message: e.to_string(),
        }
    })?;

    let aggregates = event_aggregates(events);
    Ok(LawReport {
        name: name.to_string(),
        target_chain: info.target_chain.clone(),
        start_datetime: time::format_datetime(start),
        end_datetime: time::format_datetime(end),
        period_minutes: law.period.minutes(),
        total_duration_minutes: total,
        coherence_total_minutes: coherence,
        dispersal_total_minutes: dispersal,
        event_count: events.len(),
        unique_event_count: aggregates.len(),
        simulation: events.to_vec(),
        event_aggregates: aggregates,
        recurrence: recurrence_spacings(events),
    })
}

fn event_aggregates(events: &[SimulatedEvent]) -> Vec<EventAggregate> {
    let mut totals: IndexMap<&str, (usize, i64, i64)> = IndexMap::new();
    for event in events {
        let entry = totals.entry(event.event_name.as_str()).or_insert((0, 0, 0));
        entry.0 += 1;
        entry.1 += event.coherence_minutes;
        entry.2 += event.dispersal_minutes;
    }
    totals
        .into_iter()
        .map(|(name, (count, coherence, dispersal))| EventAggregate {
            name: name.to_string(),
            count,
            total_coherence_minutes: coherence,
            total_dispersal_minutes: dispersal,
            mean_coherence_minutes: coherence / count as i64,
            mean_dispersal_minutes: dispersal / count as i64,
        })
        .collect()
}

fn recurrence_spacings(events: &[SimulatedEvent]) -> Vec<RecurrenceSpacing> {
    let mut positions: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (index, event) in events.iter().enumerate() {
        positions
            .entry(event.event_name.as_str())
            .or_default()
            .push(index);
    }

    positions
        .into_iter()
        .filter(|(_, occurrences)| occurrences.len() > 1)
        .map(|(name, occurrences)| {
            let spacings: Vec<i64> = occurrences
                .windows(2)
                .map(|pair| minutes_between(events[pair[0]].start, events[pair[1]].start))
                .collect();
            RecurrenceSpacing {
                name: name.to_string(),
                mean_spacing_minutes: spacings.iter().sum::<i64>() / spacings.len() as i64,
                spacing_count: spacings.len(),
            }
        })
        .collect()
}

/// Corpus-level counts over all per-law simulations.
pub fn corpus_overview(
    corpus: &Corpus,
    simulations: &IndexMap<String, Result<Vec<SimulatedEvent>>>,
) -> CorpusOverview {
    let mut total_events = 0;
    let mut total_duration = 0;
    for events in simulations.values().flatten() {
        total_events += events.len();
        total_duration += events.iter().map(|e| e.duration_minutes).sum::<i64>();
    }
    CorpusOverview {
        law_count: corpus.law_names().count(),
        target_count: corpus.target_names().count(),
        total_events,
        total_duration_minutes: total_duration,
        max_generation: corpus.max_generation(),
    }
}

/// Per-event statistics across a set of law simulations.
pub fn population_event_stats(reports: &[LawReport]) -> Vec<PopulationEventStat> {
    let mut stats: IndexMap<&str, (usize, i64, Vec<&str>)> = IndexMap::new();
    for report in reports {
        for event in &report.simulation {
            let entry = stats
                .entry(event.event_name.as_str())
                .or_insert((0, 0, Vec::new()));
            entry.0 += 1;
            entry.1 += event.duration_minutes;
            if !entry.2.contains(&report.name.as_str()) {
                entry.2.push(report.name.as_str());
            }
        }
    }
    stats
        .into_iter()
        .map(|(name, (count, duration, laws))| PopulationEventStat {
            name: name.to_string(),
            count,
            total_duration_minutes: duration,
            mean_duration_minutes: if count > 0 {
                duration / count as i64
            } else {
                0
            },
            law_count: laws.len(),
            laws: laws.into_iter().map(str::to_string).collect(),
        })
        .collect()
}
