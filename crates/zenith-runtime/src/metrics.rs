//! Analytic metrics over simulated event sequences.
//!
//! Every metric is defined on a possibly empty slice and returns 0 for the
//! undefined cases: divisions by zero yield 0, `log2(1)` is 0, and the
//! standard deviation uses the population formula (divide by `n`).

use crate::patterns::{MinedPatterns, MinerOptions};
use crate::simulate::SimulatedEvent;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use zenith_ast::foundation::time::minutes_between;

/// Duration statistics over a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TemporalStatistics {
    pub count: usize,
    pub total_duration_minutes: i64,
    pub mean_duration: f64,
    pub median_duration: f64,
    pub std_duration: f64,
    pub min_duration: i64,
    pub max_duration: i64,
    pub coherence_total_minutes: i64,
    pub dispersal_total_minutes: i64,
    /// `coherence_total / total_duration`, 0 on an empty or zero-length sequence
    pub coherence_ratio: f64,
}

/// Regularity of the spacing between consecutive event starts.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct RhythmMetrics {
    pub mean_gap_minutes: f64,
    pub std_gap_minutes: f64,
    /// `1 / (1 + std_gap / mean_gap)`, clamped to `[0, 1]`; 0 below two events
    pub regularity: f64,
}

/// Events per hour over the simulated span.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DensityMetrics {
    pub span_minutes: i64,
    pub events_per_hour: f64,
}

/// Combined sequence complexity on `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ComplexityMetrics {
    /// Distinct adjacent pairs over `count - 1`
    pub transition_variety: f64,
    /// Distinct event names over `count`
    pub unique_ratio: f64,
    /// Shannon entropy over `log2(distinct_count)`
    pub entropy_normalized: f64,
    /// `100 · (0.4·variety + 0.3·unique + 0.3·entropy)`
    pub score: f64,
}

/// Everything the metrics engine computes for one sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub temporal_statistics: TemporalStatistics,
    pub rhythm: RhythmMetrics,
    pub density: DensityMetrics,
    pub event_frequency: IndexMap<String, usize>,
    pub complexity: ComplexityMetrics,
    pub entropy: f64,
    pub patterns: MinedPatterns,
}

impl MetricsReport {
    /// Compute all metrics over a sequence.
    pub fn compute(events: &[SimulatedEvent], miner: &MinerOptions) -> MetricsReport {
        MetricsReport {
            temporal_statistics: temporal_statistics(events),
            rhythm: rhythm(events),
            density: temporal_density(events),
            event_frequency: event_frequency(events),
            complexity: complexity(events),
            entropy: entropy(events),
            patterns: crate::patterns::mine_patterns(events, miner),
        }
    }
}

/// Duration statistics: count, totals, mean, median, population std, extrema.
pub fn temporal_statistics(events: &[SimulatedEvent]) -> TemporalStatistics {
    if events.is_empty() {
        return TemporalStatistics::default();
    }

    let durations: Vec<i64> = events.iter().map(|e| e.duration_minutes).collect();
    let count = durations.len();
    let total: i64 = durations.iter().sum();
    let mean = total as f64 / count as f64;

    let mut sorted = durations.clone();
    sorted.sort_unstable();
    let median = if count % 2 == 1 {
        sorted[count / 2] as f64
    } else {
        (sorted[count / 2 - 1] + sorted[count / 2]) as f64 / 2.0
    };

    let variance = durations
        .iter()
        .map(|&d| {
            let diff = d as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    let coherence_total: i64 = events.iter().map(|e| e.coherence_minutes).sum();
    let dispersal_total: i64 = events.iter().map(|e| e.dispersal_minutes).sum();

    TemporalStatistics {
        count,
        total_duration_minutes: total,
        mean_duration: mean,
        median_duration: median,
        std_duration: variance.sqrt(),
        min_duration: *sorted.first().unwrap_or(&0),
        max_duration: *sorted.last().unwrap_or(&0),
        coherence_total_minutes: coherence_total,
        dispersal_total_minutes: dispersal_total,
        coherence_ratio: if total != 0 {
            coherence_total as f64 / total as f64
        } else {
            0.0
        },
    }
}

/// Rhythm: mean and population std of gaps between consecutive starts.
pub fn rhythm(events: &[SimulatedEvent]) -> RhythmMetrics {
    if events.len() < 2 {
        return RhythmMetrics::default();
    }

    let gaps: Vec<f64> = events
        .windows(2)
        .map(|pair| minutes_between(pair[0].start, pair[1].start) as f64)
        .collect();
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let variance = gaps.iter().map(|g| (g - mean) * (g - mean)).sum::<f64>() / gaps.len() as f64;
    let std = variance.sqrt();

    let ratio = if mean == 0.0 { 0.0 } else { std / mean.abs() };
    RhythmMetrics {
        mean_gap_minutes: mean,
        std_gap_minutes: std,
        regularity: (1.0 / (1.0 + ratio)).clamp(0.0, 1.0),
    }
}

/// Temporal density: events per hour over `last_end - first_start`.
pub fn temporal_density(events: &[SimulatedEvent]) -> DensityMetrics {
    let (first, last) = match (events.first(), events.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return DensityMetrics::default(),
    };
    let span = minutes_between(first.start, last.end);
    DensityMetrics {
        span_minutes: span,
        events_per_hour: if span > 0 {
            events.len() as f64 / (span as f64 / 60.0)
        } else {
            0.0
        },
    }
}

/// Occurrence count per event name, in first-appearance order.
pub fn event_frequency(events: &[SimulatedEvent]) -> IndexMap<String, usize> {
    let mut frequency = IndexMap::new();
    for event in events {
        *frequency.entry(event.event_name.clone()).or_insert(0) += 1;
    }
    frequency
}

/// Base-2 Shannon entropy of the event-name distribution.
pub fn entropy(events: &[SimulatedEvent]) -> f64 {
    let frequency = event_frequency(events);
    let total = events.len() as f64;
    if total == 0.0 {
        return 0.0;
    }
    frequency
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Combined complexity score on `[0, 100]`.
pub fn complexity(events: &[SimulatedEvent]) -> ComplexityMetrics {
    let count = events.len();
    if count == 0 {
        return ComplexityMetrics::default();
    }

    let distinct: HashSet<&str> = events.iter().map(|e| e.event_name.as_str()).collect();
    let unique_ratio = distinct.len() as f64 / count as f64;

    let transition_variety = if count < 2 {
        0.0
    } else {
        let transitions: HashSet<(&str, &str)> = events
            .windows(2)
            .map(|pair| (pair[0].event_name.as_str(), pair[1].event_name.as_str()))
            .collect();
        transitions.len() as f64 / (count - 1) as f64
    };

    let entropy_normalized = if distinct.len() < 2 {
        0.0
    } else {
        entropy(events) / (distinct.len() as f64).log2()
    };

    let score = 100.0 * (0.4 * transition_variety + 0.3 * unique_ratio + 0.3 * entropy_normalized);
    ComplexityMetrics {
        transition_variety,
        unique_ratio,
        entropy_normalized,
        score: score.clamp(0.0, 100.0),
    }
}
