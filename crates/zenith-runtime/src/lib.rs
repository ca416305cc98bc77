// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Simulation and analysis engine for the Zenith corpus language.
//!
//! # Design
//!
//! - `simulate` — expands a law's group expression into time-stamped events
//! - `metrics` — temporal statistics, rhythm, density, complexity, entropy
//! - `patterns` — suffix-array pattern miner over event-name sequences
//! - `report` — per-law, per-population, and corpus-level reports
//! - `analysis` — build-once immutable snapshot; queries are pure reads
//!
//! Everything here is single-threaded, synchronous, and free of I/O and
//! clock access: results are pure functions of the corpus.

mod analysis;
mod error;
mod metrics;
mod patterns;
mod report;
mod simulate;

pub use analysis::Analysis;
pub use error::{Error, Result};
pub use metrics::{
    complexity, entropy, event_frequency, rhythm, temporal_density, temporal_statistics,
    ComplexityMetrics, DensityMetrics, MetricsReport, RhythmMetrics, TemporalStatistics,
};
pub use patterns::{mine_patterns, MinedPatterns, MinerOptions, Motif};
pub use report::{
    CorpusOverview, EventAggregate, LawFailure, LawReport, PopulationEventStat, PopulationReport,
    RecurrenceSpacing,
};
pub use simulate::{simulate_law, SimulatedEvent};
