//! Build-once analysis snapshot.
//!
//! `Analysis::new` simulates every law of a corpus eagerly; per-law
//! failures are recorded, not fatal. All query methods are pure reads over
//! the snapshot, so a shared reference can safely cross threads.

use crate::error::{Error, Result};
use crate::metrics::MetricsReport;
use crate::patterns::MinerOptions;
use crate::report::{
    self, CorpusOverview, LawFailure, LawReport, PopulationReport,
};
use crate::simulate::{simulate_law, SimulatedEvent};
use indexmap::IndexMap;
use zenith_resolve::Corpus;

/// Immutable snapshot: the corpus plus every per-law simulation.
#[derive(Debug, Clone)]
pub struct Analysis {
    corpus: Corpus,
    simulations: IndexMap<String, Result<Vec<SimulatedEvent>>>,
}

impl Analysis {
    /// Simulate every law once and freeze the results.
    pub fn new(corpus: Corpus) -> Analysis {
        let simulations = corpus
            .law_names()
            .map(|name| (name.to_string(), simulate_law(&corpus, name)))
            .collect();
        Analysis {
            corpus,
            simulations,
        }
    }

    /// The underlying corpus.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// The simulated sequence of one law.
    pub fn law_events(&self, name: &str) -> Result<&[SimulatedEvent]> {
        match self.simulations.get(name) {
            Some(Ok(events)) => Ok(events),
            Some(Err(error)) => Err(error.clone()),
            None => Err(Error::LawNotFound(name.to_string())),
        }
    }

    /// Concatenated simulations of every law under a target, in traversal
    /// order (never re-sorted by start time: the analyst observes the
    /// planned sequence, not a merged timeline).
    pub fn target_events(&self, name: &str) -> Result<Vec<SimulatedEvent>> {
        let laws = self.corpus.laws_for_target(name)?;
        self.concat_events(&laws)
    }

    /// Concatenated simulations of every law visible at a population level,
    /// in traversal order.
    pub fn population_events(&self, population: i64) -> Result<Vec<SimulatedEvent>> {
        let laws = self.corpus.laws_for_population(population)?;
        self.concat_events(&laws)
    }

    fn concat_events(&self, laws: &[String]) -> Result<Vec<SimulatedEvent>> {
        let mut events = Vec::new();
        for law in laws {
            events.extend_from_slice(self.law_events(law)?);
        }
        Ok(events)
    }

    /// Full report for one law.
    pub fn law_report(&self, name: &str) -> Result<LawReport> {
        let events = self.law_events(name)?;
        report::law_report(&self.corpus, name, events)
    }

    /// Aggregated report over a population level. Individual law failures
    /// are collected into `failures`; the batch always completes.
    pub fn population_report(&self, population: i64) -> Result<PopulationReport> {
        let level = match population {
            -1 => self.corpus.max_generation() as i64,
            p => p,
        };
        let laws = self.corpus.laws_for_population(population)?;

        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for law in &laws {
            match self.law_report(law) {
                Ok(report) => reports.push(report),
                Err(error) => failures.push(LawFailure {
                    law_name: law.clone(),
                    error: error.to_string(),
                }),
            }
        }

        let total_events = reports.iter().map(|r| r.event_count).sum();
        let total_duration = reports.iter().map(|r| r.total_duration_minutes).sum();
        let event_statistics = report::population_event_stats(&reports);

        Ok(PopulationReport {
            population_level: level,
            law_count: laws.len(),
            valid_law_count: reports.len(),
            total_events,
            total_duration_minutes: total_duration,
            reports,
            failures,
            event_statistics,
        })
    }

    /// Corpus-level counts.
    pub fn overview(&self) -> CorpusOverview {
        report::corpus_overview(&self.corpus, &self.simulations)
    }

    /// All metrics over one law's sequence.
    pub fn law_metrics(&self, name: &str, miner: &MinerOptions) -> Result<MetricsReport> {
        Ok(MetricsReport::compute(self.law_events(name)?, miner))
    }

    /// All metrics over a target's concatenated sequence.
    pub fn target_metrics(&self, name: &str, miner: &MinerOptions) -> Result<MetricsReport> {
        Ok(MetricsReport::compute(&self.target_events(name)?, miner))
    }

    /// All metrics over a population's concatenated sequence.
    pub fn population_metrics(
        &self,
        population: i64,
        miner: &MinerOptions,
    ) -> Result<MetricsReport> {
        Ok(MetricsReport::compute(
            &self.population_events(population)?,
            miner,
        ))
    }
}
