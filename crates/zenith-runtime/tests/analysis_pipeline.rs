// End-to-end tests over the full pipeline: parse → build → validate →
// simulate → analyze.

use zenith_parser::{parse_source, ParseOptions};
use zenith_resolve::{validate, Corpus, ValidateOptions};
use zenith_runtime::{Analysis, Error, MinerOptions};

fn analysis(source: &str) -> Analysis {
    let ast = parse_source(source, 0, &ParseOptions::default()).expect("fixture parses");
    let corpus = Corpus::build(ast);
    let diagnostics = validate(&corpus, &ValidateOptions::default());
    assert!(
        !zenith_ast::error::has_errors(&diagnostics),
        "fixture has validation errors: {:?}",
        diagnostics
    );
    Analysis::new(corpus)
}

const HIERARCHY: &str = r#"
target plan:
    key:"Yearly plan"
    dictionnary:
        deep:"Deep work"
        admin:"Administration"
    target mornings:
        key:"Morning block"
        dictionnary:
            focus[deep]:"Focused session"
        law monday:
            start_date:2025-03-03 at 08:00
            period:2.0
            Event:
                F[focus]:"own focus text"
                M:"mail sweep"
            GROUP:(F 50^10 - M 20^10 - F 25^5)
        end_law
    end_target
    law weekly_review:
        start_date:2025-03-07 at 17:00
        period:1.0
        Event:
            R[admin]:"review"
        GROUP:(R 45^15)
    end_law
end_target
"#;

#[test]
fn test_per_law_simulations_are_cached() {
    let analysis = analysis(HIERARCHY);
    let events = analysis.law_events("monday").unwrap();
    assert_eq!(events.len(), 3);
    // Dictionary inheritance: focus -> deep, so the outermost text wins.
    assert_eq!(events[0].description, "Deep work");
    assert_eq!(events[1].description, "mail sweep");
    assert_eq!(events[0].target_chain, vec!["plan", "mornings"]);
}

#[test]
fn test_target_events_concatenate_in_traversal_order() {
    let analysis = analysis(HIERARCHY);
    let events = analysis.target_events("plan").unwrap();
    // monday (3 events) comes before weekly_review (1 event): traversal
    // order, even though weekly_review starts later in the week.
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].law_name, "monday");
    assert_eq!(events[3].law_name, "weekly_review");
}

#[test]
fn test_population_events() {
    let analysis = analysis(HIERARCHY);
    // Generation 1 holds only weekly_review (direct law of `plan`).
    let level_one = analysis.population_events(1).unwrap();
    assert_eq!(level_one.len(), 1);
    assert_eq!(level_one[0].law_name, "weekly_review");

    let max = analysis.population_events(-1).unwrap();
    assert_eq!(max.len(), 4);

    assert!(analysis.population_events(0).unwrap().is_empty());
    assert!(matches!(
        analysis.population_events(-3).unwrap_err(),
        Error::InvalidPopulation(-3)
    ));
}

#[test]
fn test_law_report_totals() {
    let analysis = analysis(HIERARCHY);
    let report = analysis.law_report("monday").unwrap();
    assert_eq!(report.start_datetime, "2025-03-03 08:00");
    assert_eq!(report.period_minutes, 120);
    assert_eq!(report.total_duration_minutes, 120);
    assert_eq!(report.coherence_total_minutes, 95);
    assert_eq!(report.dispersal_total_minutes, 25);
    assert_eq!(report.end_datetime, "2025-03-03 10:00");
    assert_eq!(report.event_count, 3);
    assert_eq!(report.unique_event_count, 2);

    // F occurs twice: aggregate and recurrence entries exist for it.
    let f = report
        .event_aggregates
        .iter()
        .find(|a| a.name == "F")
        .unwrap();
    assert_eq!(f.count, 2);
    assert_eq!(f.total_coherence_minutes, 75);

    let recurrence = report.recurrence.iter().find(|r| r.name == "F").unwrap();
    assert_eq!(recurrence.spacing_count, 1);
    // F starts at 08:00 and again at 09:30.
    assert_eq!(recurrence.mean_spacing_minutes, 90);
}

#[test]
fn test_population_report_records_failures_and_continues() {
    // `broken` references an undeclared event; `fine` must still report.
    let source = r#"
law broken:
    start_date:2025-01-01 at 00:00
    period:1.0
    Event:
        A:"a"
    GROUP:(A 30^0 - B 30^0)
end_law
law fine:
    start_date:2025-01-01 at 02:00
    period:1.0
    Event:
        A:"a"
    GROUP:(A 1.0^0)
end_law
"#;
    let ast = parse_source(source, 0, &ParseOptions::default()).expect("fixture parses");
    let analysis = Analysis::new(Corpus::build(ast));

    let report = analysis.population_report(0).unwrap();
    assert_eq!(report.law_count, 2);
    assert_eq!(report.valid_law_count, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].law_name, "broken");
    assert!(report.failures[0].error.contains("'B'"));
    assert_eq!(report.reports[0].name, "fine");
}

#[test]
fn test_overview() {
    let analysis = analysis(HIERARCHY);
    let overview = analysis.overview();
    assert_eq!(overview.law_count, 2);
    assert_eq!(overview.target_count, 2);
    assert_eq!(overview.total_events, 4);
    assert_eq!(overview.total_duration_minutes, 180);
    assert_eq!(overview.max_generation, 2);
}

#[test]
fn test_metrics_over_population() {
    let analysis = analysis(HIERARCHY);
    let metrics = analysis
        .population_metrics(-1, &MinerOptions::default())
        .unwrap();
    assert_eq!(metrics.temporal_statistics.count, 4);
    assert_eq!(metrics.temporal_statistics.total_duration_minutes, 180);
    assert!(metrics.entropy >= 0.0);
    assert!((0.0..=100.0).contains(&metrics.complexity.score));
    assert!((0.0..=1.0).contains(&metrics.rhythm.regularity));
    assert_eq!(metrics.event_frequency["F"], 2);
}

#[test]
fn test_pattern_mining_over_repeating_law() {
    let source = r#"
law drill:
    start_date:2025-01-01 at 06:00
    period:4.30
    Event:
        A:"work"
        B:"break"
        C:"close"
    GROUP:(A 45^0 - B 15^0 - A 45^0 - B 15^0 - A 45^0 - B 15^0 - C 1.30^0)
end_law
"#;
    let ast = parse_source(source, 0, &ParseOptions::default()).expect("fixture parses");
    let analysis = Analysis::new(Corpus::build(ast));
    let metrics = analysis
        .law_metrics("drill", &MinerOptions::default())
        .unwrap();

    let top = &metrics.patterns.motifs[0];
    assert_eq!(top.motif, vec!["A", "B"]);
    assert_eq!(top.length, 2);
    assert_eq!(top.frequency, 3);
    assert!(!metrics.patterns.truncated);
}
