//! Zenith command-line driver.
//!
//! A thin sequencing layer over the core crates: every subcommand composes
//! the same pipeline stages and formats the result as JSON or text.

mod pipeline;

use clap::{Parser, Subcommand, ValueEnum};
use pipeline::{load_analysis, load_corpus, read_corpus_file, CliError};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zenith_ast::json::{ast_from_json_str, ast_to_json_string};
use zenith_ast::unparse::unparse;
use zenith_parser::{parse_source, ParseOptions};
use zenith_runtime::{Analysis, MetricsReport, MinerOptions};

#[derive(Parser, Debug)]
#[command(name = "zenith")]
#[command(about = "Parse, validate, simulate, and analyze Zenith corpora")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse, validate, and simulate a corpus; emit a JSON report
    Analyze {
        /// Corpus file (.zenith, .zth, or .znth)
        file: PathBuf,
        /// Report a single law
        #[arg(long)]
        law: Option<String>,
        /// Report a single target
        #[arg(long)]
        target: Option<String>,
        /// Report a population level (-1 for the maximum generation)
        #[arg(long)]
        population: Option<i64>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Parse and validate only
    Validate {
        /// Corpus file (.zenith, .zth, or .znth)
        file: PathBuf,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Parse, simulate, and compute metrics
    Metrics {
        /// Corpus file (.zenith, .zth, or .znth)
        file: PathBuf,
        /// Metric family to emit
        #[arg(long = "type", value_enum, default_value = "all")]
        metric_type: MetricType,
        /// Scope to a single law
        #[arg(long)]
        law: Option<String>,
        /// Scope to a single target
        #[arg(long)]
        target: Option<String>,
        /// Scope to a population level (default: maximum generation)
        #[arg(long)]
        population: Option<i64>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Render a JSON AST back to canonical source text
    Unparse {
        /// JSON AST file
        ast: PathBuf,
    },
    /// Convert between Zenith source and the JSON AST
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Input format (inferred from the extension when omitted)
        #[arg(long, value_enum)]
        from: Option<Format>,
        /// Output format (inferred from the extension when omitted)
        #[arg(long, value_enum)]
        to: Option<Format>,
    },
    /// Write a bundle directory with the report and derived artifacts
    Export {
        /// Corpus file (.zenith, .zth, or .znth)
        file: PathBuf,
        /// Output directory
        #[arg(long, default_value = "export")]
        out: PathBuf,
        /// Artifacts to write
        #[arg(long, value_enum, value_delimiter = ',',
              default_values = ["json", "zenith", "events"])]
        formats: Vec<ExportFormat>,
    },
    /// Side-by-side analysis of several corpora
    Compare {
        /// Corpus files
        files: Vec<PathBuf>,
        /// One label per file (defaults to the file stems)
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MetricType {
    All,
    Temporal,
    Rhythm,
    Density,
    Frequency,
    Complexity,
    Entropy,
    Patterns,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Zenith,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    /// The analysis report
    Json,
    /// Canonical source text
    Zenith,
    /// The simulated event list
    Events,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zenith=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli.command) {
        eprintln!("{}", error);
        std::process::exit(error.code());
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Analyze {
            file,
            law,
            target,
            population,
            pretty,
        } => analyze(&file, law, target, population, pretty),
        Command::Validate { file, strict } => validate_only(&file, strict),
        Command::Metrics {
            file,
            metric_type,
            law,
            target,
            population,
            pretty,
        } => metrics(&file, metric_type, law, target, population, pretty),
        Command::Unparse { ast } => unparse_json(&ast),
        Command::Convert {
            input,
            output,
            from,
            to,
        } => convert(&input, &output, from, to),
        Command::Export { file, out, formats } => export(&file, &out, &formats),
        Command::Compare {
            files,
            labels,
            pretty,
        } => compare(&files, &labels, pretty),
    }
}

fn analyze(
    file: &PathBuf,
    law: Option<String>,
    target: Option<String>,
    population: Option<i64>,
    pretty: bool,
) -> Result<(), CliError> {
    let analysis = load_analysis(file, false)?;

    let value = if let Some(name) = law {
        json!({ "law": analysis.law_report(&name)? })
    } else if let Some(name) = target {
        json!({
            "target": analysis.corpus().hierarchy(&name)?,
            "events": analysis.target_events(&name)?,
        })
    } else if let Some(level) = population {
        json!({ "population": analysis.population_report(level)? })
    } else {
        full_report(&analysis)?
    };

    print_json(&value, pretty)
}

fn full_report(analysis: &Analysis) -> Result<serde_json::Value, CliError> {
    let mut laws = Vec::new();
    let mut failures = Vec::new();
    for name in analysis.corpus().law_names() {
        match analysis.law_report(name) {
            Ok(report) => laws.push(serde_json::to_value(report).map_err(to_analysis_error)?),
            Err(error) => failures.push(json!({ "law_name": name, "error": error.to_string() })),
        }
    }

    let mut targets = Vec::new();
    for name in analysis.corpus().target_names() {
        targets.push(
            serde_json::to_value(analysis.corpus().hierarchy(name)?).map_err(to_analysis_error)?,
        );
    }

    Ok(json!({
        "overview": analysis.overview(),
        "laws": laws,
        "failures": failures,
        "targets": targets,
    }))
}

fn validate_only(file: &PathBuf, strict: bool) -> Result<(), CliError> {
    let corpus = load_corpus(file, strict)?;
    info!(
        "{} is valid: {} laws, {} targets",
        file.display(),
        corpus.law_names().count(),
        corpus.target_names().count()
    );
    Ok(())
}

fn metrics(
    file: &PathBuf,
    metric_type: MetricType,
    law: Option<String>,
    target: Option<String>,
    population: Option<i64>,
    pretty: bool,
) -> Result<(), CliError> {
    let analysis = load_analysis(file, false)?;
    let miner = MinerOptions::default();

    let report: MetricsReport = if let Some(name) = law {
        analysis.law_metrics(&name, &miner)?
    } else if let Some(name) = target {
        analysis.target_metrics(&name, &miner)?
    } else {
        analysis.population_metrics(population.unwrap_or(-1), &miner)?
    };

    let value = match metric_type {
        MetricType::All => serde_json::to_value(&report).map_err(to_analysis_error)?,
        MetricType::Temporal => json!({ "temporal_statistics": report.temporal_statistics }),
        MetricType::Rhythm => json!({ "rhythm": report.rhythm }),
        MetricType::Density => json!({ "density": report.density }),
        MetricType::Frequency => json!({ "event_frequency": report.event_frequency }),
        MetricType::Complexity => json!({ "complexity": report.complexity }),
        MetricType::Entropy => json!({ "entropy": report.entropy }),
        MetricType::Patterns => json!({ "patterns": report.patterns }),
    };

    print_json(&value, pretty)
}

fn unparse_json(ast_path: &Path) -> Result<(), CliError> {
    let text = std::fs::read_to_string(ast_path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {}", ast_path.display(), e)))?;
    let ast = ast_from_json_str(&text)
        .map_err(|e| CliError::Parse(format!("invalid JSON AST in {}: {}", ast_path.display(), e)))?;
    print!("{}", unparse(&ast));
    Ok(())
}

fn convert(
    input: &Path,
    output: &Path,
    from: Option<Format>,
    to: Option<Format>,
) -> Result<(), CliError> {
    let from = from
        .or_else(|| infer_format(input))
        .ok_or_else(|| CliError::Usage(format!("cannot infer format of {}", input.display())))?;
    let to = to
        .or_else(|| infer_format(output))
        .ok_or_else(|| CliError::Usage(format!("cannot infer format of {}", output.display())))?;

    let ast = match from {
        Format::Zenith => {
            let text = read_corpus_file(input)?;
            parse_source(&text, 0, &ParseOptions::default())
                .map_err(|e| CliError::Parse(format!("{}: {}", input.display(), e)))?
        }
        Format::Json => {
            let text = std::fs::read_to_string(input)
                .map_err(|e| CliError::Io(format!("cannot read {}: {}", input.display(), e)))?;
            ast_from_json_str(&text)
                .map_err(|e| CliError::Parse(format!("{}: {}", input.display(), e)))?
        }
    };

    let rendered = match to {
        Format::Zenith => unparse(&ast),
        Format::Json => ast_to_json_string(&ast, true)
            .map_err(|e| CliError::Analysis(e.to_string()))?,
    };
    std::fs::write(output, rendered)
        .map_err(|e| CliError::Io(format!("cannot write {}: {}", output.display(), e)))?;
    info!("wrote {}", output.display());
    Ok(())
}

fn infer_format(path: &Path) -> Option<Format> {
    match path.extension()?.to_str()? {
        "zenith" | "zth" | "znth" => Some(Format::Zenith),
        "json" => Some(Format::Json),
        _ => None,
    }
}

fn export(file: &PathBuf, out: &Path, formats: &[ExportFormat]) -> Result<(), CliError> {
    let analysis = load_analysis(file, false)?;
    std::fs::create_dir_all(out)
        .map_err(|e| CliError::Io(format!("cannot create {}: {}", out.display(), e)))?;

    for format in formats {
        let (name, content) = match format {
            ExportFormat::Json => {
                let report = full_report(&analysis)?;
                (
                    "report.json",
                    serde_json::to_string_pretty(&report).map_err(to_analysis_error)?,
                )
            }
            ExportFormat::Zenith => ("corpus.zenith", unparse(analysis.corpus().ast())),
            ExportFormat::Events => {
                let events = analysis.population_events(-1)?;
                (
                    "events.json",
                    serde_json::to_string_pretty(&events).map_err(to_analysis_error)?,
                )
            }
        };
        let path = out.join(name);
        std::fs::write(&path, content)
            .map_err(|e| CliError::Io(format!("cannot write {}: {}", path.display(), e)))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn compare(files: &[PathBuf], labels: &[String], pretty: bool) -> Result<(), CliError> {
    if files.is_empty() {
        return Err(CliError::Usage("compare needs at least one file".to_string()));
    }
    if !labels.is_empty() && labels.len() != files.len() {
        return Err(CliError::Usage(format!(
            "got {} labels for {} files",
            labels.len(),
            files.len()
        )));
    }

    let mut entries = Vec::new();
    for (index, file) in files.iter().enumerate() {
        let label = labels.get(index).cloned().unwrap_or_else(|| {
            file.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string())
        });
        let analysis = load_analysis(file, false)?;
        let metrics = analysis.population_metrics(-1, &MinerOptions::default())?;
        entries.push(json!({
            "label": label,
            "file": file.display().to_string(),
            "overview": analysis.overview(),
            "temporal_statistics": metrics.temporal_statistics,
            "entropy": metrics.entropy,
            "complexity": metrics.complexity,
        }));
    }

    print_json(&serde_json::Value::Array(entries), pretty)
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value).map_err(to_analysis_error)?
    } else {
        serde_json::to_string(value).map_err(to_analysis_error)?
    };
    println!("{}", text);
    Ok(())
}

fn to_analysis_error(error: serde_json::Error) -> CliError {
    CliError::Analysis(error.to_string())
}
