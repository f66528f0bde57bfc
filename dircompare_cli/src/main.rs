use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::{Parser, ValueEnum};
use dircompare_common::{
    config_path, load_config, AppConfig, ComparisonResult, DirCompareError, ReadErrorPolicy,
};
use dircompare_core::{validate_arguments, validate_directories, DirectoryDiffEngine};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dircompare")]
#[command(author = "DirCompare Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Compare the top-level files of two directories by name and content", long_about = None)]
struct Cli {
    /// The two directories to compare
    #[arg(
        value_name = "DIR",
        value_parser = OsStringValueParser::new().map(PathBuf::from)
    )]
    dirs: Vec<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Chunk size in bytes for content comparison
    #[arg(long, value_name = "BYTES")]
    buffer_size: Option<usize>,

    /// What to do when a file cannot be read during comparison
    #[arg(long, value_enum)]
    on_read_error: Option<ReadErrorArg>,

    /// Compare file pairs in parallel
    #[arg(long)]
    parallel: bool,

    /// Use a config file next to the executable
    #[arg(long)]
    portable: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReadErrorArg {
    Abort,
    TreatAsDifferent,
}

impl From<ReadErrorArg> for ReadErrorPolicy {
    fn from(arg: ReadErrorArg) -> Self {
        match arg {
            ReadErrorArg::Abort => ReadErrorPolicy::Abort,
            ReadErrorArg::TreatAsDifferent => ReadErrorPolicy::TreatAsDifferent,
        }
    }
}

fn main() {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        if !e.is_invalid_input() {
            error!("Comparison failed: {}", e);
        }
        println!("{}", failure_message(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), DirCompareError> {
    let (first, second) = validate_arguments(&cli.dirs)?;
    validate_directories(first, second)?;

    let path = config_path(cli.portable)?;
    debug!("Reading settings from {}", path.display());
    let config = merge_config(load_config(&path)?, &cli);

    let engine = DirectoryDiffEngine::from_config(&config);
    let report = render_report(&engine, first, second, cli.json)?;
    println!("{report}");

    Ok(())
}

fn render_report(
    engine: &DirectoryDiffEngine,
    first: &Path,
    second: &Path,
    json: bool,
) -> Result<String, DirCompareError> {
    let result = engine.compare(first, second)?;

    if json {
        let report = build_json_report(first, second, &result);
        serde_json::to_string_pretty(&report)
            .map_err(|e| DirCompareError::Serialization(e.to_string()))
    } else {
        Ok(result.to_string())
    }
}

/// The one line printed to stdout when a run fails
fn failure_message(err: &DirCompareError) -> String {
    match err {
        DirCompareError::InvalidInput(message) => message.clone(),
        DirCompareError::Io(inner) => format!("Failed to compare files: {inner}"),
        other => format!("Error: {other}"),
    }
}

/// Command-line flags take precedence over the config file
fn merge_config(mut config: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(buffer_size) = cli.buffer_size {
        config.buffer_size = buffer_size;
    }
    if let Some(policy) = cli.on_read_error {
        config.read_error_policy = policy.into();
    }
    if cli.parallel {
        config.parallel = true;
    }
    config
}

#[derive(Serialize)]
struct JsonReport<'a> {
    left: String,
    right: String,
    summary: JsonSummary,
    #[serde(flatten)]
    result: &'a ComparisonResult,
}

#[derive(Serialize)]
struct JsonSummary {
    matching: usize,
    different: usize,
}

fn build_json_report<'a>(left: &Path, right: &Path, result: &'a ComparisonResult) -> JsonReport<'a> {
    JsonReport {
        left: left.to_string_lossy().to_string(),
        right: right.to_string_lossy().to_string(),
        summary: JsonSummary {
            matching: result.matching().len(),
            different: result.different().len(),
        },
        result,
    }
}
