//! Computes delivery metrics from a task-tracker JSON export.
//!
//! Usage:
//!
//! ```text
//! cadence --input export.json --profile productive --team-size 5
//! cadence --input export.json --profile in_development --team-size 4 \
//!     --sprint-map "Sprint 2:Julio,Sprint 3:Agosto" --format json --output report.json
//! ```
//!
//! Configuration is collected once from flags; the computation never
//! prompts.

use cadence::metrics::{
    adapters::{JsonFileTaskSource, JsonReportRenderer, TextReportRenderer},
    domain::{MetricsConfig, MetricsDomainError, SprintMonthMap, TeamProfile, TeamSize},
    ports::{ReportRenderError, ReportRenderer},
    services::{MetricsEngine, MetricsEngineError, MetricsRunError},
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cadence", version, about = "Agile delivery metrics from task-tracker exports")]
struct Cli {
    /// JSON export: an array of rows keyed by column header.
    #[arg(long)]
    input: Utf8PathBuf,

    /// Team profile: productive or in_development.
    #[arg(long, value_parser = parse_profile)]
    profile: TeamProfile,

    /// Number of people on the team.
    #[arg(long, allow_negative_numbers = true)]
    team_size: i64,

    /// Sprint to month mapping, e.g. "Sprint 2:Julio,Sprint 3:Agosto".
    #[arg(long)]
    sprint_map: Option<String>,

    /// Team name shown in the text report.
    #[arg(long)]
    team_name: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report to this file instead of standard output.
    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// Log pipeline stages at debug level.
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Errors that end a command-line run.
#[derive(Debug, Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] MetricsDomainError),
    #[error(transparent)]
    Run(#[from] MetricsRunError),
    #[error("failed to render report: {0}")]
    Render(#[from] ReportRenderError),
    #[error("failed to write report to {path}: {source}")]
    WriteFile {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write report: {0}")]
    Stdout(#[source] io::Error),
}

fn parse_profile(value: &str) -> Result<TeamProfile, MetricsDomainError> {
    value.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "metrics run failed");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let engine = MetricsEngine::new(build_config(cli)?)?;
    debug!(fingerprint = %engine.config().fingerprint(), "configuration accepted");

    let report = engine.run(&JsonFileTaskSource::new(cli.input.clone()))?;
    let rendered = match cli.format {
        OutputFormat::Json => JsonReportRenderer.render(&report)?,
        OutputFormat::Text => {
            let renderer = cli
                .team_name
                .as_deref()
                .map_or_else(TextReportRenderer::new, |name| {
                    TextReportRenderer::new().with_team_name(name)
                });
            renderer.render(&report)?
        }
    };

    match &cli.output {
        Some(path) => {
            write_file(path, &rendered)?;
            info!(path = %path, "report written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{rendered}").map_err(CliError::Stdout)?;
        }
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<MetricsConfig, MetricsDomainError> {
    let team_size = TeamSize::new(cli.team_size)?;
    let sprint_month_map = cli
        .sprint_map
        .as_deref()
        .map(SprintMonthMap::parse)
        .transpose()?
        .unwrap_or_default();
    Ok(MetricsConfig::new(cli.profile, team_size).with_sprint_month_map(sprint_month_map))
}

fn write_file(path: &Utf8Path, contents: &str) -> Result<(), CliError> {
    let to_cli_error = |source: io::Error| CliError::WriteFile {
        path: path.to_path_buf(),
        source,
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| to_cli_error(io::Error::other("output path does not name a file")))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(to_cli_error)?;
    dir.write(file_name, contents).map_err(to_cli_error)
}

impl From<MetricsEngineError> for CliError {
    fn from(err: MetricsEngineError) -> Self {
        Self::Run(MetricsRunError::Engine(err))
    }
}
