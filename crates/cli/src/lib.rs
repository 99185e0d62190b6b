use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use codeqa_code_chunker::{Chunker, ChunkingStrategy};
use codeqa_review::{AnalysisClient, Analyzer, FileReport};
use settings::{ChunkPreset, ChunkerOverrides, FileConfig, ModelOverrides};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod paths;
mod report;
mod settings;

pub use paths::expand_paths;
pub use report::render_text_report;

/// Exit status when `--strict` finds a failing file
pub const EXIT_STRICT_FAILURE: u8 = 1;
/// Exit status for unusable configuration or arguments
pub const EXIT_CONFIG_ERROR: u8 = 2;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "codeqa")]
#[command(about = "Model-assisted quality review for Python and SQL", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze files and directories
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Files or directories to analyze
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Print reports as a JSON array
    #[arg(long)]
    json: bool,

    /// Settings file (defaults to ./codeqa.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model id (overrides GEMINI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature (overrides TEMPERATURE)
    #[arg(long)]
    temperature: Option<f32>,

    /// Max output tokens per request (overrides MAX_TOKENS)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Per-request timeout in seconds, 0 for none
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Files estimated above this many tokens are chunked
    #[arg(long)]
    max_chunk_tokens: Option<usize>,

    /// Chunker preset, in place of the config file's [chunker] section
    #[arg(long, value_enum)]
    preset: Option<ChunkPreset>,

    /// Chunking strategy: semantic|line-count
    #[arg(long)]
    strategy: Option<ChunkingStrategy>,

    /// Exit with status 1 if any file errored or is not production ready
    #[arg(long)]
    strict: bool,
}

pub async fn main_entry() -> Result<ExitCode> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    let Commands::Analyze(args) = &cli.command;
    if args.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Analyze(args) => run_analyze(args).await,
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<ExitCode> {
    let workdir = settings::current_dir()?;
    let file_config = FileConfig::load(args.config.as_deref(), &workdir)?;

    let model_config = settings::resolve_model_config(
        &file_config.model,
        |key| std::env::var(key).ok(),
        &ModelOverrides {
            model: args.model.clone(),
            temperature: args.temperature,
            max_output_tokens: args.max_tokens,
            timeout_secs: args.timeout_secs,
        },
    )?;
    let chunker_config = settings::resolve_chunker_config(
        &file_config.chunker,
        &ChunkerOverrides {
            preset: args.preset,
            strategy: args.strategy,
            max_chunk_tokens: args.max_chunk_tokens,
        },
    );
    log::debug!("Model settings: {model_config:?}");

    let chunker = Chunker::new(chunker_config).context("Invalid chunker settings")?;
    log::debug!("Chunker settings: {:?}", chunker.config());
    let client = AnalysisClient::gemini(model_config).context("Failed to set up model client")?;
    let analyzer = Analyzer::new(client, chunker);

    let files = expand_paths(&args.paths);
    if files.is_empty() {
        log::warn!("No Python or SQL files found");
    }

    let reports = analyzer.analyze_multiple(&files).await;

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&reports)?)?;
    } else {
        print_stdout(render_text_report(&reports).trim_end())?;
    }

    if args.strict && has_failures(&reports) {
        return Ok(ExitCode::from(EXIT_STRICT_FAILURE));
    }
    Ok(ExitCode::SUCCESS)
}

fn has_failures(reports: &[FileReport]) -> bool {
    reports
        .iter()
        .any(|report| report.is_error() || !report.production_ready)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn strict_failure_covers_errors_and_unready_files() {
        let ok = FileReport {
            file_name: "a.py".to_string(),
            issues: vec![],
            summary: "fine".to_string(),
            production_ready: true,
            warnings_count: 0,
            error: None,
            raw_response: None,
        };
        let unready = FileReport {
            production_ready: false,
            ..ok.clone()
        };
        let errored = FileReport::input_error("b.txt", "Unsupported file type: .txt");

        assert!(!has_failures(&[ok.clone()]));
        assert!(has_failures(&[ok.clone(), unready]));
        assert!(has_failures(&[ok, errored]));
        assert!(!has_failures(&[]));
    }

    #[test]
    fn strategy_flag_parses() {
        let cli = Cli::try_parse_from(["codeqa", "analyze", "x.py", "--strategy", "line-count"])
            .unwrap();
        let Commands::Analyze(args) = cli.command;
        assert_eq!(args.strategy, Some(ChunkingStrategy::LineCount));
    }

    #[test]
    fn preset_flag_parses() {
        let cli = Cli::try_parse_from(["codeqa", "analyze", "x.sql", "--preset", "small-models"])
            .unwrap();
        let Commands::Analyze(args) = cli.command;
        assert_eq!(args.preset, Some(ChunkPreset::SmallModels));
        assert!(Cli::try_parse_from(["codeqa", "analyze", "x.sql", "--preset", "huge"]).is_err());
    }
}
