//! CLI Application logic
//!
//! Contains the command-line interface implementation. Each command
//! returns its rendered output; [`run_cli`] prints it to stdout and keeps
//! logging on stderr.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use scopefold_core::config::CONFIG_FILE_NAME;
use scopefold_core::{
    tokenize_document, Document, FoldingRange, FoldingRangeKind, OutlineEntry, PretokenizedTokenizer,
    RecordedToken, Settings, StaticOutline, StructuralAnalyzer, Token,
};

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "scopefold")]
#[command(author, version, about = "Folding and nesting levels from scope streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the logical nesting level of every token
    Levels {
        /// Document text file
        input: PathBuf,

        /// Recorded token stream (JSON)
        #[arg(short, long)]
        tokens: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Compute folding ranges
    Fold {
        /// Document text file
        input: PathBuf,

        /// Recorded token stream (JSON)
        #[arg(short, long)]
        tokens: PathBuf,

        /// Outline entries (JSON) used for header folding
        #[arg(short, long)]
        outline: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also report markers that could not be paired
        #[arg(long)]
        diagnostics: bool,
    },

    /// Print tokens with assignment symbols merged
    Symbols {
        /// Document text file
        input: PathBuf,

        /// Recorded token stream (JSON)
        #[arg(short, long)]
        tokens: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the default configuration as TOML
    Config,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let output = match cli.command {
        Commands::Levels {
            input,
            tokens,
            config,
            format,
        } => levels_command(&input, &tokens, config.as_deref(), format)?,
        Commands::Fold {
            input,
            tokens,
            outline,
            config,
            format,
            diagnostics,
        } => fold_command(
            &input,
            &tokens,
            outline.as_deref(),
            config.as_deref(),
            format,
            diagnostics,
        )?,
        Commands::Symbols {
            input,
            tokens,
            config,
            format,
        } => symbols_command(&input, &tokens, config.as_deref(), format)?,
        Commands::Config => config_command()?,
    };

    print!("{}", output);
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`)
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// A token with its computed level
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LeveledToken<'a> {
    line: usize,
    start_index: usize,
    end_index: usize,
    text: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    level: i32,
}

/// Execute the levels command
pub fn levels_command(
    input: &Path,
    tokens: &Path,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    let analyzer = load_analyzer(config)?;
    let tokens = load_tokens(input, tokens)?;
    let levels = analyzer.levels(&tokens);

    let leveled: Vec<LeveledToken<'_>> = tokens
        .iter()
        .zip(&levels)
        .map(|(token, level)| LeveledToken {
            line: token.line,
            start_index: token.start_index,
            end_index: token.end_index,
            text: &token.text,
            kind: &token.kind,
            level: *level,
        })
        .collect();

    match format {
        OutputFormat::Json => to_json(&leveled),
        OutputFormat::Text => {
            let mut out = String::new();
            for token in &leveled {
                writeln!(
                    out,
                    "{:>5}:{:<4} {:>3}  {:<24} {}",
                    token.line + 1,
                    token.start_index,
                    token.level,
                    format!("{:?}", token.text),
                    token.kind
                )?;
            }
            Ok(out)
        }
    }
}

/// Execute the fold command
pub fn fold_command(
    input: &Path,
    tokens: &Path,
    outline: Option<&Path>,
    config: Option<&Path>,
    format: OutputFormat,
    diagnostics: bool,
) -> Result<String> {
    let analyzer = load_analyzer(config)?;
    let (document, mut tokenizer) = load_inputs(input, tokens)?;
    let outline = match outline {
        Some(path) => load_outline(path)?,
        None => StaticOutline::default(),
    };

    let report = analyzer
        .analyze(&document, &mut tokenizer, &outline)
        .with_context(|| format!("Failed to analyze {}", input.display()))?
        .folding;
    info!(
        "{} folding ranges, {} unmatched markers",
        report.ranges.len(),
        report.diagnostics.len()
    );

    match format {
        OutputFormat::Json if diagnostics => to_json(&report),
        OutputFormat::Json => to_json(&report.ranges),
        OutputFormat::Text => {
            let mut out = String::new();
            for range in &report.ranges {
                writeln!(out, "{}", describe_range(range))?;
            }
            if diagnostics {
                for marker in &report.diagnostics {
                    writeln!(
                        out,
                        "warning: unmatched {} marker on line {} ({:?})",
                        if marker.is_start { "start" } else { "close" },
                        marker.line + 1,
                        marker.pass
                    )?;
                }
            }
            Ok(out)
        }
    }
}

/// Execute the symbols command
pub fn symbols_command(
    input: &Path,
    tokens: &Path,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<String> {
    let analyzer = load_analyzer(config)?;
    let tokens = load_tokens(input, tokens)?;
    let symbols = analyzer.symbols(&tokens);

    match format {
        OutputFormat::Json => to_json(&symbols),
        OutputFormat::Text => {
            let mut out = String::new();
            for symbol in &symbols {
                writeln!(
                    out,
                    "{:>5}:{:<4} {:<24} {}",
                    symbol.line + 1,
                    symbol.start_index,
                    format!("{:?}", symbol.text),
                    symbol.kind
                )?;
            }
            Ok(out)
        }
    }
}

/// Execute the config command
pub fn config_command() -> Result<String> {
    Settings::default()
        .to_toml_string()
        .context("Failed to render default configuration")
}

/// One-based, human-readable form of a range
fn describe_range(range: &FoldingRange) -> String {
    let kind = match range.kind {
        Some(FoldingRangeKind::Region) => " region",
        Some(FoldingRangeKind::Comment) => " comment",
        Some(FoldingRangeKind::Imports) => " imports",
        None => "",
    };
    format!("{}-{}{}", range.start + 1, range.end + 1, kind)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;
    json.push('\n');
    Ok(json)
}

/// Load settings from a config file, `scopefold.toml` in the current
/// directory, or the defaults, and compile them
fn load_analyzer(config_path: Option<&Path>) -> Result<StructuralAnalyzer> {
    let settings = match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Settings::load(path).with_context(|| format!("Failed to load config: {}", path.display()))?
        }
        None if Path::new(CONFIG_FILE_NAME).exists() => {
            debug!("Using {} from the current directory", CONFIG_FILE_NAME);
            Settings::load(Path::new(CONFIG_FILE_NAME))
                .with_context(|| format!("Failed to load config: {}", CONFIG_FILE_NAME))?
        }
        None => Settings::default(),
    };

    StructuralAnalyzer::from_settings(&settings).context("Invalid selector configuration")
}

/// Read the document text and the token stream recorded for it
fn load_inputs(input: &Path, tokens_path: &Path) -> Result<(Document, PretokenizedTokenizer)> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let content = fs::read_to_string(tokens_path)
        .with_context(|| format!("Failed to read token file: {}", tokens_path.display()))?;
    let records: Vec<RecordedToken> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse token file: {}", tokens_path.display()))?;
    debug!("Loaded {} recorded tokens from {}", records.len(), tokens_path.display());

    let document = Document::from_text(&text);
    if let Some(record) = records.iter().find(|record| record.line >= document.line_count()) {
        anyhow::bail!(
            "Token on line {} is past the end of {} ({} lines)",
            record.line,
            input.display(),
            document.line_count()
        );
    }

    Ok((document, PretokenizedTokenizer::from_records(records)))
}

/// Replay the recorded stream over the document
fn load_tokens(input: &Path, tokens_path: &Path) -> Result<Vec<Token>> {
    let (document, mut tokenizer) = load_inputs(input, tokens_path)?;
    tokenize_document(&document, &mut tokenizer)
        .with_context(|| format!("Failed to tokenize {}", input.display()))
}

fn load_outline(path: &Path) -> Result<StaticOutline> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read outline file: {}", path.display()))?;
    let entries: Vec<OutlineEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse outline file: {}", path.display()))?;
    Ok(StaticOutline::new(entries))
}
