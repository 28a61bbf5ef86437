//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use xport_core::{ExportOptions, ExportSummary, ProgressReporter};
use xport_shared::{
    AppConfig, ExportConfig, XportError, init_config, init_config_at, load_config,
    load_config_from,
};
use xport_storage::{CorpusStore, WriteOptions};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Top-level command line of the `xport` binary.
#[derive(Parser)]
#[command(
    name = "xport",
    version,
    about = "Extract posts from a raw timeline response and merge them into a JSON corpus.",
    long_about = None,
    args_conflicts_with_subcommands = true,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.xport/xport.toml.
    #[arg(long, global = true, env = "XPORT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub convert: ConvertArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Arguments of the default convert-and-merge run.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Raw timeline response (JSON) to read.
    pub input: Option<PathBuf>,

    /// Corpus file to merge into and rewrite.
    pub output: Option<PathBuf>,

    /// Ignore any existing corpus at OUTPUT and write only this batch.
    #[arg(long)]
    pub fresh: bool,

    /// Write minified JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Subcommands besides the default run.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Report what a raw response contains without writing anything.
    Inspect {
        /// Raw timeline response (JSON) to read.
        input: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = format!("xport={level},xport_core={level},xport_storage={level},xport_shared={level}");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Some(Command::Inspect { input }) => cmd_inspect(&input),
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
        None => cmd_convert(&cli.convert, config_path),
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    })
}

fn cmd_convert(args: &ConvertArgs, config_path: Option<&Path>) -> Result<()> {
    let (Some(input), Some(output)) = (args.input.as_deref(), args.output.as_deref()) else {
        return Err(eyre!("usage: xport <INPUT> <OUTPUT>  (see --help)"));
    };
    ensure_distinct(input, output)?;

    let config = resolve_config(config_path)?;
    let export = ExportConfig::from(&config).with_overrides(args.fresh, args.compact);

    info!(
        input = %input.display(),
        output = %output.display(),
        fresh = export.fresh,
        "converting timeline response"
    );

    let reporter = CliProgress::new();
    reporter.phase("Reading input");
    let document = xport_storage::read_document(input)?;

    let store = CorpusStore::new(output);
    let existing = if export.fresh { None } else { store.load() };

    let outcome = xport_core::export(
        &document,
        existing,
        &ExportOptions {
            fresh: export.fresh,
        },
        &reporter,
    );

    store.save(
        &outcome.corpus,
        WriteOptions {
            pretty: export.pretty,
            atomic: export.atomic,
        },
    )?;

    let summary = &outcome.summary;
    println!();
    println!("  Converted {} records.", summary.extracted);
    println!(
        "  Timeline:  {}",
        summary
            .timeline
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "not recognized".into())
    );
    println!("  Entries:   {}", summary.entries);
    println!("  Added:     {}", summary.merge.added);
    println!("  Skipped:   {}", summary.merge.skipped);
    println!("  Total:     {}", outcome.corpus.count);
    println!("  Output:    {}", output.display());
    println!("  Time:      {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

/// Refuse to overwrite the raw input with the corpus.
fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    let same = match (std::fs::canonicalize(input), std::fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same {
        return Err(XportError::validation(format!(
            "input and output are the same file: {}",
            input.display()
        ))
        .into());
    }
    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<()> {
    let document = xport_storage::read_document(input)?;
    let report = xport_core::inspect(&document);

    match report.timeline {
        Some(kind) => println!("Container:   {kind}"),
        None => println!("Container:   not recognized"),
    }
    println!("Entries:     {}", report.entries);
    println!("Extractable: {}", report.extractable);
    Ok(())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => init_config_at(path)?,
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn entry_processed(&self, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Extracting [{current}/{total}]"));
    }

    fn done(&self, _summary: &ExportSummary) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
