mod terminal;

use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::{Args, Parser, Subcommand};
use sort_visualiser_core::{
    Algorithm, AppConfig, DataConfig, DataGenerator, EngineOptions, HighlightRole, SortOrder,
    SortStep,
};
use tracing_subscriber::EnvFilter;

fn main() -> sort_visualiser_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_interactive(args),
        Commands::Trace(args) => run_trace(args),
    }
}

fn run_interactive(args: RunArgs) -> sort_visualiser_core::Result<()> {
    // the interactive view owns the terminal, so only warnings reach stderr
    // unless logs are sent to a file
    let default_directive = if args.log_file.is_some() { "info" } else { "warn" };
    init_tracing(args.log_file.as_deref(), default_directive)?;

    let mut config = match &args.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };
    args.overrides.apply(&mut config);
    config.validate()?;

    tracing::info!(config = ?args.config, len = config.data.len, "starting interactive mode");
    terminal::run(&config)
}

fn run_trace(args: TraceArgs) -> sort_visualiser_core::Result<()> {
    init_tracing(None, "info")?;

    let data = if args.values.is_empty() {
        DataGenerator::new(&DataConfig {
            len: args.size,
            seed: args.seed,
            ..DataConfig::default()
        })
        .generate()
    } else {
        args.values
    };
    let options = EngineOptions {
        order: if args.descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        },
        bubble_early_exit: !args.no_early_exit,
    };

    tracing::info!(algorithm = %args.algorithm, len = data.len(), "tracing sort");
    let mut out = io::stdout().lock();
    for (index, step) in args.algorithm.steps_with(&data, options)?.enumerate() {
        writeln!(out, "{}", format_step(index, &step))?;
    }
    Ok(())
}

/// One line per step: index, values with highlighted entries marked by role,
/// then the caption.
fn format_step(index: usize, step: &SortStep<u32>) -> String {
    let values = step
        .values
        .iter()
        .enumerate()
        .map(|(i, value)| match step.role_of(i) {
            Some(HighlightRole::Compare) => format!("<{value}>"),
            Some(HighlightRole::Swap) => format!("{{{value}}}"),
            Some(HighlightRole::Pivot) => format!("({value})"),
            Some(HighlightRole::Sorted) => format!("|{value}|"),
            None => value.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{index:>5}  [{values}]  sorted={}/{}  {}",
        step.sorted.len(),
        step.len(),
        step.description
    )
}

fn init_tracing(log_file: Option<&Path>, default_directive: &str) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init();
        }
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated sorting algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive terminal view.
    Run(RunArgs),
    /// Print every step of one sort to stdout without opening the view.
    Trace(TraceArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON configuration file; missing fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

/// Command line values that take precedence over the configuration file.
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Number of bars.
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Initial delay between steps, in milliseconds.
    #[arg(short, long)]
    delay: Option<u64>,

    /// Seed for reproducible shuffles.
    #[arg(long)]
    seed: Option<u64>,

    /// Algorithm to start with.
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Sort from largest to smallest.
    #[arg(long)]
    descending: bool,

    /// Disable the audio cue.
    #[arg(long)]
    mute: bool,

    /// Let bubble sort keep passing after a pass without swaps.
    #[arg(long)]
    no_early_exit: bool,
}

impl Overrides {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(size) = self.size {
            config.data.len = size;
        }
        if let Some(delay) = self.delay {
            config.timing.initial_delay_ms = delay;
        }
        if self.seed.is_some() {
            config.data.seed = self.seed;
        }
        if let Some(algorithm) = self.algorithm {
            config.initial_algorithm = algorithm;
        }
        if self.descending {
            config.order = SortOrder::Descending;
        }
        if self.mute {
            config.audio.enabled = false;
        }
        if self.no_early_exit {
            config.bubble_early_exit = false;
        }
    }
}

#[derive(Args, Debug)]
struct TraceArgs {
    /// Algorithm to run (bubble, insertion, selection, quick, merge).
    algorithm: Algorithm,

    /// Comma separated input; a random array is used when omitted.
    #[arg(long, value_delimiter = ',')]
    values: Vec<u32>,

    /// Length of the random array.
    #[arg(short = 'n', long, default_value_t = 12)]
    size: usize,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    descending: bool,

    #[arg(long)]
    no_early_exit: bool,
}
