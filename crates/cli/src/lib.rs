use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use progress_bar::BarProgress;
use sacred_numbers::{integer, BuildOptions, RemarkableSet};
use sacred_search::{
    check_number, check_property, check_property_ratio, Dataset, PropertySelection, ScanReport,
};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod progress_bar;
mod report;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
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
#[command(name = "sacred")]
#[command(about = "Find remarkable numbers hidden in measured values", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Complexity budget of the remarkable-number universe
    #[arg(long, global = true)]
    complexity: Option<f64>,

    /// Relative match tolerance (0.01 = 1%)
    #[arg(long, global = true)]
    delta: Option<f64>,

    /// Length of the integer, prime and Fibonacci seed sequences
    #[arg(id = "seeds", short = 'n', long = "seeds", value_name = "N", global = true)]
    n: Option<usize>,

    /// TOML file with build options; flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum matches listed per value
    #[arg(long, global = true, default_value_t = 10)]
    limit: usize,

    /// Print JSON on stdout instead of the colored report
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors and hide the progress bar
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a single value
    Number(NumberArgs),

    /// Match every numeric property value of a dataset
    Scan(ScanArgs),

    /// Match the ratio of every pair of records (implies ratio mode)
    Ratio(ScanArgs),

    /// Divisors and series membership of an integer
    Integer(IntegerArgs),
}

#[derive(Args)]
struct NumberArgs {
    /// Value to match; the sign is ignored
    #[arg(allow_negative_numbers = true)]
    value: f64,
}

#[derive(Args)]
struct ScanArgs {
    /// Dataset file (.json or .toml): a mapping or an array of records
    dataset: PathBuf,

    /// Property to scan (repeatable); every property when omitted
    #[arg(short, long = "property")]
    properties: Vec<String>,
}

#[derive(Args)]
struct IntegerArgs {
    n: u64,
}

#[derive(Serialize)]
struct NumberOutput<'a> {
    value: f64,
    matches: &'a [sacred_search::MatchResult],
}

#[derive(Serialize)]
struct IntegerOutput<'a> {
    n: u64,
    divisors: &'a [u64],
    series: &'a [&'static str],
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match &cli.command {
        Commands::Number(args) => run_number(&cli, args),
        Commands::Scan(args) => run_scan(&cli, args, false),
        Commands::Ratio(args) => run_scan(&cli, args, true),
        Commands::Integer(args) => run_integer(&cli, args),
    }
}

fn build_options(cli: &Cli, ratio_mode: bool) -> Result<BuildOptions> {
    let mut options = match &cli.config {
        Some(path) => load_options(path)?,
        None => BuildOptions::default(),
    };
    if let Some(complexity) = cli.complexity {
        options.complexity = complexity;
    }
    if let Some(delta) = cli.delta {
        options.delta = delta;
    }
    if let Some(n) = cli.n {
        options.n = n;
    }
    options.ratio_mode |= ratio_mode;
    options.validate().context("Invalid build options")?;
    Ok(options)
}

fn load_options(path: &Path) -> Result<BuildOptions> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    BuildOptions::from_toml_str(&raw)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

fn build_set(options: &BuildOptions, progress: &mut BarProgress) -> Result<RemarkableSet> {
    let started = Instant::now();
    let set = RemarkableSet::build_with_progress(options, progress)
        .context("Failed to build remarkable numbers")?;
    log::info!(
        "Built {} remarkable numbers in {:.2}s (complexity {}, n {})",
        set.len(),
        started.elapsed().as_secs_f64(),
        options.complexity,
        options.effective_n()
    );
    for pass in set.passes() {
        log::debug!(
            "{}: {} operands, {} evaluated, {} new, {} renamed, {} cheaper",
            pass.title,
            pass.operands,
            pass.evaluated,
            pass.inserted,
            pass.replaced,
            pass.lowered
        );
    }
    Ok(set)
}

fn run_number(cli: &Cli, args: &NumberArgs) -> Result<()> {
    let options = build_options(cli, false)?;
    let mut progress = BarProgress::new(cli.quiet || cli.json);
    let set = build_set(&options, &mut progress)?;
    drop(progress);

    let matches = check_number(&set, args.value);
    let shown = &matches[..matches.len().min(cli.limit)];
    if cli.json {
        let output = NumberOutput {
            value: args.value.abs(),
            matches: shown,
        };
        return print_stdout(&format!("{}\n", serde_json::to_string_pretty(&output)?));
    }
    print_stdout(&report::render_number(
        args.value.abs(),
        shown,
        set.tolerance(),
        cli.limit,
    ))
}

fn run_scan(cli: &Cli, args: &ScanArgs, ratio: bool) -> Result<()> {
    let dataset = Dataset::from_path(&args.dataset)
        .with_context(|| format!("Failed to load dataset {}", args.dataset.display()))?;
    if dataset.is_empty() {
        log::warn!("Dataset {} has no records", args.dataset.display());
    }

    let options = build_options(cli, ratio)?;
    let selection = PropertySelection::from_names(args.properties.clone());
    let mut progress = BarProgress::new(cli.quiet || cli.json);
    let set = build_set(&options, &mut progress)?;

    let mut report = if ratio {
        check_property_ratio(&set, &dataset, &selection, &mut progress)
    } else {
        check_property(&set, &dataset, &selection, &mut progress)
    }
    .context("Scan failed")?;
    drop(progress);

    truncate(&mut report, cli.limit);
    if cli.json {
        return print_stdout(&format!("{}\n", serde_json::to_string_pretty(&report)?));
    }
    print_stdout(&report::render_scan(&report, set.tolerance(), cli.limit))
}

fn run_integer(cli: &Cli, args: &IntegerArgs) -> Result<()> {
    let divisors = integer::divisors(args.n);
    let series = integer::series_of(args.n);
    if cli.json {
        let output = IntegerOutput {
            n: args.n,
            divisors: &divisors,
            series: &series,
        };
        return print_stdout(&format!("{}\n", serde_json::to_string_pretty(&output)?));
    }
    print_stdout(&report::render_integer(args.n, &divisors, &series))
}

fn truncate(report: &mut ScanReport, limit: usize) {
    for property in &mut report.properties {
        for item in &mut property.items {
            item.matches.truncate(limit);
        }
    }
}
