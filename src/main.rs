// Command-line entry point for nse_rewrite.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use nse_rewrite::application::InstrumentUsecase;
use nse_rewrite::domain::config::{InstrumentConfig, Profile};
use nse_rewrite::infrastructure::concurrency::init_thread_pool;
use nse_rewrite::infrastructure::{ConfigFile, DryRunSink, FsEditSink, JsonFrontEnd};
use nse_rewrite::ports::EditSink;

#[derive(Parser, Debug)]
#[command(name = "nse-rewrite", author, version, about, long_about = None)]
struct Cli {
    /// Source files to instrument
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Namespace of the symbolic execution library (default: crv)
    #[arg(long)]
    namespace: Option<String>,

    /// Function called on control-flow decisions (default: branch)
    #[arg(long)]
    branch: Option<String>,

    /// Path search strategy factory (default: sequential_dfs_checker)
    #[arg(long)]
    strategy: Option<String>,

    /// Function renamed and wrapped by the driver (default: main)
    #[arg(long)]
    entry_point: Option<String>,

    /// Rewrite profile (nse, crv)
    #[arg(long)]
    profile: Option<Profile>,

    /// Header to #include at the top of every instrumented file
    #[arg(long)]
    runtime_header: Option<String>,

    /// Directory holding the <source>.ast.json dumps (default: next to each source)
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Write instrumented copies here instead of rewriting in place
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print planned edits as JSON, don't touch any file
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Worker threads (default: one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_config(cli: &Cli) -> Result<InstrumentConfig> {
    let mut config = InstrumentConfig::default();
    if let Some(path) = &cli.config {
        ConfigFile::load(path)?.apply_to(&mut config);
    }
    if let Some(namespace) = &cli.namespace {
        config.namespace = namespace.clone();
    }
    if let Some(branch) = &cli.branch {
        config.branch = branch.clone();
    }
    if let Some(strategy) = &cli.strategy {
        config.strategy = strategy.clone();
    }
    if let Some(entry_point) = &cli.entry_point {
        config.entry_point = entry_point.clone();
    }
    if let Some(profile) = cli.profile {
        config.profile = profile;
    }
    if let Some(header) = &cli.runtime_header {
        config.runtime_header = Some(header.clone());
    }
    Ok(config)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    init_thread_pool(cli.jobs)?;
    tracing::info!(
        profile = %config.profile,
        namespace = %config.namespace,
        strategy = %config.strategy,
        files = cli.sources.len(),
        "starting"
    );

    let front_end = match &cli.dump_dir {
        Some(dir) => JsonFrontEnd::with_dump_dir(dir),
        None => JsonFrontEnd::new(),
    };
    let fs_sink = match &cli.output_dir {
        Some(dir) => FsEditSink::into_dir(dir),
        None => FsEditSink::in_place(),
    };
    let sink: &dyn EditSink = if cli.dry_run { &DryRunSink } else { &fs_sink };

    let usecase = InstrumentUsecase {
        front_end: &front_end,
        sink,
        config: &config,
    };
    let report = usecase.run(&cli.sources);

    if let Some(path) = &cli.report {
        report.write_json(path)?;
    }

    let failed = report.failed().count();
    eprintln!(
        "Instrumented {} of {} file(s).",
        report.files.len() - failed,
        report.files.len()
    );
    if failed > 0 {
        for file in report.failed() {
            eprintln!("  {}: {}", file.path, file.error.as_deref().unwrap_or("unknown error"));
        }
        std::process::exit(1);
    }
    Ok(())
}
