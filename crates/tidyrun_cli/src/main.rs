//! tidyrun CLI
//!
//! Parallel clang-tidy driver for large source trees.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tidyrun_core::{DispatchRules, Dispatcher, DriverConfig, Reporter};

/// tidyrun - run clang-tidy across a source tree in parallel
#[derive(Parser)]
#[command(name = "tidyrun")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Analysis root directory
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Compilation-database directory, forwarded to the tool via -p
    #[arg(short = 'p', long, value_name = "DIR")]
    build_path: PathBuf,

    /// Analysis tool binary to invoke
    #[arg(long, default_value = "clang-tidy")]
    tool: PathBuf,

    /// Global check filter, forwarded verbatim
    #[arg(long)]
    checks: Option<String>,

    /// Number of worker threads (defaults to the CPU count)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    jobs: Option<u64>,

    /// Apply suggested fixes
    #[arg(long)]
    fix: bool,

    /// Dispatch rules file (defaults to .tidyrun.json under the root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging on stderr; the report stream owns stdout.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.root.is_dir() {
        return Err(miette::miette!("Not a directory: {}", cli.root.display()));
    }
    let build_path = cli.build_path.canonicalize().map_err(|e| {
        miette::miette!(
            "Invalid build path {}: {}",
            cli.build_path.display(),
            e
        )
    })?;
    if !build_path.is_dir() {
        return Err(miette::miette!("Not a directory: {}", build_path.display()));
    }
    let tool = which::which(&cli.tool)
        .map_err(|e| miette::miette!("Cannot resolve tool '{}': {}", cli.tool.display(), e))?;
    let jobs = cli.jobs.map(|n| n as usize).unwrap_or_else(num_cpus::get);

    let rules = match &cli.config {
        Some(path) => DispatchRules::from_file(path).into_diagnostic()?,
        None => DispatchRules::discover(&cli.root).into_diagnostic()?,
    };

    // Fail fast on interrupt: the whole process group goes down at once,
    // in-flight tool subprocesses included. No graceful drain.
    ctrlc::set_handler(|| {
        eprintln!("\nInterrupted.");
        terminate_process_group();
    })
    .into_diagnostic()?;

    info!(
        "Dispatching {} with {} workers (root: {})",
        tool.display(),
        jobs,
        cli.root.display()
    );

    let config = DriverConfig {
        root: cli.root,
        tool,
        build_path,
        checks: cli.checks,
        fix: cli.fix,
        jobs,
    };
    let dispatcher = Dispatcher::new(config, &rules, Arc::new(Reporter::console()));
    let report = dispatcher.run().into_diagnostic()?;

    info!(
        "Checked {} files ({} with findings) in {:.2?}",
        report.files_processed(),
        report.tool_failures(),
        report.wall_time
    );
    Ok(())
}

#[cfg(unix)]
fn terminate_process_group() -> ! {
    // SIGKILL to pid 0: every process in our group, children included.
    unsafe {
        libc::kill(0, libc::SIGKILL);
    }
    std::process::exit(130);
}

#[cfg(not(unix))]
fn terminate_process_group() -> ! {
    std::process::exit(130);
}
