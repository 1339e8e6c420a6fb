//! coverage-bundler: bundle an HTML coverage report into one file

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use coverage_bundler::config::{load_config, EffectiveConfig};
use coverage_bundler::watcher::ReportWatcher;
use coverage_bundler::{bundle, BundleOptions, BundleResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Bundle an Istanbul HTML coverage report into a single self-contained HTML file
#[derive(Parser, Debug)]
#[command(name = "coverage-bundler")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// Coverage report directory (must contain index.html)
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Output file [default: coverage-report.html]
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Document title [default: Coverage Report]
    #[arg(long, short, value_name = "TITLE")]
    title: Option<String>,

    /// Path to config file (default: search .bundlerc.json in the input dir and parents)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Rebundle whenever the report changes
    #[arg(long)]
    watch: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Quiet mode (no summary)
    #[arg(long, short)]
    quiet: bool,

    /// List every bundled page
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(long, short = 'v')]
    version: bool,
}

/// Summary line for --json
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    #[serde(flatten)]
    result: &'a BundleResult,
    output: String,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help goes to stdout with exit 0; usage errors to stderr with exit 1
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return Ok(ExitCode::from(code));
        }
    };

    if args.version {
        println!("coverage-bundler {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let Some(input) = args.input.clone() else {
        // a bare invocation is a request for usage; options without an
        // input directory are a usage error
        if std::env::args_os().len() > 1 {
            let _ = Args::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    "the following required arguments were not provided:\n  <INPUT_DIR>",
                )
                .print();
            return Ok(ExitCode::from(1));
        }
        Args::command().print_help()?;
        println!();
        return Ok(ExitCode::SUCCESS);
    };

    let config = load_config(&input, args.config.as_deref())?
        .merge_with_cli(args.title.clone(), args.output.clone());

    if args.watch {
        return run_watch(&args, &input, &config);
    }

    bundle_and_write(&args, &input, &config)?;
    Ok(ExitCode::SUCCESS)
}

fn bundle_and_write(args: &Args, input: &Path, config: &EffectiveConfig) -> Result<BundleResult> {
    let options = BundleOptions {
        input_dir: input.to_path_buf(),
        title: config.title.clone(),
    };
    let result = bundle(&options)?;

    write_output(&config.output, &result.html)?;

    if args.verbose {
        for path in &result.pages {
            eprintln!("  {} {}", "+".green(), path);
        }
    }

    if args.json {
        let summary = JsonSummary {
            result: &result,
            output: config.output.display().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !args.quiet {
        println!(
            "{}: Bundled {} files ({}) into {}",
            "Done".green().bold(),
            result.file_count,
            result.formatted_size(),
            config.output.display()
        );
    }
    Ok(result)
}

fn write_output(output: &Path, html: &str) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }
    fs::write(output, html).with_context(|| format!("Failed to write {}", output.display()))
}

fn run_watch(args: &Args, input: &Path, config: &EffectiveConfig) -> Result<ExitCode> {
    // the first run must succeed so the report layout is known to be valid
    bundle_and_write(args, input, config)?;

    let watcher = ReportWatcher::watch(input)
        .context("Failed to create file watcher")?
        .ignoring(&config.output);
    if !args.quiet {
        eprintln!("{}: Watching {} for changes... (Ctrl+C to stop)", "Info".blue(), input.display());
    }

    loop {
        let changed = watcher.next_changes();
        if changed.is_empty() {
            continue;
        }
        if args.verbose {
            for path in &changed {
                eprintln!("{}: changed {}", "Info".blue(), path.display());
            }
        }
        if let Err(e) = bundle_and_write(args, input, config) {
            eprintln!("{}: {:#}", "Error".red(), e);
        }
    }
}
