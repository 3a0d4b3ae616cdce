#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::missing_errors_doc)]

mod discover;
mod logging;

use std::fs;
use std::path::PathBuf;

use amdless_core::{convert, ConvertOptions};
use clap::Parser;
use miette::{miette, IntoDiagnostic, Result, WrapErr};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "amdless")]
#[command(author, version, about = "Convert AMD modules to ES modules", long_about = None)]
struct Cli {
    /// Input files (printed to stdout unless --out is set)
    #[arg(value_name = "FILE", conflicts_with = "dir")]
    files: Vec<PathBuf>,

    /// Convert every matching file under this directory
    #[arg(short, long, value_name = "DIR", requires = "out")]
    dir: Option<PathBuf>,

    /// Output directory (mirrors the input layout in --dir mode)
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Glob patterns to skip, relative to --dir (repeatable)
    #[arg(short, long, value_name = "GLOB")]
    ignore: Vec<String>,

    /// File extensions converted in --dir mode
    #[arg(short, long, value_delimiter = ',', default_value = "js")]
    ext: Vec<String>,

    /// Re-indent generated module bodies
    #[arg(short, long)]
    beautify: bool,

    /// Derive import binding names from the dependency filename stem
    #[arg(short, long)]
    logical_name: bool,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print a machine-readable JSON summary to stdout
    #[arg(long)]
    json: bool,
}

/// One input file and where its converted text goes.
struct Job {
    input: PathBuf,
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Summary {
    converted: usize,
    failed: usize,
    files: Vec<FileOutcome>,
}

#[derive(Serialize)]
struct FileOutcome {
    path: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    let options = ConvertOptions::new()
        .with_beautify(cli.beautify)
        .with_logical_names(cli.logical_name);

    let jobs = build_jobs(&cli)?;
    if jobs.is_empty() {
        eprintln!("error: no input files (pass FILE arguments or --dir)");
        std::process::exit(2);
    }

    let mut summary = Summary {
        converted: 0,
        failed: 0,
        files: Vec::new(),
    };

    for job in &jobs {
        // Writing to stdout and printing the JSON summary would interleave,
        // so stdout output is reserved for one or the other.
        let print = job.output.is_none() && !cli.json;
        match run_job(job, &options, print) {
            Ok(()) => {
                summary.converted += 1;
                summary.files.push(FileOutcome {
                    path: job.input.display().to_string(),
                    status: "converted",
                    error: None,
                });
            }
            // One bad file never stops the batch.
            Err(err) => {
                tracing::error!(path = %job.input.display(), error = %err, "conversion failed");
                summary.failed += 1;
                summary.files.push(FileOutcome {
                    path: job.input.display().to_string(),
                    status: "failed",
                    error: Some(err.to_string()),
                });
            }
        }
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).into_diagnostic()?
        );
    }

    if summary.failed > 0 {
        return Err(miette!(
            "{} of {} files failed to convert",
            summary.failed,
            jobs.len()
        ));
    }
    Ok(())
}

fn build_jobs(cli: &Cli) -> Result<Vec<Job>> {
    if let Some(dir) = &cli.dir {
        let out = cli
            .out
            .as_ref()
            .ok_or_else(|| miette!("--dir requires --out"))?;
        let files = discover::discover(dir, &cli.ext, &cli.ignore)?;
        Ok(files
            .into_iter()
            .map(|rel| Job {
                input: dir.join(&rel),
                output: Some(out.join(&rel)),
            })
            .collect())
    } else {
        Ok(cli
            .files
            .iter()
            .map(|file| Job {
                input: file.clone(),
                output: cli
                    .out
                    .as_ref()
                    .map(|out| out.join(file.file_name().unwrap_or(file.as_os_str()))),
            })
            .collect())
    }
}

fn run_job(job: &Job, options: &ConvertOptions, print: bool) -> Result<()> {
    let source = fs::read_to_string(&job.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", job.input.display()))?;

    let output = convert(&source, options).into_diagnostic()?;

    match &job.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).into_diagnostic()?;
            }
            fs::write(path, output)
                .into_diagnostic()
                .wrap_err_with(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote module");
        }
        None if print => print!("{output}"),
        None => {}
    }
    Ok(())
}
