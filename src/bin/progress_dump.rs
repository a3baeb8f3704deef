//! Prints the expanded "best so far" staircase of an optimiser log, one row
//! per oracle call. Used for debugging logs that do not chart as expected.

use clap::Parser;
use oracle_progress::export::write_series_csv;
use oracle_progress::io_utils::{io_cli_error, progress_cli_error};
use oracle_progress::{logging, parse_file, RunSummary};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    /// Optimiser terminal output
    input: PathBuf,
    /// Task label used in the score lines
    task: String,
    /// Only print summary totals
    #[arg(long)]
    summary: bool,
    /// Optional CSV output path for per-call rows
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Optional JSON output path for the recorded points and summary
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Serialize)]
struct Dump<'a> {
    summary: &'a RunSummary,
    points: &'a [oracle_progress::ProgressPoint],
}

fn main() {
    logging::init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let map = parse_file(&args.input, &args.task)
        .map_err(|e| progress_cli_error("parsing log", e))?;
    let series = map
        .expand()
        .map_err(|e| progress_cli_error("expanding progress", e))?;
    let summary = RunSummary::from_map(&args.task, &map);

    if let Some(path) = &args.csv {
        let f = File::create(path).map_err(|e| io_cli_error("creating csv", path, e))?;
        write_series_csv(&series, f)?;
    }
    if let Some(path) = &args.json {
        let mut f = File::create(path).map_err(|e| io_cli_error("creating json", path, e))?;
        let dump = Dump {
            summary: &summary,
            points: map.points(),
        };
        serde_json::to_writer_pretty(&mut f, &dump)?;
        f.write_all(b"\n")?;
    }

    if !args.summary {
        for (calls, score) in series.iter() {
            println!("call {calls}: {score}");
        }
    }

    println!("#records: {}", summary.records);
    match summary.max_oracle_calls {
        Some(max) => println!("#oracle calls: {max}"),
        None => println!("#oracle calls: 0"),
    }
    if let Some(best) = summary.best_score {
        println!("best score: {best}");
    }
    if let Some(se) = summary.standard_error {
        println!("standard error: {se:.4}");
    }

    Ok(())
}
