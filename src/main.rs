use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use oracle_progress::config::parse_limits;
use oracle_progress::export::{save_series_csv, write_summary_json};
use oracle_progress::io_utils::{io_cli_error, progress_cli_error, simple_cli_error};
use oracle_progress::{
    logging, render, BatchConfig, ChartData, JobConfig, LogParser, PlotOptions, RunSummary,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Progress charts from optimiser terminal output", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one log and chart its best score against oracle calls
    Plot(PlotArgs),
    /// Run every job listed in a TOML or JSON file
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct PlotArgs {
    /// Optimiser terminal output
    #[arg(value_hint = ValueHint::FilePath)]
    log: PathBuf,

    /// Task label as printed in `Best <task> Score:` lines
    #[arg(short, long)]
    task: String,

    /// Best score in the dataset, drawn as a reference line
    #[arg(long)]
    best_in_set: Option<f64>,

    /// Chart title
    #[arg(long, default_value = "")]
    title: String,

    /// X axis label
    #[arg(long, default_value = "Number of Oracle Calls")]
    xlabel: String,

    /// Y axis label
    #[arg(long, default_value = "Best Score Found (Higher is Better)")]
    ylabel: String,

    /// X axis range as MIN,MAX
    #[arg(long, value_parser = parse_limits, allow_hyphen_values = true)]
    xlim: Option<(f64, f64)>,

    /// Y axis range as MIN,MAX
    #[arg(long, value_parser = parse_limits, allow_hyphen_values = true)]
    ylim: Option<(f64, f64)>,

    /// Skip the standard error band
    #[arg(long, action = ArgAction::SetTrue)]
    no_error_bars: bool,

    /// Output image (`.svg` for SVG, PNG otherwise)
    #[arg(short, long, default_value = "plot.png", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Do not write an image
    #[arg(long, action = ArgAction::SetTrue)]
    no_plot: bool,

    /// Print the staircase on the terminal
    #[arg(long, action = ArgAction::SetTrue)]
    show: bool,

    /// Image width in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 1000)]
    height: u32,

    /// Write the expanded staircase as CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    csv: Option<PathBuf>,

    /// Print a JSON summary on stdout
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Job file (`.json` for JSON, TOML otherwise)
    #[arg(value_hint = ValueHint::FilePath)]
    config: PathBuf,

    /// Print a JSON summary per job on stdout
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

impl PlotArgs {
    fn into_job(self) -> (JobConfig, bool) {
        let plot = PlotOptions {
            title: self.title,
            x_label: self.xlabel,
            y_label: self.ylabel,
            x_limits: self.xlim,
            y_limits: self.ylim,
            error_bars: !self.no_error_bars,
            output: (!self.no_plot).then_some(self.output),
            show: self.show,
            width: self.width,
            height: self.height,
            ..PlotOptions::default()
        };
        let job = JobConfig {
            log: self.log,
            task: self.task,
            best_in_set: self.best_in_set,
            csv: self.csv,
            plot,
        };
        (job, self.json)
    }
}

fn main() {
    logging::init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Plot(args) => {
            let (job, json) = args.into_job();
            run_job(&job, json)?;
        }
        Command::Batch(args) => {
            let config = BatchConfig::from_path(&args.config)
                .map_err(|e| progress_cli_error("loading job file", e))?;
            if config.jobs.is_empty() {
                return Err(simple_cli_error("job file lists no [[job]] entries").into());
            }
            for job in &config.jobs {
                run_job(job, args.json)?;
            }
            info!(jobs = config.jobs.len(), "batch complete");
        }
    }
    Ok(())
}

fn run_job(job: &JobConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let parser =
        LogParser::new(&job.task).map_err(|e| progress_cli_error("invalid task label", e))?;
    let map = parser
        .parse_file(&job.log)
        .map_err(|e| progress_cli_error("parsing log", e))?;
    let data = ChartData::from_map(&map, job.best_in_set)
        .map_err(|e| progress_cli_error("expanding progress", e))?;

    if let (Some(path), Some(series)) = (&job.csv, data.expanded.as_ref()) {
        save_series_csv(series, path).map_err(|e| match e {
            oracle_progress::ProgressError::Io(io) => io_cli_error("writing csv", path, io),
            other => progress_cli_error("writing csv", other),
        })?;
        info!(path = %path.display(), rows = series.len(), "wrote staircase csv");
    }

    render(&data, &job.plot).map_err(|e| progress_cli_error("rendering chart", e))?;

    if json {
        let summary = RunSummary::from_map(parser.task_label(), &map);
        write_summary_json(&summary, io::stdout().lock())?;
    }
    Ok(())
}
