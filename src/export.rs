//! CSV and JSON dumps of parsed progress.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::progress::ExpandedSeries;
use crate::stats::RunSummary;

#[derive(Serialize)]
struct Row {
    oracle_calls: u64,
    best_score: f64,
}

/// Write `oracle_calls,best_score` rows for every index of the staircase.
pub fn write_series_csv<W: Write>(series: &ExpandedSeries, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for (oracle_calls, best_score) in series.iter() {
        wtr.serialize(Row {
            oracle_calls,
            best_score,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_series_csv(series: &ExpandedSeries, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_series_csv(series, file)
}

pub fn write_summary_json<W: Write>(summary: &RunSummary, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, summary)?;
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{expand, ProgressPoint};

    #[test]
    fn csv_has_header_and_every_call() {
        let series = expand(&[ProgressPoint::new(2, 1.5), ProgressPoint::new(3, 2.0)]).unwrap();
        let mut buf = Vec::new();
        write_series_csv(&series, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "oracle_calls,best_score\n1,0.0\n2,1.5\n3,2.0\n");
    }

    #[test]
    fn summary_json_fields() {
        let summary = RunSummary {
            task: "logp".into(),
            records: 2,
            max_oracle_calls: Some(20),
            best_score: Some(4.0),
            standard_error: None,
        };
        let mut buf = Vec::new();
        write_summary_json(&summary, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["task"], "logp");
        assert_eq!(value["max_oracle_calls"], 20);
        assert!(value["standard_error"].is_null());
    }
}
